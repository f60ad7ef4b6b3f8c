//! Page rendering with embedded Handlebars templates.

use axum::response::Html;
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

use crate::web::step::Step;

const PARTIALS: [(&str, &str); 2] = [
    ("layout_header", include_str!("templates/layout_header.hbs")),
    ("layout_footer", include_str!("templates/layout_footer.hbs")),
];

const STEP_TEMPLATES: [(Step, &str); 3] = [
    (Step::Start, include_str!("templates/index.hbs")),
    (Step::Detail, include_str!("templates/moredetail.hbs")),
    (Step::Confirm, include_str!("templates/confirm.hbs")),
];

/// Static page served for any request that fails
pub const ERROR_PAGE: &str = include_str!("templates/error.html");

/// Renders step pages. Values are HTML-escaped.
#[derive(Debug)]
pub struct Pages {
    handlebars: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        for (name, source) in PARTIALS {
            handlebars.register_partial(name, source)?;
        }
        for (step, source) in STEP_TEMPLATES {
            handlebars.register_template_string(step.name(), source)?;
        }

        Ok(Self { handlebars })
    }

    /// Render the page for `step` with `data` as the view model
    pub fn render<T: Serialize>(&self, step: Step, data: &T) -> Result<Html<String>, RenderError> {
        self.handlebars.render(step.name(), data).map(Html)
    }
}
