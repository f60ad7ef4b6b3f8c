//! The steps of the form flow.

use std::fmt;

use axum::response::Redirect;

/// One page of the linear flow `Start -> Detail -> Confirm`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Start,
    Detail,
    Confirm,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Start, Step::Detail, Step::Confirm];

    /// Logical page name, also used as the template name
    pub fn name(self) -> &'static str {
        match self {
            Step::Start => "index",
            Step::Detail => "moredetail",
            Step::Confirm => "confirm",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Step::Start => "/",
            Step::Detail => "/moredetail",
            Step::Confirm => "/confirm",
        }
    }

    /// Step a successful submit redirects to
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Start => Some(Step::Detail),
            Step::Detail => Some(Step::Confirm),
            Step::Confirm => None,
        }
    }

    /// 303 redirect to the following step. The terminal step redirects to itself.
    pub fn forward(self) -> Redirect {
        Redirect::to(self.next().unwrap_or(self).path())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
