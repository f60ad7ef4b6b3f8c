//! Start step: collects the first name.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::session::{SessionContext, FIRST_NAME};
use crate::web::error::PageError;
use crate::web::state::AppState;
use crate::web::step::Step;

/// Submitted Start form. A missing `name` binds as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartForm {
    pub name: String,
}

pub async fn show(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    Ok(state.pages.render(Step::Start, &json!({}))?)
}

pub async fn submit(
    session: SessionContext,
    form: Result<Form<StartForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Form(form) = form?;
    FIRST_NAME.set(&session, &form.name)?;
    debug!(session_id = %session.id(), "start step submitted");
    Ok(Step::Start.forward())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn test_submit_stores_first_name_and_redirects() {
        let session = SessionContext::fresh();
        let redirect = submit(
            session.clone(),
            Ok(Form(StartForm {
                name: "Ada".to_string(),
            })),
        )
        .await
        .unwrap();

        assert_eq!(FIRST_NAME.get(&session).unwrap().as_deref(), Some("Ada"));

        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/moredetail");
    }

    #[tokio::test]
    async fn test_submit_overwrites_previous_name() {
        let session = SessionContext::fresh();
        FIRST_NAME.set(&session, &"Grace".to_string()).unwrap();

        submit(session.clone(), Ok(Form(StartForm { name: "Ada".to_string() })))
            .await
            .unwrap();
        assert_eq!(FIRST_NAME.get(&session).unwrap().as_deref(), Some("Ada"));
    }
}
