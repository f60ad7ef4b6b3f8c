//! Detail step: pre-fills the first name and collects the full record.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Redirect},
    Form,
};
use serde_json::json;
use tracing::debug;

use crate::models::UserData;
use crate::session::{SessionContext, FIRST_NAME, USER_DATA_VALUES};
use crate::web::error::PageError;
use crate::web::state::AppState;
use crate::web::step::Step;

/// Record shown on the Detail page. An absent first name renders empty.
pub fn prefilled_input(session: &SessionContext) -> Result<UserData, PageError> {
    let first_name = FIRST_NAME.get(session)?.unwrap_or_default();
    Ok(UserData::with_first_name(first_name))
}

pub async fn show(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Html<String>, PageError> {
    let input = prefilled_input(&session)?;
    Ok(state.pages.render(Step::Detail, &json!({ "input": input }))?)
}

pub async fn submit(
    session: SessionContext,
    form: Result<Form<UserData>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Form(input) = form?;
    USER_DATA_VALUES.set(&session, &input)?;
    debug!(session_id = %session.id(), "detail step submitted");
    Ok(Step::Detail.forward())
}
