//! Confirm step: shows the submitted record.

use axum::{extract::State, response::Html};
use serde_json::json;

use crate::session::{SessionContext, USER_DATA_VALUES};
use crate::web::error::PageError;
use crate::web::state::AppState;
use crate::web::step::Step;

/// Read-only: the stored record is never modified here
pub async fn show(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Html<String>, PageError> {
    let data = USER_DATA_VALUES.get(&session)?.unwrap_or_default();
    let context = json!({
        "display_name": data.display_name(),
        "data": data,
    });
    Ok(state.pages.render(Step::Confirm, &context)?)
}
