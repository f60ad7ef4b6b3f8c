//! Request failure handling.

use axum::{
    extract::rejection::FormRejection,
    http::{header::InvalidHeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::session::{SessionError, SessionStoreError};
use crate::web::pages::ERROR_PAGE;

/// Failure while serving a page.
///
/// There are no user-facing domain errors; every variant is reported to
/// the client as the generic error page. Form bodies that cannot be bound
/// keep the rejection's status, everything else is a 500.
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] SessionStoreError),

    #[error("failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("invalid session cookie header: {0}")]
    Cookie(#[from] InvalidHeaderValue),

    #[error("failed to bind submitted form: {0}")]
    Form(#[from] FormRejection),
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::Form(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (self.status(), Html(ERROR_PAGE)).into_response()
    }
}
