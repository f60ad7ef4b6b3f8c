//! Session middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::session::SessionManager;
use crate::web::error::PageError;

/// Load the request's session into its extensions, run the handler, then
/// persist the session and issue the cookie for new sessions.
pub async fn session_layer(
    State(sessions): State<SessionManager>,
    mut request: Request,
    next: Next,
) -> Result<Response, PageError> {
    let session = sessions.resolve(request.headers()).await?;
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if let Some(cookie) = sessions.commit(&session).await? {
        response
            .headers_mut()
            .append(header::SET_COOKIE, HeaderValue::from_str(&cookie)?);
    }

    Ok(response)
}
