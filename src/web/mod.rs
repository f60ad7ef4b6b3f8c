//! HTTP front end for the form flow.
//!
//! Serves the three step pages plus a health endpoint. Every request passes
//! through the session middleware, which hands handlers a
//! [`SessionContext`](crate::session::SessionContext) for the browser's
//! session.

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod middleware;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;
pub mod step;

pub use error::PageError;
pub use server::serve;
pub use state::AppState;
pub use step::Step;

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let session_layer = axum::middleware::from_fn_with_state(
        state.sessions.clone(),
        middleware::session_layer,
    );

    Router::new()
        .route(
            Step::Start.path(),
            get(routes::start::show).post(routes::start::submit),
        )
        .route(
            Step::Detail.path(),
            get(routes::detail::show).post(routes::detail::submit),
        )
        .route(Step::Confirm.path(), get(routes::confirm::show))
        .route("/health", get(routes::health::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(session_layer),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_build_router() {
        let state = AppState::from_config(&Config::default()).unwrap();
        let _router = build_router(state);
        // Router builds without panicking
    }
}
