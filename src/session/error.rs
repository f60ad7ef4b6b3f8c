use thiserror::Error;

use crate::session::store::SessionStoreError;

/// Errors surfaced by typed session access
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to serialize session value '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("session value '{key}' does not match the expected shape: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}
