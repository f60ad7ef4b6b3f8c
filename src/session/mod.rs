//! Server-side session state.
//!
//! A session is a map of named values, each kept as JSON text, stored in a
//! pluggable [`SessionStore`] and addressed by a UUID carried in a cookie.
//! [`SessionManager`] resolves the session for each request into a
//! [`SessionContext`] that handlers read and write through typed
//! [`SessionVar`] fields.

pub mod adapters;
pub mod context;
pub mod error;
pub mod manager;
pub mod store;
pub mod vars;

pub use adapters::{FileSessionStore, InMemorySessionStore};
pub use context::SessionContext;
pub use error::SessionError;
pub use manager::{SessionManager, SessionSettings};
pub use store::{Session, SessionStore, SessionStoreError, SessionStoreRef};
pub use vars::{SessionVar, FIRST_NAME, USER_DATA_VALUES};
