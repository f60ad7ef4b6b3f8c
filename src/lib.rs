//! formflow - a multi-step web form whose state lives in the server-side session
//!
//! The flow is `Start -> Detail -> Confirm`. Each step reads what the
//! previous one left in the session and writes its own values before
//! redirecting forward.

pub mod config;
pub mod logging;
pub mod models;
pub mod session;
pub mod web;
