//! Route handlers, one module per step.

pub mod confirm;
pub mod detail;
pub mod health;
pub mod start;
