//! Shared plumbing for Daehan Shipping backend services.

pub mod error;
pub mod health;
pub mod middleware;
pub mod tracing;
