//! Test utilities for Daehan Shipping services.
//!
//! Provides admin-key request headers and JSON body decoding for handler tests.
//! Import in `#[cfg(test)]` blocks and integration tests only.

pub mod auth;
pub mod body;
