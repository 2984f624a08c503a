//! Tubely API Library
//!
//! HTTP handlers, caller identity, error mapping and application setup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
