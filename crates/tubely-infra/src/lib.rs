//! Tubely Infrastructure Library
//!
//! Shared infrastructure for the Tubely server:
//! - Middleware (request ID)
//! - Telemetry initialization

pub mod middleware;
pub mod telemetry;

pub use middleware::{request_id_middleware, RequestId};
pub use telemetry::{init_telemetry, LogFormat};
