//! HTTP API Layer
//!
//! JSON request/response boundary for the Waitlist Engine.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use server::{router, HttpServer, HttpServerConfig, HttpServerHandle};
