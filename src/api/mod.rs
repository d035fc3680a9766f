//! HTTP API layer for request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, rate limiting and tracing middleware
//! - [`routes`] - Route groups composed by [`crate::routes::app_router`]

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
