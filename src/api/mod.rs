//! API Module
//!
//! HTTP handlers and routing for the cache admin surface.
//!
//! # Endpoints
//! - `PUT /content`, `GET /content/:key` - Write and read JSON content
//! - `DELETE /cache`, `DELETE /cache/:key` - Clear the cache or one entry
//! - `GET /stats` - Cache statistics
//! - `GET /metrics`, `GET /metrics/snapshot` - Performance telemetry
//! - `PUT /config` - Partial configuration update
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
