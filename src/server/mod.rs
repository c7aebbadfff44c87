//! Axum-based HTTP server implementation for the darija-translate service.
//!
//! This module sets up the HTTP server, configures routes, and guards the
//! `/api` surface consumed by the web UI and the browser extension panel.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual API endpoints (translate, translate-image, health, metrics).
//! - `middleware`: Request ID tracking and the HTTP Basic Auth gate.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthResponse, TranslateResponse};
pub use middleware::BasicAuth;
pub use routes::{create_router, AppState};
