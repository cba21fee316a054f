//! AQI prediction server
//!
//! Serves the HTML prediction form, a JSON prediction API, and the
//! health and metrics endpoints.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod render;

pub use api::{create_router, AppState};
pub use config::ServerConfig;
