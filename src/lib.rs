// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod models;
pub mod output;
pub mod routes;
pub mod services;
pub mod template;

// Re-export commonly used types
pub use error::{AppError, Result};

use services::RouteGenerator;

// App state for sharing across the application
pub struct AppState {
    pub generator: RouteGenerator,
}
