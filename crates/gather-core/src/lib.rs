//! Gather Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! small pure utilities (identifier generation, geo math, pagination math)
//! shared across all Gather components.

pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod ident;
pub mod models;
pub mod pagination;
pub mod validation;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use geo::{bounding_box, haversine_distance_km, BoundingBox};
pub use pagination::{PageParams, Pagination};
