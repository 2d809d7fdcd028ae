//! Data module - CSV loading and aggregation

pub mod aggregate;
mod loader;
pub mod schema;

pub use aggregate::{AggregateError, ViewAggregator};
pub use loader::{DramaLoader, DramaTable, LoaderError};
