//! Toronto crime dashboard core.
//!
//! Loads the Major Crime Indicators table and the neighbourhood boundaries,
//! cleans the incidents, and groups them per chart dimension.

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;

pub use aggregate::{AggregateBucket, AggregateError, Aggregator, Dimension, TimeBreakdown};
pub use config::DashboardConfig;
pub use data::DataContext;
pub use pipeline::build_context;
