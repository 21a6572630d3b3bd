//! Data module - loading, cleaning and the session data context

mod boundary;
mod context;
mod loader;
mod processor;
pub mod schema;

pub use boundary::{parse_boundaries, BoundaryError, NeighbourhoodBoundary, Ring};
pub use context::DataContext;
pub use loader::{download, DatasetLoader, LoaderError, RawDataset};
pub use processor::{CleaningReport, DataProcessor, ProcessorError};
