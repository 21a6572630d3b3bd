//! Immutable session data shared by every aggregation.

use crate::data::boundary::NeighbourhoodBoundary;
use crate::data::loader::RawDataset;
use crate::data::processor::{CleaningReport, DataProcessor, ProcessorError};
use polars::prelude::DataFrame;

/// Cleaned incidents plus boundaries, built once at startup and read-only after.
pub struct DataContext {
    incidents: DataFrame,
    boundaries: Vec<NeighbourhoodBoundary>,
    report: CleaningReport,
}

impl DataContext {
    /// Wrap an already-clean incident table.
    pub fn new(incidents: DataFrame, boundaries: Vec<NeighbourhoodBoundary>) -> Self {
        let rows = incidents.height();
        Self {
            incidents,
            boundaries,
            report: CleaningReport {
                rows_in: rows,
                rows_out: rows,
                ..CleaningReport::default()
            },
        }
    }

    /// Clean the raw incident table and take ownership of both tables.
    pub fn from_raw(raw: RawDataset) -> Result<Self, ProcessorError> {
        let (incidents, report) = DataProcessor::clean(&raw.incidents)?;
        Ok(Self {
            incidents,
            boundaries: raw.boundaries,
            report,
        })
    }

    pub fn incidents(&self) -> &DataFrame {
        &self.incidents
    }

    pub fn boundaries(&self) -> &[NeighbourhoodBoundary] {
        &self.boundaries
    }

    pub fn cleaning_report(&self) -> CleaningReport {
        self.report
    }

    pub fn row_count(&self) -> usize {
        self.incidents.height()
    }
}
