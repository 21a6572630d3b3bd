//! Data Processor Module
//! Cleans the raw incident table: missing values, "NSA" sentinels, duplicates.

use crate::data::schema::{NSA_SENTINEL, SENTINEL_COLUMNS};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Row counts before and after each cleaning step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub rows_in: usize,
    pub dropped_missing: usize,
    pub dropped_sentinel: usize,
    pub dropped_duplicates: usize,
    pub rows_out: usize,
}

/// Removes rows that would distort the aggregates. Never edits a row.
pub struct DataProcessor;

impl DataProcessor {
    /// Drop incomplete rows, sentinel neighbourhoods and exact duplicates.
    pub fn clean(df: &DataFrame) -> Result<(DataFrame, CleaningReport), ProcessorError> {
        let rows_in = df.height();

        let complete = Self::drop_missing(df)?;
        let located = Self::drop_sentinels(&complete)?;
        let unique = Self::drop_duplicates(&located)?;

        let report = CleaningReport {
            rows_in,
            dropped_missing: rows_in - complete.height(),
            dropped_sentinel: complete.height() - located.height(),
            dropped_duplicates: located.height() - unique.height(),
            rows_out: unique.height(),
        };
        log::info!(
            "Cleaned incidents: {} in, {} missing, {} NSA, {} duplicate, {} kept",
            report.rows_in,
            report.dropped_missing,
            report.dropped_sentinel,
            report.dropped_duplicates,
            report.rows_out
        );

        Ok((unique, report))
    }

    /// Drop any row with a null in any column.
    pub fn drop_missing(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        Ok(df.clone().lazy().drop_nulls(None).collect()?)
    }

    /// Drop rows whose neighbourhood code or name is "NSA" at either resolution.
    ///
    /// Sentinel columns missing from the table are skipped.
    pub fn drop_sentinels(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let predicate = SENTINEL_COLUMNS
            .iter()
            .filter(|name| df.column(name).is_ok())
            .map(|name| col(*name).cast(DataType::String).neq(lit(NSA_SENTINEL)))
            .reduce(|acc, expr| acc.and(expr));

        match predicate {
            Some(predicate) => Ok(df.clone().lazy().filter(predicate).collect()?),
            None => Ok(df.clone()),
        }
    }

    /// Keep the first of each group of identical rows, preserving order.
    pub fn drop_duplicates(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        Ok(df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> DataFrame {
        df!(
            "MCI_CATEGORY" => [Some("Assault"), Some("Theft"), None, Some("Assault"), Some("Robbery"), Some("Assault")],
            "HOOD_140" => [Some("97"), Some("1"), Some("2"), Some("NSA"), Some("5"), Some("97")],
            "NEIGHBOURHOOD_140" => [Some("Yonge"), Some("Humber"), Some("X"), Some("NSA"), Some("NSA"), Some("Yonge")],
            "HOOD_158" => [Some("170"), Some("1"), Some("2"), Some("NSA"), Some("5"), Some("170")],
            "NEIGHBOURHOOD_158" => [Some("Yonge"), Some("Humber"), Some("X"), Some("NSA"), Some("Y"), Some("Yonge")]
        )
        .unwrap()
    }

    #[test]
    fn clean_applies_every_step() {
        let (clean, report) = DataProcessor::clean(&raw()).unwrap();

        assert_eq!(
            report,
            CleaningReport {
                rows_in: 6,
                dropped_missing: 1,
                dropped_sentinel: 2,
                dropped_duplicates: 1,
                rows_out: 2,
            }
        );
        let categories: Vec<_> = clean
            .column("MCI_CATEGORY")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(categories, vec![Some("Assault"), Some("Theft")]);
    }

    #[test]
    fn sentinel_filter_skips_absent_columns() {
        let df = df!(
            "MCI_CATEGORY" => ["Assault", "Theft"],
            "HOOD_140" => ["NSA", "1"]
        )
        .unwrap();

        let cleaned = DataProcessor::drop_sentinels(&df).unwrap();
        assert_eq!(cleaned.height(), 1);
    }

    #[test]
    fn table_without_neighbourhoods_is_untouched_by_sentinel_step() {
        let df = df!("MCI_CATEGORY" => ["NSA", "Theft"]).unwrap();
        assert_eq!(DataProcessor::drop_sentinels(&df).unwrap().height(), 2);
    }

    #[test]
    fn duplicates_keep_first_occurrence_in_order() {
        let df = df!(
            "A" => ["x", "y", "x", "z", "y"],
            "B" => ["1", "2", "1", "3", "9"]
        )
        .unwrap();

        let unique = DataProcessor::drop_duplicates(&df).unwrap();
        let a: Vec<_> = unique.column("A").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(a, vec![Some("x"), Some("y"), Some("z"), Some("y")]);
    }

    #[test]
    fn empty_table_stays_empty() {
        let df = df!(
            "MCI_CATEGORY" => Vec::<String>::new(),
            "HOOD_140" => Vec::<String>::new()
        )
        .unwrap();
        let (clean, report) = DataProcessor::clean(&df).unwrap();
        assert_eq!(clean.height(), 0);
        assert_eq!(report.rows_out, 0);
    }
}
