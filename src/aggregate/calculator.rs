//! Aggregation Calculator Module
//! Groups cleaned incidents by one dimension, driven by the dimension table.

use crate::aggregate::dimension::{Dimension, DimensionSpec, KeyNormalizer, OrderPolicy, Rebin};
use crate::aggregate::locale::Locale;
use crate::aggregate::spatial::SpatialJoin;
use crate::config::{DashboardConfig, DEFAULT_OTHERS_THRESHOLD};
use crate::data::schema::normalize_numeric_label;
use crate::data::DataContext;
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

/// Label of the bucket collecting minor years.
pub const OTHERS_LABEL: &str = "Others";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Column {column} for {dimension:?} is not in the table")]
    MissingDimension {
        dimension: Dimension,
        column: &'static str,
    },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One grouped count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateBucket {
    pub label: String,
    pub count: u64,
    /// 1 = largest count; ties share the lowest rank.
    pub rank: Option<u32>,
}

impl AggregateBucket {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
            rank: None,
        }
    }
}

/// Tunables that change aggregate output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationPolicy {
    pub others_threshold: f64,
    pub locale: Locale,
    pub spatial_join: SpatialJoin,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            others_threshold: DEFAULT_OTHERS_THRESHOLD,
            locale: Locale::default(),
            spatial_join: SpatialJoin::default(),
        }
    }
}

impl From<&DashboardConfig> for AggregationPolicy {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            others_threshold: config.others_threshold,
            locale: config.locale,
            spatial_join: config.spatial_join,
        }
    }
}

/// Stateless grouping over a [`DataContext`]; every call recomputes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    policy: AggregationPolicy,
}

impl Aggregator {
    pub fn new(policy: AggregationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    pub fn aggregate(
        &self,
        ctx: &DataContext,
        dimension: Dimension,
    ) -> Result<Vec<AggregateBucket>, AggregateError> {
        self.aggregate_frame(ctx.incidents(), dimension)
    }

    /// Group `df` by `dimension` following its [`DimensionSpec`].
    pub fn aggregate_frame(
        &self,
        df: &DataFrame,
        dimension: Dimension,
    ) -> Result<Vec<AggregateBucket>, AggregateError> {
        let spec = dimension.spec();
        let counts = self.count_keys(df, dimension, &spec)?;

        let mut buckets = self.order(counts, spec.order);
        match spec.rebin {
            Rebin::None => {}
            Rebin::FoldMinor => buckets = fold_minor(buckets, self.policy.others_threshold),
            Rebin::CloseLoop => close_loop(&mut buckets),
        }
        if spec.ranked {
            assign_min_ranks(&mut buckets);
        }

        log::debug!("{:?}: {} buckets", dimension, buckets.len());
        Ok(buckets)
    }

    fn count_keys(
        &self,
        df: &DataFrame,
        dimension: Dimension,
        spec: &DimensionSpec,
    ) -> Result<HashMap<String, u64>, AggregateError> {
        let column = df
            .column(spec.column)
            .map_err(|_| AggregateError::MissingDimension {
                dimension,
                column: spec.column,
            })?;
        let as_text = column.cast(&DataType::String)?;

        // Tally raw cells first; only distinct values are normalised.
        let mut raw_counts: HashMap<&str, u64> = HashMap::new();
        for value in as_text.str()?.into_iter().flatten() {
            *raw_counts.entry(value).or_insert(0) += 1;
        }

        let mut counts: HashMap<String, u64> = HashMap::with_capacity(raw_counts.len());
        let mut unmatched = 0u64;
        for (value, n) in raw_counts {
            match self.normalize_key(spec.key, value) {
                Some(key) => *counts.entry(key).or_insert(0) += n,
                None => unmatched += n,
            }
        }
        if unmatched > 0 {
            log::debug!(
                "{:?}: {} values of {} not recognised",
                dimension,
                unmatched,
                spec.column
            );
        }
        Ok(counts)
    }

    fn normalize_key(&self, key: KeyNormalizer, raw: &str) -> Option<String> {
        match key {
            KeyNormalizer::Raw => Some(raw.to_string()),
            KeyNormalizer::Numeric => Some(normalize_numeric_label(raw)),
            KeyNormalizer::Calendar(calendar) => self
                .policy
                .locale
                .translate(calendar, raw)
                .map(str::to_string),
        }
    }

    fn order(&self, counts: HashMap<String, u64>, policy: OrderPolicy) -> Vec<AggregateBucket> {
        match policy {
            OrderPolicy::CountDescending => {
                let mut buckets: Vec<_> = counts
                    .into_iter()
                    .map(|(label, count)| AggregateBucket::new(label, count))
                    .collect();
                buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
                buckets
            }
            OrderPolicy::KeyAscending => {
                let mut buckets: Vec<_> = counts
                    .into_iter()
                    .map(|(label, count)| AggregateBucket::new(label, count))
                    .collect();
                buckets.sort_by(|a, b| compare_keys(&a.label, &b.label));
                buckets
            }
            OrderPolicy::Canonical(calendar) => self
                .policy
                .locale
                .labels(calendar)
                .iter()
                .map(|label| AggregateBucket::new(*label, counts.get(*label).copied().unwrap_or(0)))
                .collect(),
        }
    }
}

/// Finite numeric labels ascending by value, then everything else by text.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (finite_key(a), finite_key(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// "NaN" and "inf" parse as floats but are not orderable keys.
fn finite_key(label: &str) -> Option<f64> {
    label.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Merge every bucket whose share is below `threshold` into a trailing
/// "Others" bucket. The surviving buckets keep their order.
pub fn fold_minor(buckets: Vec<AggregateBucket>, threshold: f64) -> Vec<AggregateBucket> {
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    if total == 0 {
        return buckets;
    }

    let (major, minor): (Vec<_>, Vec<_>) = buckets
        .into_iter()
        .partition(|b| b.count as f64 / total as f64 >= threshold);

    let mut folded = major;
    if !minor.is_empty() {
        folded.push(AggregateBucket::new(
            OTHERS_LABEL,
            minor.iter().map(|b| b.count).sum(),
        ));
    }
    folded
}

/// Repeat the first bucket at the end. Empty input stays empty.
pub fn close_loop(buckets: &mut Vec<AggregateBucket>) {
    if let Some(first) = buckets.first().cloned() {
        buckets.push(first);
    }
}

/// Rank by count descending; equal counts share the minimum rank.
pub fn assign_min_ranks(buckets: &mut [AggregateBucket]) {
    let counts: Vec<u64> = buckets.iter().map(|b| b.count).collect();
    for bucket in buckets.iter_mut() {
        let larger = counts.iter().filter(|&&c| c > bucket.count).count();
        bucket.rank = Some(larger as u32 + 1);
    }
}
