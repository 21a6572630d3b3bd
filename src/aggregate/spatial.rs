//! Incident counts per neighbourhood polygon.

use crate::aggregate::calculator::{AggregateError, Aggregator};
use crate::aggregate::dimension::Dimension;
use crate::data::{DataContext, NeighbourhoodBoundary};
use serde::Deserialize;
use std::collections::HashMap;

/// How neighbourhood counts are matched to boundary polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialJoin {
    /// Only regions with at least one incident.
    #[default]
    Inner,
    /// Every region, zero-count ones included.
    KeepAllBoundaries,
}

/// A boundary paired with its incident count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionCount<'a> {
    pub boundary: &'a NeighbourhoodBoundary,
    pub count: u64,
}

impl Aggregator {
    /// Join `HOOD_140` counts to the boundary polygons on area code.
    ///
    /// Output follows boundary order. Codes without a polygon are dropped.
    pub fn aggregate_spatial<'a>(
        &self,
        ctx: &'a DataContext,
    ) -> Result<Vec<RegionCount<'a>>, AggregateError> {
        let counts: HashMap<String, u64> = self
            .aggregate(ctx, Dimension::Neighbourhood)?
            .into_iter()
            .map(|bucket| (bucket.label, bucket.count))
            .collect();

        Ok(join_boundaries(ctx.boundaries(), &counts, self.policy().spatial_join))
    }
}

fn join_boundaries<'a>(
    boundaries: &'a [NeighbourhoodBoundary],
    counts: &HashMap<String, u64>,
    join: SpatialJoin,
) -> Vec<RegionCount<'a>> {
    let regions: Vec<_> = boundaries
        .iter()
        .filter_map(|boundary| {
            let count = counts.get(&boundary.area_code).copied();
            match (count, join) {
                (Some(count), _) => Some(RegionCount { boundary, count }),
                (None, SpatialJoin::KeepAllBoundaries) => Some(RegionCount { boundary, count: 0 }),
                (None, SpatialJoin::Inner) => None,
            }
        })
        .collect();

    let orphans: Vec<&str> = counts
        .keys()
        .filter(|code| !boundaries.iter().any(|b| &b.area_code == *code))
        .map(String::as_str)
        .collect();
    if !orphans.is_empty() {
        log::debug!(
            "{} neighbourhood codes have no boundary: {:?}",
            orphans.len(),
            orphans
        );
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::calculator::AggregationPolicy;
    use polars::prelude::*;

    fn region(code: &str, name: &str) -> NeighbourhoodBoundary {
        NeighbourhoodBoundary {
            area_code: code.to_string(),
            area_name: name.to_string(),
            rings: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
        }
    }

    fn context() -> DataContext {
        let incidents = df!("HOOD_140" => ["97", "097", "1", "999"]).unwrap();
        DataContext::new(
            incidents,
            vec![region("1", "West Humber"), region("2", "Mount Olive"), region("97", "Yonge-St.Clair")],
        )
    }

    fn summary(regions: &[RegionCount<'_>]) -> Vec<(String, u64)> {
        regions
            .iter()
            .map(|r| (r.boundary.area_name.clone(), r.count))
            .collect()
    }

    #[test]
    fn inner_join_drops_unmatched_on_both_sides() {
        let ctx = context();
        let regions = Aggregator::default().aggregate_spatial(&ctx).unwrap();
        assert_eq!(
            summary(&regions),
            vec![
                ("West Humber".to_string(), 1),
                ("Yonge-St.Clair".to_string(), 2)
            ]
        );
    }

    #[test]
    fn keep_all_includes_empty_regions() {
        let ctx = context();
        let aggregator = Aggregator::new(AggregationPolicy {
            spatial_join: SpatialJoin::KeepAllBoundaries,
            ..AggregationPolicy::default()
        });
        let regions = aggregator.aggregate_spatial(&ctx).unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[1].count, 0);
        assert_eq!(regions[1].boundary.area_code, "2");
    }

    #[test]
    fn no_boundaries_means_no_regions() {
        let ctx = DataContext::new(df!("HOOD_140" => ["1"]).unwrap(), Vec::new());
        assert!(Aggregator::default().aggregate_spatial(&ctx).unwrap().is_empty());
    }
}
