//! Static Chart Renderer
//! Writes PNG bar charts of every non-spatial dimension for offline sharing.
//!
//! Layout of each image:
//! 1. Title: the dimension's caption
//! 2. One bar per bucket, shaded on the red scale
//! 3. Bucket labels under the bars, counts on the vertical axis

use crate::aggregate::{AggregateBucket, Aggregator, Dimension};
use crate::charts::captions::Captions;
use crate::charts::palette::{descending_level, rank_level, reds, to_plotters};
use crate::data::DataContext;
use plotters::prelude::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Dimensions written by [`StaticChartRenderer::export_snapshot`].
pub const SNAPSHOT_DIMENSIONS: [Dimension; 7] = [
    Dimension::Category,
    Dimension::PremisesType,
    Dimension::Year,
    Dimension::DayOfMonth,
    Dimension::Month,
    Dimension::DayOfWeek,
    Dimension::Hour,
];

pub const SNAPSHOT_SIZE: (u32, u32) = (1200, 700);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Chart rendering failed: {0}")]
    Render(String),
    #[error("Nothing to draw for {0:?}")]
    EmptyChart(Dimension),
}

/// What a snapshot export produced.
#[derive(Debug, Default)]
pub struct SnapshotReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(Dimension, String)>,
}

pub fn snapshot_file_name(dimension: Dimension) -> String {
    format!("crime_{}.png", dimension.slug())
}

/// Buckets as drawn in a static bar chart. The hour loop closure is dropped.
fn bars_for(dimension: Dimension, mut buckets: Vec<AggregateBucket>) -> Vec<AggregateBucket> {
    if dimension == Dimension::Hour && buckets.len() > 1 {
        buckets.pop();
    }
    buckets
}

fn bar_shades(dimension: Dimension, buckets: &[AggregateBucket]) -> Vec<RGBColor> {
    let n = buckets.len();
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let level = match (dimension, b.rank) {
                (_, Some(rank)) => rank_level(rank, n),
                (Dimension::Category | Dimension::PremisesType, None) => descending_level(i, n),
                _ => 0.8,
            };
            to_plotters(reds(level))
        })
        .collect()
}

fn render_error<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Render(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Draw `buckets` as a vertical bar chart into a PNG at `path`.
    pub fn render_bar_chart(
        dimension: Dimension,
        buckets: &[AggregateBucket],
        captions: &Captions,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        if buckets.is_empty() {
            return Err(ExportError::EmptyChart(dimension));
        }

        let n = buckets.len() as u32;
        let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
        let y_max = max + max / 10 + 1;
        let labels: Vec<String> = buckets.iter().map(|b| b.label.clone()).collect();
        let shades = bar_shades(dimension, buckets);

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(captions.dimension(dimension), ("sans-serif", 30))
            .margin(15)
            .x_label_area_size(if n > 12 { 60 } else { 40 })
            .y_label_area_size(70)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u64..y_max)
            .map_err(render_error)?;

        let label_of = |v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n as usize)
            .x_label_formatter(&label_of)
            .x_desc(captions.dimension(dimension))
            .y_desc(captions.incidents_axis)
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(buckets.iter().zip(&shades).enumerate().map(|(i, (b, shade))| {
                let i = i as u32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), b.count)],
                    shade.filled(),
                );
                bar.set_margin(0, 0, 4, 4);
                bar
            }))
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }

    /// Render every non-spatial dimension into `dir` in parallel.
    ///
    /// A dimension that cannot be aggregated or drawn is reported in
    /// [`SnapshotReport::failed`] without stopping the others.
    pub fn export_snapshot(
        ctx: &DataContext,
        aggregator: &Aggregator,
        captions: &Captions,
        dir: &Path,
    ) -> Result<SnapshotReport, ExportError> {
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let results: Vec<(Dimension, Result<PathBuf, String>)> = SNAPSHOT_DIMENSIONS
            .par_iter()
            .map(|&dimension| {
                let path = dir.join(snapshot_file_name(dimension));
                let outcome = aggregator
                    .aggregate(ctx, dimension)
                    .map_err(|e| e.to_string())
                    .and_then(|buckets| {
                        let bars = bars_for(dimension, buckets);
                        Self::render_bar_chart(dimension, &bars, captions, &path, SNAPSHOT_SIZE)
                            .map_err(|e| e.to_string())
                    })
                    .map(|()| path);
                (dimension, outcome)
            })
            .collect();

        let mut report = SnapshotReport::default();
        for (dimension, outcome) in results {
            match outcome {
                Ok(path) => report.written.push(path),
                Err(reason) => {
                    log::warn!("Snapshot of {:?} skipped: {}", dimension, reason);
                    report.failed.push((dimension, reason));
                }
            }
        }
        log::info!(
            "Exported {} charts to {}",
            report.written.len(),
            dir.display()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AggregationPolicy, Locale};
    use polars::prelude::*;

    #[test]
    fn file_names_follow_dimension() {
        assert_eq!(snapshot_file_name(Dimension::DayOfWeek), "crime_day_of_week.png");
        assert!(!SNAPSHOT_DIMENSIONS.contains(&Dimension::Neighbourhood));
    }

    #[test]
    fn hour_bars_drop_the_closing_bucket() {
        let hours = vec![
            AggregateBucket::new("0", 2),
            AggregateBucket::new("5", 1),
            AggregateBucket::new("0", 2),
        ];
        assert_eq!(bars_for(Dimension::Hour, hours.clone()).len(), 2);
        assert_eq!(bars_for(Dimension::Month, hours).len(), 3);
    }

    #[test]
    fn ranked_bars_use_rank_shades() {
        let mut years = vec![AggregateBucket::new("2019", 1), AggregateBucket::new("2020", 9)];
        years[0].rank = Some(2);
        years[1].rank = Some(1);
        let shades = bar_shades(Dimension::Year, &years);
        assert_eq!(shades[1], to_plotters(reds(1.0)));
    }

    #[test]
    fn empty_chart_is_refused_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let err = StaticChartRenderer::render_bar_chart(
            Dimension::Month,
            &[],
            Captions::for_locale(Locale::English),
            &path,
            SNAPSHOT_SIZE,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::EmptyChart(Dimension::Month)));
        assert!(!path.exists());
    }

    #[test]
    fn missing_dimensions_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DataContext::new(df!("OCC_YEAR" => Vec::<String>::new()).unwrap(), Vec::new());

        let report = StaticChartRenderer::export_snapshot(
            &ctx,
            &Aggregator::new(AggregationPolicy::default()),
            Captions::for_locale(Locale::Indonesian),
            dir.path(),
        )
        .unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.failed.len(), SNAPSHOT_DIMENSIONS.len());
    }
}
