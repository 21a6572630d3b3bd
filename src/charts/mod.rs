//! Charts module - Interactive views, map raster and PNG export

mod captions;
mod choropleth;
pub mod palette;
mod plotter;
mod renderer;

pub use captions::Captions;
pub use choropleth::{ChoroplethMap, MapRegion};
pub use plotter::{ChartPlotter, LINE_COLOR};
pub use renderer::{
    snapshot_file_name, ExportError, SnapshotReport, StaticChartRenderer, SNAPSHOT_DIMENSIONS,
};
