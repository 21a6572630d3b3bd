//! Startup pipeline: load, clean, and wrap into a [`DataContext`].

use crate::config::DashboardConfig;
use crate::data::{DataContext, DatasetLoader};
use anyhow::{Context, Result};

/// Run the loader and cleaner once. Any error here is fatal for the session.
pub fn build_context(
    config: &DashboardConfig,
    progress: &mut dyn FnMut(&str),
) -> Result<DataContext> {
    let raw = DatasetLoader::new(config)
        .load(progress)
        .context("Failed to load the crime dataset")?;

    progress("Cleaning incident table...");
    let ctx = DataContext::from_raw(raw).context("Failed to clean the incident table")?;

    if ctx.row_count() == 0 {
        log::warn!("No incidents left after cleaning");
    }
    Ok(ctx)
}
