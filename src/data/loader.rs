//! Dataset Loader Module
//! Downloads the incident table on first run and reads both inputs with Polars.

use crate::config::DashboardConfig;
use crate::data::boundary::{parse_boundaries, BoundaryError, NeighbourhoodBoundary};
use crate::data::schema::NULL_MARKERS;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to download {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed incident table {path}: {source}")]
    MalformedIncidents { path: PathBuf, source: PolarsError },
    #[error("Malformed boundary file {path}: {source}")]
    MalformedBoundaries {
        path: PathBuf,
        source: BoundaryError,
    },
}

impl LoaderError {
    /// Remote retrieval failed, as opposed to a local read or parse.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, LoaderError::Fetch { .. })
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        LoaderError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Both input tables exactly as read from disk.
pub struct RawDataset {
    pub incidents: DataFrame,
    pub boundaries: Vec<NeighbourhoodBoundary>,
}

/// Locates, fetches and reads the incident and boundary tables.
pub struct DatasetLoader<'a> {
    config: &'a DashboardConfig,
}

impl<'a> DatasetLoader<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    /// Read both tables, downloading the incident table first if needed.
    pub fn load(&self, progress: &mut dyn FnMut(&str)) -> Result<RawDataset, LoaderError> {
        if self.ensure_incident_file(progress)? {
            log::info!("Cached incident table at {}", self.config.incident_path.display());
        }

        progress("Reading incident table...");
        let incidents = Self::read_incidents(&self.config.incident_path)?;
        log::info!(
            "Read {} incident rows, {} columns",
            incidents.height(),
            incidents.width()
        );

        progress("Reading neighbourhood boundaries...");
        let boundaries = Self::read_boundaries(&self.config.boundary_path)?;
        log::info!("Read {} neighbourhood boundaries", boundaries.len());

        Ok(RawDataset {
            incidents,
            boundaries,
        })
    }

    /// Download the incident table if it is not on disk yet.
    ///
    /// Returns whether a download happened.
    pub fn ensure_incident_file(&self, progress: &mut dyn FnMut(&str)) -> Result<bool, LoaderError> {
        let path = &self.config.incident_path;
        if path.exists() {
            log::debug!("Incident table present at {}", path.display());
            return Ok(false);
        }

        let url = self.config.remote_url();
        progress("Downloading incident table...");
        log::info!("{} not found, downloading from {}", path.display(), url);
        download(&url, path)?;
        Ok(true)
    }

    /// Read the incident CSV with every column as text.
    pub fn read_incidents(path: &Path) -> Result<DataFrame, LoaderError> {
        let malformed = |source: PolarsError| LoaderError::MalformedIncidents {
            path: path.to_path_buf(),
            source,
        };

        let null_values = NullValues::AllColumns(NULL_MARKERS.iter().map(|m| (*m).into()).collect());

        // A zero-row inference window keeps codes like "NSA" and "097" intact.
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_null_values(Some(null_values))
            .finish()
            .map_err(malformed)?
            .collect()
            .map_err(malformed)
    }

    pub fn read_boundaries(path: &Path) -> Result<Vec<NeighbourhoodBoundary>, LoaderError> {
        let text = fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
        parse_boundaries(&text).map_err(|source| LoaderError::MalformedBoundaries {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Stream `url` into `dest`, only moving it into place once complete.
pub fn download(url: &str, dest: &Path) -> Result<u64, LoaderError> {
    let fetch_error = |reason: String| LoaderError::Fetch {
        url: url.to_string(),
        reason,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LoaderError::io(parent, e))?;
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;
    let mut response = client
        .get(url)
        .send()
        .map_err(|e| fetch_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(fetch_error(format!("server returned {}", response.status())));
    }

    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/html"));
    if is_html {
        return Err(fetch_error(
            "received an HTML page instead of the CSV file".to_string(),
        ));
    }

    let expected = response.content_length();
    let part = partial_path(dest);
    let mut file = File::create(&part).map_err(|e| LoaderError::io(&part, e))?;

    let written = match response.copy_to(&mut file) {
        Ok(n) => n,
        Err(e) => {
            fs::remove_file(&part).ok();
            return Err(fetch_error(e.to_string()));
        }
    };
    file.flush().map_err(|e| LoaderError::io(&part, e))?;
    drop(file);

    if let Err(reason) = check_complete(written, expected) {
        fs::remove_file(&part).ok();
        return Err(fetch_error(reason));
    }

    fs::rename(&part, dest).map_err(|e| LoaderError::io(dest, e))?;
    log::info!("Downloaded {} bytes to {}", written, dest.display());
    Ok(written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

fn check_complete(written: u64, expected: Option<u64>) -> Result<(), String> {
    if written == 0 {
        return Err("empty response body".to_string());
    }
    match expected {
        Some(len) if len != written => Err(format!(
            "incomplete download: got {} of {} bytes",
            written, len
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Aggregator, Dimension};
    use crate::data::DataProcessor;

    #[test]
    fn incomplete_bodies_are_rejected() {
        assert!(check_complete(0, None).is_err());
        assert!(check_complete(10, Some(20)).is_err());
        assert!(check_complete(20, Some(20)).is_ok());
        assert!(check_complete(5, None).is_ok());
    }

    #[test]
    fn partial_file_sits_next_to_destination() {
        assert_eq!(
            partial_path(Path::new("data/major-crime-indicators.csv")),
            PathBuf::from("data/major-crime-indicators.csv.part")
        );
    }

    #[test]
    fn reads_every_column_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mci.csv");
        fs::write(
            &path,
            "MCI_CATEGORY,OCC_YEAR,HOOD_140\nAssault,2019,097\nTheft,,NSA\n",
        )
        .unwrap();

        let df = DatasetLoader::read_incidents(&path).unwrap();
        assert_eq!(df.height(), 2);
        let hood = df.column("HOOD_140").unwrap();
        assert_eq!(hood.dtype(), &DataType::String);
        assert_eq!(hood.str().unwrap().get(0), Some("097"));
        assert_eq!(df.column("OCC_YEAR").unwrap().null_count(), 1);
    }

    #[test]
    fn null_markers_are_missing_and_dropped_by_the_cleaner() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mci.csv");
        fs::write(
            &path,
            "MCI_CATEGORY,OCC_HOUR,OCC_DAY\nAssault,NaN,1\nTheft,NA,2\nRobbery,3,3\nFraud,4,null\nArson,5,N/A\n",
        )
        .unwrap();

        let df = DatasetLoader::read_incidents(&path).unwrap();
        assert_eq!(df.column("OCC_HOUR").unwrap().null_count(), 2);
        assert_eq!(df.column("OCC_DAY").unwrap().null_count(), 2);

        let (clean, report) = DataProcessor::clean(&df).unwrap();
        assert_eq!(clean.height(), 1);
        assert_eq!(report.dropped_missing, 4);

        let hours = Aggregator::default()
            .aggregate_frame(&clean, Dimension::Hour)
            .unwrap();
        let labels: Vec<_> = hours.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["3", "3"]);
    }

    #[test]
    fn sentinel_and_padded_codes_are_not_null_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mci.csv");
        fs::write(&path, "HOOD_140,NEIGHBOURHOOD_140\nNSA,NSA\n097,Yonge-St.Clair\n").unwrap();

        let df = DatasetLoader::read_incidents(&path).unwrap();
        assert_eq!(df.column("HOOD_140").unwrap().null_count(), 0);
        assert_eq!(df.column("HOOD_140").unwrap().str().unwrap().get(0), Some("NSA"));
    }

    #[test]
    fn present_file_is_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mci.csv");
        fs::write(&path, "MCI_CATEGORY\nAssault\n").unwrap();

        let config = DashboardConfig {
            incident_path: path,
            download_url: "http://127.0.0.1:9/{id}".to_string(),
            ..DashboardConfig::default()
        };
        let downloaded = DatasetLoader::new(&config)
            .ensure_incident_file(&mut |_: &str| {})
            .unwrap();
        assert!(!downloaded);
    }

    #[test]
    fn unreachable_remote_is_a_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            incident_path: dir.path().join("missing.csv"),
            download_url: "http://127.0.0.1:9/{id}".to_string(),
            ..DashboardConfig::default()
        };

        let err = DatasetLoader::new(&config)
            .ensure_incident_file(&mut |_: &str| {})
            .unwrap_err();
        assert!(err.is_fetch_failure());
        assert!(!dir.path().join("missing.csv").exists());
        assert!(!dir.path().join("missing.csv.part").exists());
    }

    #[test]
    fn missing_boundary_file_is_io_error() {
        let err = DatasetLoader::read_boundaries(Path::new("/nonexistent/hoods.geojson"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
