//! GeoIP database loading from files.

use anyhow::{Context, Result};
use maxminddb::Reader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::geoip::metadata::extract_metadata;
use crate::geoip::{CityDatabase, DatabaseOpener, MaxMindCityDatabase, OpenFuture};

/// Opens a GeoLite2-City `.mmdb` file from disk.
///
/// How the file gets there (download, update schedule) is outside this crate.
#[derive(Debug, Clone)]
pub struct MmdbFileOpener {
    path: PathBuf,
}

impl MmdbFileOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatabaseOpener for MmdbFileOpener {
    fn open(&self) -> OpenFuture {
        let path = self.path.clone();
        Box::pin(async move {
            let database = load_from_file(&path).await?;
            Ok(Arc::new(database) as Arc<dyn CityDatabase>)
        })
    }
}

/// Loads a GeoIP database from a local file path
pub(crate) async fn load_from_file(path: &Path) -> Result<MaxMindCityDatabase> {
    log::info!("Loading GeoIP database from: {}", path.display());

    let db_bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read GeoIP database from {}", path.display()))?;

    let reader = Reader::from_source(db_bytes)
        .with_context(|| format!("Failed to parse GeoIP database from {}", path.display()))?;

    let metadata = extract_metadata(&reader, &path.to_string_lossy());

    Ok(MaxMindCityDatabase::new(reader, metadata))
}
