//! Source acquisition: local file first, remote URL as the fallback.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::csv::{read_csv_bytes, read_csv_file};
use crate::error::{IngestError, Result};
use crate::record_set::{RecordSet, SourceOrigin};
use crate::schema::conform_schema;

/// File name the dataset is published under.
pub const DEFAULT_DATA_PATH: &str = "owid-covid-data.csv";

/// Published location of the full dataset.
pub const DEFAULT_DATA_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.csv";

/// HTTP request timeout. The full dataset is large, so this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Where to look for the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    /// Local CSV path, tried first.
    pub local_path: PathBuf,
    /// URL fetched only when `local_path` does not exist.
    pub fallback_url: Option<String>,
}

impl Default for DataSource {
    fn default() -> Self {
        Self {
            local_path: PathBuf::from(DEFAULT_DATA_PATH),
            fallback_url: Some(DEFAULT_DATA_URL.to_string()),
        }
    }
}

impl DataSource {
    /// A local-only source with no remote fallback.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: path.into(),
            fallback_url: None,
        }
    }

    #[must_use]
    pub fn with_fallback_url(mut self, url: Option<String>) -> Self {
        self.fallback_url = url;
        self
    }
}

/// Fetches raw dataset bytes from a URL.
pub trait RemoteFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`RemoteFetcher`] backed by a blocking HTTP client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("covid-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IngestError::HttpClient {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl RemoteFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let remote_error = |e: reqwest::Error| IngestError::Remote {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url).send().map_err(remote_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::RemoteStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().map_err(remote_error)?;
        Ok(body.to_vec())
    }
}

/// Loads and conforms the dataset described by `source`.
///
/// The local file is read when it exists. Only a missing local file triggers
/// the remote fallback; any other local failure is returned as-is.
pub fn load_record_set(source: &DataSource, fetcher: &dyn RemoteFetcher) -> Result<RecordSet> {
    let start = Instant::now();
    let (frame, origin) = match read_csv_file(&source.local_path) {
        Ok(frame) => (frame, SourceOrigin::Local(source.local_path.clone())),
        Err(IngestError::FileNotFound { path }) => match &source.fallback_url {
            Some(url) => fetch_remote(&path, url, fetcher)?,
            None => return Err(IngestError::FileNotFound { path }),
        },
        Err(err) => return Err(err),
    };

    let table = conform_schema(frame, &origin.to_string())?;
    info!(
        origin = %origin,
        rows = table.height(),
        duration_ms = start.elapsed().as_millis(),
        "dataset loaded"
    );
    Ok(RecordSet::new(table, origin))
}

fn fetch_remote(
    missing: &Path,
    url: &str,
    fetcher: &dyn RemoteFetcher,
) -> Result<(polars::prelude::DataFrame, SourceOrigin)> {
    warn!(
        path = %missing.display(),
        url,
        "local dataset not found; fetching remote copy"
    );
    let bytes = fetcher.fetch(url)?;
    debug!(url, bytes = bytes.len(), "remote dataset downloaded");
    let frame = read_csv_bytes(bytes, url)?;
    Ok((frame, SourceOrigin::Remote(url.to_string())))
}
