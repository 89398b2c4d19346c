use std::fmt;
use std::path::PathBuf;

use chrono::Duration;
use rust_embed::RustEmbed;

use crate::dataset::loader::{Dataset, DatasetError, LoadReport};
use crate::store::DatasetCache;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

const SAMPLE_FILE: &str = "words-sample.csv";

/// Where the word list comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetSource {
    Embedded,
    File(PathBuf),
    Url(String),
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Embedded => f.write_str("embedded sample"),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => f.write_str(url),
        }
    }
}

pub fn embedded_csv() -> Option<String> {
    embedded_file(SAMPLE_FILE)
}

/// A bundled asset as text.
pub fn embedded_file(name: &str) -> Option<String> {
    let file = Assets::get(name)?;
    String::from_utf8(file.data.into_owned()).ok()
}

pub fn load_embedded() -> Result<(Dataset, LoadReport), DatasetError> {
    let csv = embedded_csv().ok_or_else(|| {
        DatasetError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "embedded sample dataset missing",
        ))
    })?;
    Dataset::from_csv_str(&csv)
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Result<String, DatasetError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| DatasetError::Fetch(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| DatasetError::Fetch(e.to_string()))?;
    if !response.status().is_success() {
        return Err(DatasetError::Fetch(format!("HTTP {}", response.status())));
    }
    response
        .text()
        .map_err(|e| DatasetError::Fetch(e.to_string()))
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(url: &str) -> Result<String, DatasetError> {
    Err(DatasetError::Fetch(format!(
        "network support disabled, cannot fetch {url}"
    )))
}

impl DatasetSource {
    /// Loads the dataset. Remote sources go through `cache`: a fresh cached
    /// copy wins, a fetch failure falls back to any cached copy, and as a
    /// last resort the embedded sample is used.
    pub fn load(
        &self,
        cache: Option<&DatasetCache>,
        max_age: Duration,
    ) -> Result<(Dataset, LoadReport), DatasetError> {
        match self {
            DatasetSource::File(path) => Dataset::from_path(path),
            _ => self.load_csv(cache, max_age, Dataset::from_csv_str, load_embedded),
        }
    }

    /// Reads CSV text from this source and hands it to `parse`, with the same
    /// cache and fallback rules as [`DatasetSource::load`]. `embedded` stands
    /// in for the built-in sample.
    pub fn load_csv<T, E>(
        &self,
        cache: Option<&DatasetCache>,
        max_age: Duration,
        parse: impl Fn(&str) -> Result<T, E>,
        embedded: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DatasetError> + fmt::Display,
    {
        match self {
            DatasetSource::Embedded => embedded(),
            DatasetSource::File(path) => {
                let csv = std::fs::read_to_string(path).map_err(DatasetError::Io)?;
                parse(&csv)
            }
            DatasetSource::Url(url) => load_remote(url, cache, max_age, parse, embedded),
        }
    }
}

fn load_remote<T, E>(
    url: &str,
    cache: Option<&DatasetCache>,
    max_age: Duration,
    parse: impl Fn(&str) -> Result<T, E>,
    embedded: impl FnOnce() -> Result<T, E>,
) -> Result<T, E>
where
    E: From<DatasetError> + fmt::Display,
{
    if let Some(cached) = cache.and_then(|c| c.load_fresh(url, max_age)) {
        match parse(&cached.csv) {
            Ok(loaded) => {
                log::info!("using cached copy of {url} from {}", cached.fetched_at);
                return Ok(loaded);
            }
            Err(e) => log::warn!("cached copy of {url} unusable: {e}"),
        }
    }

    let fetched = fetch_url(url).map_err(E::from).and_then(|csv| {
        let loaded = parse(&csv)?;
        Ok((csv, loaded))
    });
    match fetched {
        Ok((csv, loaded)) => {
            if let Some(cache) = cache
                && let Err(e) = cache.save(url, &csv)
            {
                log::warn!("failed to cache {url}: {e:#}");
            }
            Ok(loaded)
        }
        Err(e) => {
            log::warn!("fetching {url} failed: {e}");
            if let Some(cached) = cache.and_then(|c| c.load_any(url))
                && let Ok(loaded) = parse(&cached.csv)
            {
                log::info!("falling back to cached copy from {}", cached.fetched_at);
                return Ok(loaded);
            }
            log::warn!("falling back to the embedded sample");
            embedded()
        }
    }
}
