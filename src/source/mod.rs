//! Feed sources
//!
//! A source is one location that may hold an update feed: the API endpoint, a
//! static JSON file on the same site, or a file on disk. Sources are grouped
//! into a [`SourceChain`] which the loader walks in order.

pub mod error;
pub mod file;
pub mod http;

pub use error::SourceError;
pub use file::FileSource;
pub use http::HttpSource;

use crate::feed::UpdateFeed;
use reqwest::{Client, ClientBuilder, Url};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// A single place the feed can be fetched from.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and decode the feed. Any failure means "try the next source".
    async fn fetch(&self) -> Result<UpdateFeed, SourceError>;

    /// Human-readable location, used in diagnostics and as the feed origin.
    fn location(&self) -> &str;
}

/// Primary source plus ordered fallbacks.
#[derive(Default)]
pub struct SourceChain {
    pub primary: Option<Box<dyn FeedSource>>,
    pub fallbacks: Vec<Box<dyn FeedSource>>,
}

impl SourceChain {
    pub fn new(
        primary: Option<Box<dyn FeedSource>>,
        fallbacks: Vec<Box<dyn FeedSource>>,
    ) -> Self {
        Self { primary, fallbacks }
    }

    /// Number of sources the loader may attempt.
    pub fn len(&self) -> usize {
        self.primary.iter().count() + self.fallbacks.len()
    }

    #[allow(unused)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locations in attempt order.
    pub fn locations(&self) -> Vec<&str> {
        self.primary
            .iter()
            .chain(self.fallbacks.iter())
            .map(|source| source.location())
            .collect()
    }
}

/// Where a configured location actually points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(Url),
    File(PathBuf),
}

impl SourceLocation {
    /// Resolves a raw location the way a page would resolve a fetch path.
    ///
    /// `http(s)://` is used as-is and `file://` maps to a path. Anything else
    /// is joined onto `base` when there is one, and read from disk otherwise.
    pub fn resolve(raw: &str, base: Option<&Url>) -> Result<Self, SourceError> {
        let invalid = |reason: String| SourceError::InvalidLocation {
            location: raw.to_string(),
            reason,
        };

        if raw.trim().is_empty() {
            return Err(invalid("empty location".to_string()));
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Url::parse(raw)
                .map(SourceLocation::Url)
                .map_err(|e| invalid(e.to_string()));
        }

        if raw.starts_with("file://") {
            let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
            return url
                .to_file_path()
                .map(SourceLocation::File)
                .map_err(|_| invalid("not a local file path".to_string()));
        }

        match base {
            Some(base) => base
                .join(raw)
                .map(SourceLocation::Url)
                .map_err(|e| invalid(e.to_string())),
            None => Ok(SourceLocation::File(PathBuf::from(raw))),
        }
    }
}

/// Stand-in for a location that could not be resolved; every fetch fails.
struct UnresolvedSource {
    location: String,
    reason: String,
}

#[async_trait::async_trait]
impl FeedSource for UnresolvedSource {
    async fn fetch(&self) -> Result<UpdateFeed, SourceError> {
        Err(SourceError::InvalidLocation {
            location: self.location.clone(),
            reason: self.reason.clone(),
        })
    }

    fn location(&self) -> &str {
        &self.location
    }
}

/// Builds sources from raw locations, sharing one HTTP client.
pub struct SourceFactory {
    client: Client,
    base: Option<Url>,
}

impl SourceFactory {
    /// # Errors
    /// Returns an error if the base URL does not parse or the HTTP client cannot be built.
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self, SourceError> {
        let base = base_url
            .map(|raw| {
                Url::parse(raw).map_err(|e| SourceError::InvalidLocation {
                    location: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(format!("updates-panel/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base })
    }

    /// Builds one source. `bypass_cache` asks HTTP sources to skip any cache.
    /// An unresolvable location yields a source whose fetch always fails.
    pub fn source(&self, raw: &str, bypass_cache: bool) -> Box<dyn FeedSource> {
        match SourceLocation::resolve(raw, self.base.as_ref()) {
            Ok(SourceLocation::Url(url)) => {
                Box::new(HttpSource::new(self.client.clone(), url, bypass_cache))
            }
            Ok(SourceLocation::File(path)) => Box::new(FileSource::new(path)),
            Err(SourceError::InvalidLocation { location, reason }) => {
                Box::new(UnresolvedSource { location, reason })
            }
            Err(e) => Box::new(UnresolvedSource {
                location: raw.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// The primary uses normal caching; fallbacks always bypass the cache.
    pub fn chain(&self, primary: Option<&str>, fallbacks: &[String]) -> SourceChain {
        SourceChain::new(
            primary.map(|raw| self.source(raw, false)),
            fallbacks.iter().map(|raw| self.source(raw, true)).collect(),
        )
    }
}
