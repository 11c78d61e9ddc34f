//! Feed source read from the local filesystem

use super::{FeedSource, SourceError};
use crate::feed::UpdateFeed;
use std::path::PathBuf;

pub struct FileSource {
    path: PathBuf,
    location: String,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait::async_trait]
impl FeedSource for FileSource {
    async fn fetch(&self) -> Result<UpdateFeed, SourceError> {
        let body = tokio::fs::read(&self.path).await?;
        Ok(UpdateFeed::from_json_slice(&body)?)
    }

    fn location(&self) -> &str {
        &self.location
    }
}
