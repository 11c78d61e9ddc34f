//! Updates Feed Loader
//!
//! Acquires the feed from an ordered [`SourceChain`]:
//!
//! 1. The primary source (normally `GET /api/updates`). A non-empty feed from
//!    it ends the load; no fallback is touched.
//! 2. Otherwise each fallback in declared order. The first one that answers
//!    with a non-empty feed wins.
//! 3. If nothing produced entries the result is an empty feed.
//!
//! Every attempt is isolated. Network errors, bad statuses and malformed bodies
//! become diagnostic events and the loader moves on. `load` never fails.

use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, EventSink, EventType};
use crate::feed::{LoadedFeed, UpdateFeed};
use crate::logging::LogLevel;
use crate::source::{FeedSource, SourceChain};

pub struct UpdatesFeedLoader {
    sources: SourceChain,
    classifier: ErrorClassifier,
    events: EventSink,
}

impl UpdatesFeedLoader {
    pub fn new(sources: SourceChain, events: EventSink) -> Self {
        Self {
            sources,
            classifier: ErrorClassifier::new(),
            events,
        }
    }

    #[allow(unused)]
    pub async fn load(&self) -> UpdateFeed {
        self.load_with_origin().await.feed
    }

    pub async fn load_with_origin(&self) -> LoadedFeed {
        if let Some(primary) = &self.sources.primary {
            if let Some(loaded) = self.attempt(primary.as_ref()).await {
                return loaded;
            }
            self.emit(
                "Primary source unavailable, trying fallbacks".to_string(),
                EventType::Skipped,
                LogLevel::Debug,
            );
        }

        for source in &self.sources.fallbacks {
            if let Some(loaded) = self.attempt(source.as_ref()).await {
                return loaded;
            }
        }

        self.emit(
            format!("No updates found in {} source(s)", self.sources.len()),
            EventType::Skipped,
            LogLevel::Info,
        );
        LoadedFeed::default()
    }

    async fn attempt(&self, source: &dyn FeedSource) -> Option<LoadedFeed> {
        match source.fetch().await {
            Ok(feed) if !feed.is_empty() => {
                self.emit(
                    format!("Loaded {} update(s) from {}", feed.len(), source.location()),
                    EventType::Success,
                    LogLevel::Info,
                );
                Some(LoadedFeed {
                    feed,
                    origin: Some(source.location().to_string()),
                })
            }
            Ok(_) => {
                self.emit(
                    format!("{} has no updates", source.location()),
                    EventType::Skipped,
                    LogLevel::Debug,
                );
                None
            }
            Err(e) => {
                self.emit(
                    format!("{} failed: {}", source.location(), e),
                    EventType::Error,
                    self.classifier.classify_source_error(&e),
                );
                None
            }
        }
    }

    fn emit(&self, msg: String, event_type: EventType, log_level: LogLevel) {
        self.events.emit(Event::loader_with_level(msg, event_type, log_level));
    }
}
