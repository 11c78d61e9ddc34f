use crate::logging::LogLevel;
use crate::source::SourceError;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Log level for a source failure the loader is about to skip past.
    pub fn classify_source_error(&self, error: &SourceError) -> LogLevel {
        match error {
            // Expected: fallback paths that don't exist on this deployment
            SourceError::Http { status, .. } if *status == 404 => LogLevel::Debug,
            SourceError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => LogLevel::Debug,

            // A static host answering with an HTML error page
            SourceError::Decode(_) => LogLevel::Debug,

            // Server errors - temporary issues
            SourceError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Network issues - usually temporary
            SourceError::Reqwest(_) => LogLevel::Warn,

            // Misconfiguration
            SourceError::InvalidLocation { .. } => LogLevel::Error,

            _ => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
