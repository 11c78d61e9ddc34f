//! Error handling for feed sources

use crate::consts::panel_consts::ERROR_BODY_LIMIT;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was not a `{ "updates": [...] }` document.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading a local feed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured location could not be turned into a URL or path.
    #[error("Invalid source location {location}: {reason}")]
    InvalidLocation { location: String, reason: String },
}

impl SourceError {
    pub async fn from_response(response: reqwest::Response) -> SourceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        SourceError::Http {
            status: status.as_u16(),
            message: summarize_body(status, &body),
        }
    }
}

/// First line of a plain-text error body, cut to [`ERROR_BODY_LIMIT`] characters.
/// Markup and empty bodies give way to the status's canonical reason.
fn summarize_body(status: StatusCode, body: &str) -> String {
    let line = body.trim().lines().next().unwrap_or("").trim();
    if line.is_empty() || line.starts_with('<') {
        return status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();
    }
    match line.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((end, _)) => format!("{}...", &line[..end]),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_body_is_kept() {
        assert_eq!(
            summarize_body(StatusCode::SERVICE_UNAVAILABLE, "maintenance\n"),
            "maintenance"
        );
    }

    #[test]
    fn test_html_page_becomes_reason() {
        let page = "<!DOCTYPE html>\n<html><body><h1>404 Not Found</h1></body></html>";
        assert_eq!(summarize_body(StatusCode::NOT_FOUND, page), "Not Found");
        assert_eq!(
            summarize_body(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_long_body_is_cut() {
        let body = format!("{}\nsecond line", "é".repeat(ERROR_BODY_LIMIT + 50));
        let message = summarize_body(StatusCode::BAD_GATEWAY, &body);
        assert_eq!(message.chars().count(), ERROR_BODY_LIMIT + 3);
        assert!(message.ends_with("..."));
        assert!(!message.contains("second line"));
    }
}
