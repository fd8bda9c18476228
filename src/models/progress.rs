//! Progress events streamed to the caller during a crawl.

use serde::{Deserialize, Serialize};

use super::EnrichedArticle;

/// Message carried by the terminal event of a successful run
pub const COMPLETED_MESSAGE: &str = "Search completed.";

/// One unit of the caller-facing stream.
///
/// Non-terminal events carry an article; the single terminal event carries
/// either `message` or `error` and always reports 100 percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Percentage complete, 0 to 100
    #[serde(rename = "progress")]
    pub percent: f64,

    /// Article completed by this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<EnrichedArticle>,

    /// Terminal success message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Terminal error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    /// An article event at `percent`
    pub fn article(article: EnrichedArticle, percent: f64) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
            article: Some(article),
            message: None,
            error: None,
        }
    }

    /// The terminal event of a run that ran to completion
    pub fn completed() -> Self {
        Self {
            percent: 100.0,
            article: None,
            message: Some(COMPLETED_MESSAGE.to_string()),
            error: None,
        }
    }

    /// The terminal event of a run that failed
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            percent: 100.0,
            article: None,
            message: None,
            error: Some(format!("An error occurred: {}", error)),
        }
    }

    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        self.message.is_some() || self.error.is_some()
    }

    /// Render as a server-sent-events frame (`data: <json>\n\n`)
    pub fn to_sse_frame(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// Percentage of `max_results` reached after `processed` articles, capped at 100
pub fn percent_complete(processed: usize, max_results: usize) -> f64 {
    if max_results == 0 {
        return 100.0;
    }
    (processed as f64 / max_results as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnrichedArticleBuilder;

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(0, 10), 0.0);
        assert_eq!(percent_complete(5, 10), 50.0);
        assert_eq!(percent_complete(12, 10), 100.0);
        assert_eq!(percent_complete(0, 0), 100.0);
    }

    #[test]
    fn test_terminal_events() {
        let done = ProgressEvent::completed();
        assert!(done.is_terminal());
        assert_eq!(done.percent, 100.0);

        let failed = ProgressEvent::failed("boom");
        assert!(failed.is_terminal());
        assert_eq!(failed.error.as_deref(), Some("An error occurred: boom"));

        let article = EnrichedArticleBuilder::new("T", "https://x/1/").build();
        assert!(!ProgressEvent::article(article, 10.0).is_terminal());
    }

    #[test]
    fn test_wire_shape() {
        let article = EnrichedArticleBuilder::new("T", "https://x/1/").build();
        let event = ProgressEvent::article(article, 25.0);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["progress"], 25.0);
        assert_eq!(value["article"]["title"], "T");
        assert!(value.get("message").is_none());
        assert!(value.get("error").is_none());

        let frame = ProgressEvent::completed().to_sse_frame().unwrap();
        assert_eq!(
            frame,
            "data: {\"progress\":100.0,\"message\":\"Search completed.\"}\n\n"
        );
    }
}
