use serde::{Deserialize, Serialize};

/// Body of the POST form. The field is optional so a missing value reaches
/// our own validation instead of the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionForm {
    pub youtube_url: Option<String>,
}

/// Everything the page template can show.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub summary: Option<String>,
    pub error: Option<String>,
    pub video_url: Option<String>,
}

impl PageView {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_summary(video_url: String, summary: String) -> Self {
        Self {
            summary: Some(summary),
            error: None,
            video_url: Some(video_url),
        }
    }

    pub fn with_error(message: String, video_url: Option<String>) -> Self {
        Self {
            summary: None,
            error: Some(message),
            video_url,
        }
    }
}
