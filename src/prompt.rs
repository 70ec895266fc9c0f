use crate::error::{AppError, Result};

/// Instruction sentence the submitted URL is appended to.
pub const PROMPT_PREFIX: &str = "Summarize the content of this YouTube video: ";

/// Longest URL accepted from the form.
pub const MAX_VIDEO_URL_LENGTH: usize = 2048;

pub const MISSING_URL_MESSAGE: &str = "Please enter a YouTube URL.";

pub fn build_prompt(video_url: &str) -> String {
    let mut result = String::with_capacity(PROMPT_PREFIX.len() + video_url.len());
    result.push_str(PROMPT_PREFIX);
    result.push_str(video_url);
    result
}

/// Turns the raw form field into the URL that goes into the prompt.
///
/// Only hygiene is checked here. Whether the URL points at a real video is
/// left to the summarization service.
pub fn normalize_video_url(raw: Option<&str>) -> Result<String> {
    let trimmed = raw.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(MISSING_URL_MESSAGE.to_string()));
    }

    if trimmed.chars().count() > MAX_VIDEO_URL_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "The URL is too long (maximum {} characters).",
            MAX_VIDEO_URL_LENGTH
        )));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(AppError::InvalidInput(
            "The URL contains invalid characters.".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}
