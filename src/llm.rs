use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};

/// The hosted text-generation service, seen from the request handlers.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Gemini `generateContent` client. One instance is built at startup and shared.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            endpoint: config.gemini_endpoint.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        };

        let started = Instant::now();
        let res = self
            .http
            .post(self.request_url())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(300).collect();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, detail.trim())));
        }

        let payload: GenerateContentResponse = res.json().await?;
        tracing::debug!(model = %self.model, elapsed = ?started.elapsed(), "Gemini replied");

        extract_text(payload)
    }
}

/// Joins the text parts of the first candidate, leaving the text itself untouched.
fn extract_text(payload: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = payload.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AppError::Upstream(format!("Prompt was blocked: {}", reason)));
    }

    let candidate = payload
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Upstream("Response contained no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(AppError::Upstream(format!(
            "Response contained no text (finish reason: {})",
            reason
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(endpoint: &str) -> GeminiClient {
        client_with(endpoint, "test-key", "5")
    }

    fn client_with(endpoint: &str, api_key: &str, timeout_secs: &str) -> GeminiClient {
        let config = Config::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some(api_key.to_string()),
            "GEMINI_ENDPOINT" => Some(endpoint.to_string()),
            "REQUEST_TIMEOUT_SECS" => Some(timeout_secs.to_string()),
            _ => None,
        })
        .unwrap();
        GeminiClient::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn sends_prompt_and_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Json(json!({
                "contents": [{"parts": [{"text": "Summarize the content of this YouTube video: https://youtu.be/abc123"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"parts": [{"text": "This video "}, {"text": "is about cats."}], "role": "model"},
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let text = client
            .generate("Summarize the content of this YouTube video: https://youtu.be/abc123")
            .await
            .unwrap();

        assert_eq!(text, "This video is about cats.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_maps_to_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error": {"message": "Resource has been exhausted"}}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server.url()).generate("prompt").await.unwrap_err();

        assert!(matches!(&err, AppError::Upstream(msg) if msg.contains("429")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_body_maps_to_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server.url()).generate("prompt").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn transport_errors_do_not_carry_the_api_key() {
        // Nothing listens on port 1, so the connection is refused.
        let client = client_with("http://127.0.0.1:1", "SUPER-SECRET-KEY", "5");

        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
        assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
        assert!(!format!("{:?}", err).contains("SUPER-SECRET-KEY"));
    }

    #[tokio::test]
    async fn silent_upstream_maps_to_timeout() {
        // Accepts the connection but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = client_with(&format!("http://{}", addr), "SUPER-SECRET-KEY", "1");
        let err = client.generate("prompt").await.unwrap_err();
        hold.abort();

        assert!(matches!(err, AppError::UpstreamTimeout(_)), "got {:?}", err);
        assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let payload: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        let err = extract_text(payload).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn empty_candidates_are_reported() {
        let payload: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(matches!(extract_text(payload), Err(AppError::Upstream(_))));

        let payload: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();
        let err = extract_text(payload).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn text_is_returned_verbatim() {
        let payload: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "  **Cats**\n\n- purring  \n"}]}}]
        }))
        .unwrap();
        assert_eq!(extract_text(payload).unwrap(), "  **Cats**\n\n- purring  \n");
    }
}
