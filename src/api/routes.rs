use axum::{
    extract::{rejection::FormRejection, Form, State},
    response::Response,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::api::models::{PageView, SubmissionForm};
use crate::api::response;
use crate::prompt::{build_prompt, normalize_video_url};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(render_form).post(handle_submission))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn render_form() -> Response {
    response::success(PageView::empty())
}

async fn handle_submission(
    State(state): State<AppState>,
    form: std::result::Result<Form<SubmissionForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected form body");
            let err = AppError::InvalidInput(
                "The form could not be read. Please submit a YouTube URL.".to_string(),
            );
            return response::error(err.status(), err.user_message(), None);
        }
    };

    let submitted = form.youtube_url.clone();
    let start_time = Instant::now();

    // Overall bound on the submission, on top of the HTTP client's own timeout
    let result = tokio::time::timeout(
        state.config.request_timeout,
        process_submission(&state, form),
    )
    .await
    .unwrap_or_else(|_| {
        Err(AppError::UpstreamTimeout(format!(
            "no reply within {:?}",
            state.config.request_timeout
        )))
    });

    let elapsed = start_time.elapsed();
    match result {
        Ok(view) => {
            tracing::info!(?elapsed, "Summary rendered");
            response::success(view)
        }
        Err(err) => {
            if err.is_user_error() {
                tracing::warn!(error = %err, "Submission rejected");
            } else {
                tracing::error!(error = %err, ?elapsed, "Submission failed");
            }
            let echoed = submitted.map(|url| url.trim().to_string()).filter(|url| !url.is_empty());
            response::error(err.status(), err.user_message(), echoed)
        }
    }
}

async fn process_submission(state: &AppState, form: SubmissionForm) -> Result<PageView> {
    let video_url = normalize_video_url(form.youtube_url.as_deref())?;
    tracing::info!(video_url = %video_url, "Summarizing video");

    let prompt = build_prompt(&video_url);
    tracing::debug!(prompt_len = prompt.len(), "Built prompt");

    let llm_start = Instant::now();
    let summary = state.summarizer.generate(&prompt).await?;
    tracing::debug!(elapsed = ?llm_start.elapsed(), summary_len = summary.len(), "Summarizer replied");

    Ok(PageView::with_summary(video_url, summary))
}
