//! Axum route handlers for the Screening API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::document::Document;
use crate::resumes::intake::{parse_uploads, UploadedFile};
use crate::screening::pipeline::{screen, ScreeningOptions, ScreeningReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScreeningRequest {
    pub job_description: String,
    pub resumes: Vec<Document>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub duplicate_threshold: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Ranks resumes supplied as text against a job description.
pub async fn handle_screen(
    State(state): State<AppState>,
    payload: Result<Json<ScreeningRequest>, JsonRejection>,
) -> Result<Json<ScreeningReport>, AppError> {
    let Json(request) = payload.map_err(invalid_json)?;
    validate_job_description(&request.job_description)?;
    if request.resumes.is_empty() {
        return Err(AppError::Validation("resumes cannot be empty".to_string()));
    }

    let options = resolve_options(&state.config, request.top_n, request.duplicate_threshold)?;
    info!(resumes = request.resumes.len(), "Screening request received");

    let job_description = request.job_description;
    let resumes = request.resumes;
    let report = run_blocking(move || Ok(screen(&job_description, &resumes, &options))).await?;

    Ok(Json(report))
}

/// POST /api/v1/screenings/upload
///
/// Multipart variant: a `job_description` text field, optional `top_n` and
/// `duplicate_threshold` fields, and one or more `resumes` file fields (PDF or TXT).
pub async fn handle_screen_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScreeningReport>, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::Validation(format!("Invalid multipart request: {}", rejection.body_text()))
    })?;
    let mut job_description = String::new();
    let mut top_n = None;
    let mut duplicate_threshold = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => job_description = field.text().await.map_err(malformed)?,
            "top_n" => {
                let raw = field.text().await.map_err(malformed)?;
                top_n = Some(parse_field(&name, &raw)?);
            }
            "duplicate_threshold" => {
                let raw = field.text().await.map_err(malformed)?;
                duplicate_threshold = Some(parse_field(&name, &raw)?);
            }
            "resumes" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                files.push(UploadedFile { file_name, bytes });
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    validate_job_description(&job_description)?;
    if files.is_empty() {
        return Err(AppError::Validation(
            "at least one resume file is required".to_string(),
        ));
    }

    let options = resolve_options(&state.config, top_n, duplicate_threshold)?;
    info!(files = files.len(), "Screening upload received");

    let report = run_blocking(move || {
        let resumes = parse_uploads(files);
        if resumes.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "Could not extract text from any uploaded resume".to_string(),
            ));
        }
        Ok(screen(&job_description, &resumes, &options))
    })
    .await?;

    Ok(Json(report))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// PDF extraction and vectorization are CPU-bound; keep them off the async executor.
async fn run_blocking<F>(job: F) -> Result<ScreeningReport, AppError>
where
    F: FnOnce() -> Result<ScreeningReport, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(job).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in screening: {e}"))
    })?
}

fn validate_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Applies per-request overrides on top of the configured defaults.
fn resolve_options(
    config: &Config,
    top_n: Option<usize>,
    duplicate_threshold: Option<f64>,
) -> Result<ScreeningOptions, AppError> {
    let mut options = config.screening_options();

    if let Some(n) = top_n {
        if n == 0 {
            return Err(AppError::Validation(
                "top_n must be greater than 0".to_string(),
            ));
        }
        options.top_n = n;
    }

    if let Some(threshold) = duplicate_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::Validation(format!(
                "duplicate_threshold must be within [0, 1], got {threshold}"
            )));
        }
        options.duplicate_threshold = threshold;
    }

    Ok(options)
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{name} has invalid value '{raw}'")))
}

fn invalid_json(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(rejection.body_text());
    }
    AppError::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
}

fn malformed(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {e}"));
    }
    AppError::Validation(format!("Malformed multipart body: {e}"))
}
