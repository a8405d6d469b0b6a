//! Axum route handlers for extraction, enhancement and the combined pipeline.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::schema::{EnhancementResult, ExtractionResult};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

/// One uploaded file from a multipart form.
struct Upload {
    filename: String,
    data: Bytes,
}

/// Reads the `file` part of a multipart form. Other parts are skipped.
async fn read_upload(multipart: Result<Multipart, MultipartRejection>) -> Result<Upload, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        return Ok(Upload { filename, data });
    }

    Err(AppError::Validation(format!(
        "Missing '{UPLOAD_FIELD}' field in multipart form"
    )))
}

/// POST /extraction
pub async fn handle_extraction(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResult>, AppError> {
    let upload = read_upload(multipart).await?;
    info!("Extracting job description from file: {}", upload.filename);

    let result = state
        .pipeline
        .extract_upload(&upload.filename, upload.data)
        .await
        .map_err(|e| AppError::from_jd("Error extracting job description", e))?;
    Ok(Json(result))
}

/// POST /enhancement
pub async fn handle_enhancement(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EnhancementResult>, AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let extracted_jd = body
        .get("extracted_jd")
        .filter(|jd| jd.is_object())
        .ok_or_else(|| {
            AppError::Validation(
                "Invalid input. Expected a JSON object with an 'extracted_jd' key.".to_string(),
            )
        })?;

    info!("Enhancing job description");
    let result = state
        .pipeline
        .enhance(extracted_jd)
        .await
        .map_err(|e| AppError::from_jd("Error enhancing job description", e))?;
    Ok(Json(result))
}

/// POST /process
pub async fn handle_process(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EnhancementResult>, AppError> {
    let upload = read_upload(multipart).await?;
    info!("Processing job description from file: {}", upload.filename);

    let result = state
        .pipeline
        .extract_and_enhance(&upload.filename, upload.data)
        .await
        .map_err(|e| AppError::from_jd("Error processing job description", e))?;
    info!("Successfully processed job description");
    Ok(Json(result))
}
