use crate::dtos::{DiagnoseRequest, DiagnosisResponse};
use crate::models::DiagnosisRecord;
use crate::services::diagnosis::PatientContext;
use crate::services::providers::InlineImage;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use base64::Engine;
use serde_json::json;
use service_core::error::AppError;
use validator::Validate;

/// Most records a history query returns.
const HISTORY_LIMIT: i64 = 100;

/// MIME type assumed for submitted images; the request carries bare base64.
const IMAGE_MIME_TYPE: &str = "image/jpeg";

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Remote Diagnosis App API" }))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_diagnosis(
    State(state): State<AppState>,
    Json(request): Json<DiagnoseRequest>,
) -> Result<Json<DiagnosisResponse>, AppError> {
    request.validate()?;

    let image = match &request.image_base64 {
        Some(encoded) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Invalid base64 image payload: {}", e))
                })?;
            tracing::debug!(image_bytes = bytes.len(), "Image attached to request");
            Some(InlineImage {
                mime_type: IMAGE_MIME_TYPE.to_string(),
                data: encoded.clone(),
            })
        }
        None => None,
    };

    let patient = PatientContext {
        age: request.patient_age,
        gender: request.patient_gender.clone(),
        location: request.location.clone(),
    };

    // AI first, then persist. A storage failure after a successful AI call
    // surfaces as 500; there is nothing to roll back at the AI layer.
    let fields = state
        .diagnosis
        .diagnose(&request.symptoms, &patient, image)
        .await;

    let record = DiagnosisRecord::new(request.symptoms, fields);
    state.db.insert_diagnosis(&record).await?;

    tracing::info!(diagnosis_id = %record.id, "Diagnosis created");

    Ok(Json(DiagnosisResponse::from(record)))
}

pub async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<DiagnosisResponse>>, AppError> {
    let records = state.db.list_recent(HISTORY_LIMIT).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

pub async fn get_diagnosis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DiagnosisResponse>, AppError> {
    let record = state
        .db
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Diagnosis not found")))?;

    Ok(Json(record.into()))
}
