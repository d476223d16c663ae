use crate::models::DiagnosisRecord;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct DiagnoseRequest {
    #[validate(length(min = 1, message = "Symptoms cannot be empty"))]
    pub symptoms: String,
    pub patient_age: Option<u32>,
    pub patient_gender: Option<String>,
    pub location: Option<String>,
    pub image_base64: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosisResponse {
    pub id: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub medicines: Vec<String>,
    pub medicine_timing: String,
    pub diet_recommendations: Vec<String>,
    pub nearby_pharmacies: Vec<String>,
    pub recommended_doctors: Vec<String>,
    pub disclaimer: String,
    pub timestamp: String,
}

impl From<DiagnosisRecord> for DiagnosisResponse {
    fn from(record: DiagnosisRecord) -> Self {
        Self {
            id: record.id,
            symptoms: record.symptoms,
            diagnosis: record.diagnosis,
            medicines: record.medicines,
            medicine_timing: record.medicine_timing,
            diet_recommendations: record.diet_recommendations,
            nearby_pharmacies: record.nearby_pharmacies,
            recommended_doctors: record.recommended_doctors,
            disclaimer: record.disclaimer,
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}
