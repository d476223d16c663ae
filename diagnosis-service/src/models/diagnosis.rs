use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The structured content of one AI diagnosis, as produced by the
/// completion backend (or the fallback path when it cannot be parsed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisFields {
    pub diagnosis: String,
    pub medicines: Vec<String>,
    pub medicine_timing: String,
    pub diet_recommendations: Vec<String>,
    pub nearby_pharmacies: Vec<String>,
    pub recommended_doctors: Vec<String>,
    pub disclaimer: String,
}

/// A persisted diagnosis. Created once per successful API call, never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub medicines: Vec<String>,
    pub medicine_timing: String,
    pub diet_recommendations: Vec<String>,
    pub nearby_pharmacies: Vec<String>,
    pub recommended_doctors: Vec<String>,
    pub disclaimer: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

impl DiagnosisRecord {
    pub fn new(symptoms: String, fields: DiagnosisFields) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            symptoms,
            diagnosis: fields.diagnosis,
            medicines: fields.medicines,
            medicine_timing: fields.medicine_timing,
            diet_recommendations: fields.diet_recommendations,
            nearby_pharmacies: fields.nearby_pharmacies,
            recommended_doctors: fields.recommended_doctors,
            disclaimer: fields.disclaimer,
            timestamp: Utc::now(),
        }
    }
}
