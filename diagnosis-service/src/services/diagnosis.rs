//! Diagnosis orchestration.
//!
//! Builds the prompt from patient fields, issues exactly one completion
//! request, and normalizes whatever comes back. Provider failures never
//! escape this module: they degrade to the fixed fallback structure.

use crate::models::DiagnosisFields;
use crate::services::normalize;
use crate::services::providers::{GenerationParams, InlineImage, TextProvider};
use std::sync::Arc;

/// Instruction prefix sent with every diagnosis request.
const MEDICAL_SYSTEM_MESSAGE: &str = "You are a medical AI assistant specializing in preliminary diagnosis based on symptoms and medical images.

IMPORTANT GUIDELINES:
1. Always provide a preliminary diagnosis based on the symptoms and/or medical images provided
2. Suggest appropriate medicines with specific dosage and timing
3. Recommend dietary changes that can help with recovery
4. Suggest types of nearby pharmacies or specific pharmacy chains where medicines can be purchased
5. Recommend types of medical specialists who would be best for treating this condition
6. Always include appropriate medical disclaimers

RESPONSE FORMAT (JSON):
{
    \"diagnosis\": \"Preliminary diagnosis based on symptoms/images\",
    \"medicines\": [\"Medicine 1 - Dosage\", \"Medicine 2 - Dosage\"],
    \"medicine_timing\": \"Detailed timing schedule for taking medicines\",
    \"diet_recommendations\": [\"Dietary advice 1\", \"Dietary advice 2\"],
    \"nearby_pharmacies\": [\"Pharmacy chain or type 1\", \"Pharmacy chain or type 2\"],
    \"recommended_doctors\": [\"Specialist type 1\", \"Specialist type 2\"],
    \"disclaimer\": \"Appropriate medical disclaimer\"
}

Always respond in valid JSON format with the exact structure above.";

/// Maximum tokens requested per diagnosis.
const MAX_OUTPUT_TOKENS: i32 = 4096;

/// Optional patient details attached to a diagnosis request.
#[derive(Debug, Clone, Default)]
pub struct PatientContext {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub location: Option<String>,
}

impl PatientContext {
    /// Labeled clauses for whichever fields are present. Absent fields
    /// contribute nothing.
    fn describe(&self) -> String {
        let mut info = String::new();
        if let Some(age) = self.age {
            info.push_str(&format!("Age: {} years. ", age));
        }
        if let Some(gender) = &self.gender {
            info.push_str(&format!("Gender: {}. ", gender));
        }
        if let Some(location) = &self.location {
            info.push_str(&format!("Location: {}. ", location));
        }
        info
    }
}

/// Orchestrates one completion call per diagnosis.
#[derive(Clone)]
pub struct DiagnosisService {
    provider: Arc<dyn TextProvider>,
}

impl DiagnosisService {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    /// Produce diagnosis fields for the given symptoms.
    ///
    /// Always returns a complete set of fields: parse failures and provider
    /// failures both collapse into fixed fallback structures.
    pub async fn diagnose(
        &self,
        symptoms: &str,
        patient: &PatientContext,
        image: Option<InlineImage>,
    ) -> DiagnosisFields {
        let prompt = build_prompt(symptoms, patient, image.is_some());
        let params = GenerationParams {
            max_tokens: Some(MAX_OUTPUT_TOKENS),
            ..Default::default()
        };

        // One independent request per diagnosis; no conversation state is
        // carried between calls.
        match self.provider.generate(&prompt, image.as_ref(), &params).await {
            Ok(response) => {
                tracing::debug!(
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "Completion received"
                );
                match response.text.as_deref() {
                    Some(text) if !text.trim().is_empty() => normalize::normalize(text),
                    _ => {
                        tracing::error!("Completion backend returned no text");
                        normalize::unavailable_fallback()
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to obtain AI diagnosis");
                normalize::unavailable_fallback()
            }
        }
    }
}

fn build_prompt(symptoms: &str, patient: &PatientContext, has_image: bool) -> String {
    let mut prompt = format!(
        "{}\n\nPATIENT INFORMATION: {}\n\nSYMPTOMS: {}\n\nPlease analyze these symptoms and \
         provide a comprehensive medical assessment following the JSON format specified above.",
        MEDICAL_SYSTEM_MESSAGE,
        patient.describe(),
        symptoms
    );
    if has_image {
        prompt.push_str(
            "\n\nPlease also analyze the provided medical image for additional diagnostic \
             information.",
        );
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;

    #[test]
    fn patient_context_includes_only_present_fields() {
        let patient = PatientContext {
            age: Some(30),
            gender: None,
            location: Some("Bangalore".to_string()),
        };
        let info = patient.describe();
        assert_eq!(info, "Age: 30 years. Location: Bangalore. ");
    }

    #[test]
    fn empty_patient_context_describes_nothing() {
        assert_eq!(PatientContext::default().describe(), "");
    }

    #[test]
    fn prompt_mentions_image_only_when_attached() {
        let patient = PatientContext::default();
        let with = build_prompt("rash on arm", &patient, true);
        let without = build_prompt("rash on arm", &patient, false);
        assert!(with.contains("medical image"));
        assert!(!without.contains("medical image"));
        assert!(without.contains("SYMPTOMS: rash on arm"));
    }

    #[tokio::test]
    async fn diagnose_normalizes_provider_output() {
        let service = DiagnosisService::new(Arc::new(MockTextProvider::new(true)));
        let fields = service
            .diagnose("cough and cold", &PatientContext::default(), None)
            .await;
        assert!(fields.diagnosis.contains("Mock preliminary diagnosis"));
        assert!(!fields.medicines.is_empty());
        assert!(!fields.disclaimer.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_fallback() {
        let service = DiagnosisService::new(Arc::new(MockTextProvider::new(false)));
        let fields = service
            .diagnose("cough and cold", &PatientContext::default(), None)
            .await;
        assert!(fields.diagnosis.starts_with("Unable to process diagnosis"));
        assert_eq!(fields.recommended_doctors, vec!["General Practitioner"]);
    }
}
