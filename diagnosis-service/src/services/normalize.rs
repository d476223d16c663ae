//! Normalization of raw completion-backend output into diagnosis fields.
//!
//! The model is instructed to answer with a JSON object, but in practice
//! wraps it in a fenced code block or ignores the format entirely. This
//! module always produces a complete set of fields: parsed when possible,
//! a fixed placeholder structure otherwise.

use crate::models::DiagnosisFields;

/// Maximum number of characters of raw text carried into the fallback
/// diagnosis field.
const FALLBACK_DIAGNOSIS_CHARS: usize = 200;

const FALLBACK_DISCLAIMER: &str = "This is a preliminary AI-assisted diagnosis. Please consult a \
     qualified healthcare professional for proper medical examination and treatment.";

/// Normalize a raw completion response into diagnosis fields.
///
/// Never fails: when the response is not a valid JSON object with the
/// expected fields, the raw text (truncated) becomes the diagnosis and
/// every other field gets a generic placeholder.
pub fn normalize(raw: &str) -> DiagnosisFields {
    let candidate = strip_code_fences(raw);

    match serde_json::from_str::<DiagnosisFields>(candidate) {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!(error = %e, "Completion response was not valid JSON, using fallback");
            fallback_from_text(raw)
        }
    }
}

/// Fallback structure used when the backend cannot be reached at all.
pub fn unavailable_fallback() -> DiagnosisFields {
    DiagnosisFields {
        diagnosis: "Unable to process diagnosis at this time. Please consult a healthcare \
                    professional."
            .to_string(),
        medicines: vec!["Please consult a doctor for proper medication".to_string()],
        medicine_timing: "Consult healthcare provider for proper timing".to_string(),
        diet_recommendations: vec![
            "Maintain a balanced diet".to_string(),
            "Stay hydrated".to_string(),
            "Get adequate rest".to_string(),
        ],
        nearby_pharmacies: vec![
            "CVS Pharmacy".to_string(),
            "Walgreens".to_string(),
            "Local pharmacies".to_string(),
        ],
        recommended_doctors: vec!["General Practitioner".to_string()],
        disclaimer: FALLBACK_DISCLAIMER.to_string(),
    }
}

/// Strip a surrounding fenced code block, with or without a language tag.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let body = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Synthesize fields from unparseable raw text.
fn fallback_from_text(raw: &str) -> DiagnosisFields {
    let mut diagnosis: String = raw.chars().take(FALLBACK_DIAGNOSIS_CHARS).collect();
    if raw.chars().count() > FALLBACK_DIAGNOSIS_CHARS {
        diagnosis.push_str("...");
    }

    DiagnosisFields {
        diagnosis,
        medicines: vec!["Please consult a doctor for proper medication".to_string()],
        medicine_timing: "Consult healthcare provider for proper timing".to_string(),
        diet_recommendations: vec![
            "Maintain a balanced diet".to_string(),
            "Stay hydrated".to_string(),
            "Get adequate rest".to_string(),
        ],
        nearby_pharmacies: vec![
            "CVS Pharmacy".to_string(),
            "Walgreens".to_string(),
            "Local pharmacies".to_string(),
        ],
        recommended_doctors: vec![
            "General Practitioner".to_string(),
            "Specialist as needed".to_string(),
        ],
        disclaimer: FALLBACK_DISCLAIMER.to_string(),
    }
}
