//! Mock provider implementation for testing.

use super::{
    FinishReason, GenerationParams, InlineImage, ProviderError, ProviderResponse, TextProvider,
};
use async_trait::async_trait;

/// Mock text provider for testing.
///
/// Returns a fixed fenced-JSON diagnosis body so the full normalization
/// path is exercised. When disabled, every call fails, which drives the
/// orchestrator's fallback path.
pub struct MockTextProvider {
    enabled: bool,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        // Simulate some processing
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        let text = r#"```json
{
    "diagnosis": "Mock preliminary diagnosis: likely a common viral infection",
    "medicines": ["Paracetamol - 500mg", "Cetirizine - 10mg"],
    "medicine_timing": "Paracetamol: twice daily after meals, Cetirizine: once at bedtime",
    "diet_recommendations": ["Warm fluids", "Light meals", "Vitamin C rich fruits"],
    "nearby_pharmacies": ["Local independent pharmacies", "Hospital pharmacies"],
    "recommended_doctors": ["General Practitioner"],
    "disclaimer": "This is a preliminary AI-assisted diagnosis. Please consult a qualified healthcare professional."
}
```"#;

        Ok(ProviderResponse {
            text: Some(text.to_string()),
            input_tokens: (prompt.len() / 4) as i32,
            output_tokens: 64 + image.map_or(0, |_| 16),
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }
}
