use gemini_core::types::ListModelsResponse;
use serde_json::Value;

/// One line per model, or `None` when the payload carries no models
/// (typically an error object the caller should print as-is).
///
/// With `generate_only`, models that cannot serve generateContent are skipped.
pub fn render_listing(raw: &Value, generate_only: bool) -> Option<Vec<String>> {
    let listing: ListModelsResponse = serde_json::from_value(raw.clone()).ok()?;
    let models = listing.models.filter(|models| !models.is_empty())?;

    Some(
        models
            .iter()
            .filter(|model| !generate_only || model.supports_generate_content())
            .map(|model| {
                format!(
                    "- {} (Supports: {})",
                    model.name,
                    model.supported_generation_methods.join(", ")
                )
            })
            .collect(),
    )
}
