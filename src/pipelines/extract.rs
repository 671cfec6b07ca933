//! The structured-extraction pipeline.
//!
//! Composes normalizer -> bounded remote call -> response parser ->
//! schema validator -> quality scorer into one operation. One attempt
//! covers generate, parse and validate together: a malformed or
//! schema-violating reply consumes a unit of the same retry budget a
//! transport failure would. There is no corrective re-prompt.

use std::time::Instant;

use log::info;

use crate::error::CookflowError;
use crate::model::{Extraction, ExtractionMetadata, Recipe};
use crate::preprocess::normalize_text;
use crate::providers::{run_bounded, GenerativeProvider, RetryPolicy, EXTRACTION_PROMPT};
use crate::response::parse_model_json;
use crate::score::quality_score;
use crate::validate::validate_recipe;

/// Scores under this get an advisory quality warning attached.
const LOW_QUALITY_THRESHOLD: f64 = 0.7;

/// Extract a structured recipe from raw text.
///
/// Input preconditions (length, non-URL) are the caller's
/// responsibility; see [`crate::Cookflow::extract_recipe`].
pub async fn process(
    provider: &dyn GenerativeProvider,
    policy: &RetryPolicy,
    raw_text: &str,
) -> Result<Extraction, CookflowError> {
    let started = Instant::now();

    let cleaned = normalize_text(raw_text);
    let prompt = format!("{}\n\nRecipe Text:\n{}", EXTRACTION_PROMPT, cleaned);

    let (recipe, mut warnings) = run_bounded(policy, || {
        let prompt = &prompt;
        async move {
            let reply = provider.generate(prompt).await?;
            let mut value = parse_model_json(&reply)?;

            let validation = validate_recipe(&value);
            if !validation.valid {
                return Err(CookflowError::InvalidRecipe(validation.errors.join(", ")));
            }

            // Enrichment fields the validator only warned about must
            // not break typing; the warnings already cover them.
            prune_enrichment(&mut value);

            let recipe: Recipe = serde_json::from_value(value)
                .map_err(|e| CookflowError::Parse(e.to_string()))?;

            Ok((recipe, validation.warnings))
        }
    })
    .await?;

    let score = quality_score(&recipe);

    if score < LOW_QUALITY_THRESHOLD {
        warnings.push(
            "Extraction quality is lower than expected - please verify the recipe details"
                .to_string(),
        );
    }
    if recipe.difficulty.is_none() {
        warnings.push("Difficulty level not detected".to_string());
    }
    if recipe.cuisine.is_none() {
        warnings.push("Cuisine type not detected".to_string());
    }

    info!(
        "Extracted recipe '{}' with quality score {:.2}",
        recipe.title, score
    );

    Ok(Extraction {
        recipe,
        metadata: ExtractionMetadata {
            quality_score: score,
            warnings,
            extraction_time_ms: started.elapsed().as_millis() as u64,
        },
    })
}

/// Drop advisory fields that are null or mistyped. Validation treats
/// them as warnings, never errors, so they must not fail the stricter
/// typed model either.
fn prune_enrichment(value: &mut serde_json::Value) {
    use serde_json::Value;

    let Some(obj) = value.as_object_mut() else {
        return;
    };

    for field in ["difficulty", "cuisine", "notes"] {
        if !matches!(obj.get(field), None | Some(Value::String(_))) {
            obj.remove(field);
        }
    }

    let remove_tags = match obj.get_mut("tags") {
        None => false,
        Some(Value::Array(tags)) => {
            tags.retain(|tag| tag.is_string());
            false
        }
        Some(_) => true,
    };
    if remove_tags {
        obj.remove("tags");
    }
}
