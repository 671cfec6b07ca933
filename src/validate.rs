//! Schema validation for model-produced recipe JSON.
//!
//! Validation is two-tier: `errors` block acceptance, `warnings` are
//! advisory and never do. The generator reliably produces the
//! structurally essential fields (title, ingredients, steps) but is
//! inconsistent about enrichment fields (difficulty, cuisine, tags,
//! timings), so only the former escalate to errors.

use serde_json::Value;

use crate::model::ValidationResult;

const VALID_DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

/// Validate an arbitrary parsed value claiming to be a recipe.
///
/// Rules accumulate independently; one bad field never hides another.
/// The result is valid iff the error list is empty. Running the
/// validator twice on the same payload yields identical results.
pub fn validate_recipe(recipe: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let obj = match recipe.as_object() {
        Some(obj) => obj,
        None => {
            return ValidationResult {
                valid: false,
                errors: vec!["Recipe must be a valid object".to_string()],
                warnings: Vec::new(),
            }
        }
    };

    // Validate title
    if !is_non_empty_trimmed_string(obj.get("title")) {
        errors.push("Title is required and must be a non-empty string".to_string());
    }

    // Validate servings
    match present(obj, "servings") {
        None => errors.push("Servings is required".to_string()),
        Some(Value::String(_)) | Some(Value::Number(_)) => {}
        Some(_) => errors.push("Servings must be a string or number".to_string()),
    }

    // Validate time fields (optional but recommended)
    for field in ["prep_time_minutes", "cook_time_minutes"] {
        match present(obj, field) {
            None => warnings.push(format!("{field} is missing")),
            Some(value) => {
                let non_negative = value.as_f64().is_some_and(|n| n >= 0.0);
                if !non_negative {
                    errors.push(format!("{field} must be a non-negative number"));
                }
            }
        }
    }

    // Validate difficulty (optional)
    if let Some(value) = present(obj, "difficulty") {
        let recognized = value
            .as_str()
            .is_some_and(|s| VALID_DIFFICULTIES.contains(&s.to_lowercase().as_str()));
        if !recognized {
            warnings.push("difficulty should be one of: easy, medium, hard".to_string());
        }
    }

    // Validate cuisine (optional)
    if let Some(value) = present(obj, "cuisine") {
        if !value.as_str().is_some_and(|s| !s.trim().is_empty()) {
            warnings.push("cuisine should be a non-empty string".to_string());
        }
    }

    // Validate tags (optional)
    if let Some(value) = present(obj, "tags") {
        match value.as_array() {
            None => warnings.push("tags should be an array of strings".to_string()),
            Some(tags) => {
                for (index, tag) in tags.iter().enumerate() {
                    if !tag.as_str().is_some_and(|s| !s.trim().is_empty()) {
                        warnings
                            .push(format!("Tag at index {index} should be a non-empty string"));
                    }
                }
            }
        }
    }

    // Validate notes (optional)
    if let Some(value) = present(obj, "notes") {
        if !value.is_string() {
            warnings.push("notes should be a string".to_string());
        }
    }

    // Validate ingredients
    match obj.get("ingredients").and_then(Value::as_array) {
        None => errors.push("Ingredients must be an array".to_string()),
        Some(ingredients) => {
            if ingredients.is_empty() {
                errors.push("Ingredients array cannot be empty".to_string());
            }

            for (index, ingredient) in ingredients.iter().enumerate() {
                match ingredient.as_object() {
                    None => errors.push(format!("Ingredient at index {index} must be an object")),
                    Some(fields) => {
                        if !is_non_empty_string(fields.get("quantity")) {
                            errors.push(format!(
                                "Ingredient at index {index} must have a quantity (string)"
                            ));
                        }
                        if !is_non_empty_string(fields.get("item")) {
                            errors.push(format!(
                                "Ingredient at index {index} must have an item (string)"
                            ));
                        }
                    }
                }
            }
        }
    }

    // Validate steps
    match obj.get("steps").and_then(Value::as_array) {
        None => errors.push("Steps must be an array".to_string()),
        Some(steps) => {
            if steps.is_empty() {
                errors.push("Steps array cannot be empty".to_string());
            }

            for (index, step) in steps.iter().enumerate() {
                if !is_non_empty_trimmed_string(Some(step)) {
                    errors.push(format!("Step at index {index} must be a non-empty string"));
                }
            }
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// A field counts as present only when it exists and is not null.
fn present<'a>(
    obj: &'a serde_json::Map<String, Value>,
    field: &str,
) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.is_empty())
}

fn is_non_empty_trimmed_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.trim().is_empty())
}
