//! Grocery-list categorization across one or more recipes.

use std::collections::HashMap;

use log::info;
use serde_json::Value;

use crate::error::CookflowError;
use crate::model::{GroceryCategory, GroceryList, GroceryListOptions, Recipe};
use crate::providers::{run_bounded, GenerativeProvider, RetryPolicy, CATEGORIZATION_PROMPT};
use crate::response::parse_model_json;

/// Categorize the ingredients of the given recipes into grocery store
/// sections.
///
/// Transport and timeout failures are retried within the budget; a
/// reply without a `categories` array is terminal and never
/// re-prompted.
pub async fn process(
    provider: &dyn GenerativeProvider,
    policy: &RetryPolicy,
    recipes: &[Recipe],
    options: &GroceryListOptions,
) -> Result<GroceryList, CookflowError> {
    let prompt = build_prompt(recipes);

    let reply = run_bounded(policy, || {
        let prompt = &prompt;
        async move { provider.generate(prompt).await }
    })
    .await?;

    let value = parse_model_json(&reply)?;

    let categories_value = match value.get("categories") {
        Some(categories @ Value::Array(_)) => categories.clone(),
        _ => return Err(CookflowError::MissingStructure),
    };

    let categories: Vec<GroceryCategory> = serde_json::from_value(categories_value)
        .map_err(|e| CookflowError::Parse(e.to_string()))?;

    let categories = if options.aggregate {
        aggregate(categories)
    } else {
        categories
    };

    let total_items = categories.iter().map(|c| c.items.len()).sum();

    info!(
        "Categorized {} items into {} sections from {} recipes",
        total_items,
        categories.len(),
        recipes.len()
    );

    Ok(GroceryList {
        categories,
        total_items,
        recipe_count: recipes.len(),
    })
}

/// Enumerate every recipe's ingredients under its quoted title.
fn build_prompt(recipes: &[Recipe]) -> String {
    let ingredient_text = recipes
        .iter()
        .map(|recipe| {
            let ingredient_list = recipe
                .ingredients
                .iter()
                .map(|ing| format!("{} {}", ing.quantity, ing.item))
                .collect::<Vec<_>>()
                .join("\n  - ");
            format!("Recipe: \"{}\"\n  - {}", recipe.title, ingredient_list)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\nIngredients to categorize:\n{}",
        CATEGORIZATION_PROMPT, ingredient_text
    )
}

/// Merge duplicate items by lower-cased, trimmed name across all
/// categories. Quantities and source titles are concatenated as text;
/// no unit-aware summation is attempted. A merged item stays in the
/// category where its name first appeared.
fn aggregate(categories: Vec<GroceryCategory>) -> Vec<GroceryCategory> {
    let mut merged: Vec<GroceryCategory> = categories
        .iter()
        .map(|category| GroceryCategory {
            name: category.name.clone(),
            items: Vec::new(),
        })
        .collect();

    let mut seen: HashMap<String, (usize, usize)> = HashMap::new();

    for (category_index, category) in categories.into_iter().enumerate() {
        for item in category.items {
            let key = item.name.trim().to_lowercase();

            match seen.get(&key) {
                Some(&(ci, ii)) => {
                    let existing = &mut merged[ci].items[ii];
                    existing.quantity = format!("{} + {}", existing.quantity, item.quantity);
                    existing.recipe_title =
                        format!("{}, {}", existing.recipe_title, item.recipe_title);
                }
                None => {
                    let slot = merged[category_index].items.len();
                    seen.insert(key, (category_index, slot));
                    merged[category_index].items.push(item);
                }
            }
        }
    }

    merged
}
