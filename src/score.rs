//! Heuristic completeness scoring for validated recipes.

use crate::model::Recipe;

/// Compute a completeness score in [0, 1] from independent weighted
/// checks. This measures structural completeness only, not whether the
/// recipe is actually any good.
pub fn quality_score(recipe: &Recipe) -> f64 {
    let mut score: f64 = 0.0;

    // Title check (0.15)
    let title_len = recipe.title.chars().count();
    if (3..=100).contains(&title_len) {
        score += 0.15;
    }

    // Servings check (0.1) - always present on a validated recipe
    score += 0.1;

    // Ingredients check (0.3)
    if recipe.ingredients.len() >= 2 {
        score += 0.15;

        let all_well_formed = recipe
            .ingredients
            .iter()
            .all(|ing| !ing.quantity.is_empty() && ing.item.chars().count() > 2);
        if all_well_formed {
            score += 0.15;
        }
    }

    // Steps check (0.3)
    if recipe.steps.len() >= 2 {
        score += 0.15;

        let all_substantial = recipe.steps.iter().all(|step| step.trim().len() >= 10);
        if all_substantial {
            score += 0.15;
        }
    }

    // Time estimates check (0.1): realistic total under 8 hours
    if let (Some(prep), Some(cook)) = (recipe.prep_time_minutes, recipe.cook_time_minutes) {
        if prep > 0.0 && cook >= 0.0 {
            let total = prep + cook;
            if total > 0.0 && total < 480.0 {
                score += 0.1;
            }
        }
    }

    // Metadata check (0.05 bonus for having additional fields)
    if recipe.difficulty.is_some() || recipe.cuisine.is_some() || !recipe.tags.is_empty() {
        score += 0.05;
    }

    score.min(1.0)
}
