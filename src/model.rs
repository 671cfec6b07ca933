use serde::{Deserialize, Serialize};

/// Serving count as the model reports it: free text ("4-6") or a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Servings {
    Count(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub quantity: String,
    pub item: String,
}

/// A structured recipe. Only materialized after the raw model output
/// has passed schema validation with zero errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub servings: Servings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Outcome of schema validation: blocking errors and advisory warnings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub quality_score: f64,
    pub warnings: Vec<String>,
    pub extraction_time_ms: u64,
}

/// A validated recipe together with extraction metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    pub recipe: Recipe,
    pub metadata: ExtractionMetadata,
}

/// One grocery item inside a category. Field names follow the wire
/// format of the original service (camelCase).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default, rename = "recipeTitle")]
    pub recipe_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<GroceryItem>,
}

/// Categorized shopping list built from one or more recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryList {
    pub categories: Vec<GroceryCategory>,
    #[serde(rename = "totalItems")]
    pub total_items: usize,
    #[serde(rename = "recipeCount")]
    pub recipe_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GroceryListOptions {
    /// Merge duplicate items by name, concatenating quantities as text.
    pub aggregate: bool,
}

/// Caller-supplied grocery item to build a purchase link for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasableItem {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub category: String,
}

/// A grocery item with its (possibly degraded) purchase link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedItem {
    pub name: String,
    pub quantity: String,
    pub category: String,
    #[serde(rename = "affiliateUrl")]
    pub affiliate_url: Option<String>,
    pub network: Option<String>,
    #[serde(rename = "hasAffiliateId")]
    pub has_affiliate_id: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An affiliate network and whether a referral id is configured for it.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkInfo {
    pub id: String,
    pub name: String,
    pub configured: bool,
}
