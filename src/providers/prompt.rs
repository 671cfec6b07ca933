/// The prompt sent ahead of the cleaned recipe text for extraction.
///
/// Instructs the model to return only a JSON object in the recipe
/// schema, with guidance on quantities, step granularity, time
/// estimates, difficulty and tags.
///
/// The prompts are loaded from `.txt` files at compile time using the
/// `include_str!` macro, making them easy to edit without dealing with
/// Rust string syntax.
pub const EXTRACTION_PROMPT: &str = include_str!("extraction_prompt.txt");

/// The prompt sent ahead of the per-recipe ingredient listing for
/// grocery categorization.
pub const CATEGORIZATION_PROMPT: &str = include_str!("categorization_prompt.txt");

/// The prompt for turning a raw ingredient name into a searchable
/// product term.
pub const PRODUCT_MAPPING_PROMPT: &str = include_str!("product_mapping_prompt.txt");
