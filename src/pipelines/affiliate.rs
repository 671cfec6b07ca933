//! Purchase-link building for grocery items.
//!
//! Each item is handled concurrently and independently; one item's
//! failure degrades that item's link to null and never aborts the
//! batch. Product names are optimized through the model when a
//! provider is available, with a deterministic cleaning fallback that
//! never raises.

use std::sync::Arc;

use log::{info, warn};
use tokio::task::JoinSet;

use crate::config::AffiliateConfig;
use crate::error::CookflowError;
use crate::model::{LinkedItem, NetworkInfo, PurchasableItem};
use crate::providers::{run_bounded, GenerativeProvider, RetryPolicy, PRODUCT_MAPPING_PROMPT};

/// Unit words stripped by the deterministic cleaning fallback.
const UNITS: [&str; 12] = [
    "cups", "cup", "tbsp", "tbs", "tsp", "ts", "oz", "lb", "g", "kg", "ml", "l",
];

/// Supported affiliate networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Amazon,
    Instacart,
}

impl Network {
    pub fn id(&self) -> &'static str {
        match self {
            Network::Amazon => "amazon",
            Network::Instacart => "instacart",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Amazon => "Amazon",
            Network::Instacart => "Instacart",
        }
    }

    pub fn from_id(id: &str) -> Result<Self, CookflowError> {
        match id {
            "amazon" => Ok(Network::Amazon),
            "instacart" => Ok(Network::Instacart),
            other => Err(CookflowError::InvalidInput(format!(
                "Unsupported affiliate network: {other}"
            ))),
        }
    }

    /// Build the product search URL, appending the referral id when
    /// one is configured.
    fn search_url(
        &self,
        product: &str,
        affiliate_id: Option<&str>,
    ) -> Result<String, CookflowError> {
        let (base, term_key, id_key) = match self {
            Network::Amazon => ("https://www.amazon.com/s", "k", "tag"),
            Network::Instacart => ("https://www.instacart.com/store/search", "q", "ref"),
        };

        let mut params = vec![(term_key, product)];
        if let Some(id) = affiliate_id {
            params.push((id_key, id));
        }

        let url = reqwest::Url::parse_with_params(base, &params)
            .map_err(|e| CookflowError::Url(e.to_string()))?;
        Ok(url.to_string())
    }
}

/// The affiliate networks and whether each has a referral id.
pub fn available_networks(config: &AffiliateConfig) -> Vec<NetworkInfo> {
    vec![
        NetworkInfo {
            id: Network::Amazon.id().to_string(),
            name: Network::Amazon.display_name().to_string(),
            configured: config.amazon_tag.is_some(),
        },
        NetworkInfo {
            id: Network::Instacart.id().to_string(),
            name: Network::Instacart.display_name().to_string(),
            configured: config.instacart_ref.is_some(),
        },
    ]
}

/// Build purchase links for a batch of grocery items.
///
/// Items are processed concurrently; results come back in input order.
pub async fn generate_links(
    provider: Option<Arc<dyn GenerativeProvider>>,
    policy: &RetryPolicy,
    config: &AffiliateConfig,
    items: &[PurchasableItem],
    network: Network,
) -> Result<Vec<LinkedItem>, CookflowError> {
    let affiliate_id = match network {
        Network::Amazon => config.amazon_tag.clone(),
        Network::Instacart => config.instacart_ref.clone(),
    };

    let mut tasks = JoinSet::new();
    for (index, item) in items.iter().cloned().enumerate() {
        let provider = provider.clone();
        let policy = *policy;
        let affiliate_id = affiliate_id.clone();

        tasks.spawn(async move {
            let linked = link_item(
                provider.as_deref(),
                &policy,
                item,
                network,
                affiliate_id.as_deref(),
            )
            .await;
            (index, linked)
        });
    }

    let mut linked: Vec<Option<LinkedItem>> = vec![None; items.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, item)) => linked[index] = Some(item),
            Err(e) => warn!("Link generation task failed: {e}"),
        }
    }

    Ok(linked.into_iter().flatten().collect())
}

/// Link a single item. Failures degrade the item rather than raising.
async fn link_item(
    provider: Option<&dyn GenerativeProvider>,
    policy: &RetryPolicy,
    item: PurchasableItem,
    network: Network,
    affiliate_id: Option<&str>,
) -> LinkedItem {
    let product_name = optimize_product_name(provider, policy, &item.name).await;

    match network.search_url(&product_name, affiliate_id) {
        Ok(url) => LinkedItem {
            name: item.name,
            quantity: item.quantity,
            category: item.category,
            affiliate_url: Some(url),
            network: Some(network.display_name().to_string()),
            has_affiliate_id: affiliate_id.is_some(),
            error: None,
        },
        Err(e) => {
            warn!("Failed to generate link for \"{}\": {}", item.name, e);
            LinkedItem {
                name: item.name,
                quantity: item.quantity,
                category: item.category,
                affiliate_url: None,
                network: None,
                has_affiliate_id: false,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Turn an ingredient name into a searchable product term.
///
/// Single-word names skip the remote call entirely. Multi-word names
/// make one bounded call; on any failure - no credential, transport,
/// timeout, empty reply - the deterministic cleaning fallback is used
/// instead. This path never raises.
pub async fn optimize_product_name(
    provider: Option<&dyn GenerativeProvider>,
    policy: &RetryPolicy,
    ingredient_name: &str,
) -> String {
    if is_single_word(ingredient_name) {
        return ingredient_name.trim().to_string();
    }

    let Some(provider) = provider else {
        return basic_product_name_cleaning(ingredient_name);
    };

    let prompt = format!(
        "{}\n\nIngredient: \"{}\"",
        PRODUCT_MAPPING_PROMPT, ingredient_name
    );

    let lookup = run_bounded(policy, || {
        let prompt = &prompt;
        async move { provider.generate(prompt).await }
    })
    .await;

    match lookup {
        Ok(reply) => {
            let product = reply.trim().to_string();
            if product.is_empty() {
                basic_product_name_cleaning(ingredient_name)
            } else {
                product
            }
        }
        Err(e) => {
            info!("Using fallback cleaning for \"{ingredient_name}\": {e}");
            basic_product_name_cleaning(ingredient_name)
        }
    }
}

/// Deterministic product-name cleaning: strip a leading quantity/unit,
/// drop everything from the first comma, remove parenthetical asides.
fn basic_product_name_cleaning(ingredient_name: &str) -> String {
    let text = strip_leading_quantity(ingredient_name.trim());
    let text = text.split(',').next().unwrap_or("");
    let text = remove_parentheticals(text);
    text.trim().to_string()
}

/// Strip a leading `<digits> <unit>` prefix such as "2 cups " or
/// "1/2 cup ". The unit must be a whole token from the known set.
fn strip_leading_quantity(name: &str) -> &str {
    let after_digits = name.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() == name.len() {
        return name;
    }

    let rest =
        after_digits.trim_start_matches(|c: char| c.is_whitespace() || c == '/' || c.is_ascii_digit());
    let word_end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());

    if UNITS.contains(&rest[..word_end].to_lowercase().as_str()) {
        rest[word_end..].trim_start()
    } else {
        name
    }
}

/// Remove `( ... )` asides; an unclosed `(` is kept literally.
fn remove_parentheticals(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '(' {
            if let Some(offset) = chars[i..].iter().position(|&c| c == ')') {
                i += offset + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn is_single_word(name: &str) -> bool {
    name.trim().split_whitespace().count() == 1
}
