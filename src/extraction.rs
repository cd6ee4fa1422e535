//! # Available-Ingredient Extraction
//!
//! This module derives the user's available-ingredient list from the
//! products posted by the mobile client.
//!
//! ## Features
//!
//! - Per product, the nutrition-database ingredient statement is preferred
//!   over the display name; products carrying neither are skipped
//! - Ingredient statements ("INGREDIENTS: WATER, SUGAR, SALT (SEA SALT)")
//!   are split on list separators into individual names
//! - Parenthesized qualifiers and leading statement labels are stripped,
//!   whitespace and punctuation trimmed, and overly long names truncated
//!   at a word boundary
//! - Names are deduplicated case-insensitively, preserving first-seen
//!   order and original casing

use lazy_static::lazy_static;
use log::{debug, info, trace, warn};
use regex::Regex;
use std::collections::HashSet;

use crate::config::ExtractionConfig;
use crate::recipe_model::Product;

lazy_static! {
    // "(SEA SALT)" or "[ORGANIC]" style qualifiers inside a statement
    static ref PARENTHETICAL: Regex =
        Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("Parenthetical pattern should be valid");

    // Leading "INGREDIENTS:" label common in nutrition-database statements
    static ref STATEMENT_LABEL: Regex =
        Regex::new(r"(?i)^\s*ingredients?\s*:\s*").expect("Statement label pattern should be valid");
}

/// Derive the available-ingredient list from scanned products.
///
/// Per product, uses `nf_ingredient_statement` when present and non-blank,
/// falling back to `name`; a product with neither contributes nothing.
/// Statements are split into individual ingredient names when
/// `config.split_statements` is enabled; display names always pass through
/// as a single entry.
///
/// # Examples
///
/// ```rust
/// use pantry_recipes::config::ExtractionConfig;
/// use pantry_recipes::extraction::available_ingredients;
/// use pantry_recipes::recipe_model::Product;
///
/// let products = vec![
///     Product {
///         name: Some("Cane Sugar".to_string()),
///         nf_ingredient_statement: Some("INGREDIENTS: WATER, SUGAR, SALT (SEA SALT)".to_string()),
///     },
///     Product {
///         name: Some("Chicken Breast".to_string()),
///         nf_ingredient_statement: None,
///     },
/// ];
///
/// let available = available_ingredients(&products, &ExtractionConfig::default());
///
/// assert_eq!(available, vec!["WATER", "SUGAR", "SALT", "Chicken Breast"]);
/// ```
pub fn available_ingredients(products: &[Product], config: &ExtractionConfig) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut available = Vec::new();

    for product in products {
        let statement = product
            .nf_ingredient_statement
            .as_deref()
            .filter(|s| !s.trim().is_empty());
        let name = product.name.as_deref().filter(|s| !s.trim().is_empty());

        let (source, is_statement) = match (statement, name) {
            (Some(statement), _) => (statement, true),
            (None, Some(name)) => (name, false),
            (None, None) => {
                trace!("Skipping product with no ingredient statement and no name");
                continue;
            }
        };

        if is_statement && config.split_statements {
            let body = STATEMENT_LABEL.replace(source, "");
            for fragment in body.split([',', ';']) {
                push_cleaned(fragment, config, &mut seen, &mut available);
            }
        } else {
            push_cleaned(source, config, &mut seen, &mut available);
        }
    }

    info!(
        "Derived {} available ingredients from {} products",
        available.len(),
        products.len()
    );
    available
}

fn push_cleaned(
    raw: &str,
    config: &ExtractionConfig,
    seen: &mut HashSet<String>,
    available: &mut Vec<String>,
) {
    let Some(name) = clean_ingredient_name(raw, config.max_name_len) else {
        trace!("Dropped empty ingredient fragment: '{}'", raw);
        return;
    };

    if seen.insert(name.to_lowercase()) {
        debug!("Extracted available ingredient: '{}'", name);
        available.push(name);
    } else {
        trace!("Skipping duplicate ingredient: '{}'", name);
    }
}

/// Clean a raw ingredient fragment into a usable name.
///
/// Strips parenthesized qualifiers, trims surrounding whitespace and
/// punctuation, collapses internal whitespace, and truncates names longer
/// than `max_len` at a word boundary. Returns `None` when nothing usable
/// remains.
fn clean_ingredient_name(raw: &str, max_len: usize) -> Option<String> {
    let without_parens = PARENTHETICAL.replace_all(raw, "");

    let mut name = without_parens
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
        .to_string();

    // Collapse runs of whitespace left behind by qualifier removal
    name = name.split_whitespace().collect::<Vec<&str>>().join(" ");

    if name.is_empty() {
        return None;
    }

    if name.len() > max_len {
        let truncated = truncate_at_char_boundary(&name, max_len);
        // Cut at a word boundary when one exists
        let cut = match truncated.rfind(' ') {
            Some(last_space) => &truncated[..last_space],
            None => truncated,
        };
        warn!(
            "Ingredient name truncated due to length limit ({} > {}): '{}' -> '{}'",
            name.len(),
            max_len,
            name,
            cut
        );
        name = cut.to_string();
    }

    Some(name)
}

fn truncate_at_char_boundary(name: &str, max_len: usize) -> &str {
    let mut end = max_len;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
