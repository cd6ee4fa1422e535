//! # Recipe Data Model
//!
//! This module defines the data structures flowing through the recipe
//! suggestion pipeline: the products posted by the mobile client, the
//! recipe candidates returned by the language-model API, and the annotated
//! recipes sent back to the client.
//!
//! ## Core Concepts
//!
//! - **Product**: one scanned grocery item, carrying an optional ingredient
//!   statement and/or display name
//! - **RecipeCandidate**: an unvalidated recipe as produced by the
//!   generation API
//! - **AnnotatedRecipe**: a candidate enriched with pantry match data
//!
//! Candidate data is externally sourced and occasionally incomplete, so
//! deserialization is deliberately forgiving: missing or null fields fall
//! back to empty defaults instead of failing the whole response.

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

/// A grocery product as posted by the mobile client.
///
/// Both fields are optional; a product with neither is skipped when
/// deriving the available-ingredient list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Display name of the product (e.g., "Chicken Breast")
    #[serde(default)]
    pub name: Option<String>,

    /// Nutrition-database ingredient statement (e.g., "WATER, SUGAR, SALT")
    #[serde(default)]
    pub nf_ingredient_statement: Option<String>,
}

/// An unvalidated recipe candidate from the generation API.
///
/// All display fields pass through the pipeline untouched. Only
/// `ingredients_required` is consumed by the match engine; it defaults to
/// an empty list when the field is missing or null so that an incomplete
/// candidate degrades to a zero match instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub description: String,

    /// Ordered ingredient names as proposed by the recipe source.
    /// Duplicates are kept; the match engine counts them individually.
    #[serde(default, deserialize_with = "ingredient_names")]
    pub ingredients_required: Vec<String>,

    #[serde(default)]
    pub instructions: Vec<String>,

    #[serde(default)]
    pub time_to_make: String,

    /// Opaque display value; the generation API usually returns a number
    /// but occasionally a string, so it is carried as raw JSON.
    #[serde(default)]
    pub estimated_calories: serde_json::Value,

    #[serde(default, rename = "imageUrl")]
    pub image_url: String,
}

/// A recipe candidate enriched with pantry match data.
///
/// Produced fresh by [`crate::matching::annotate`] on every call and never
/// mutated afterwards. The partition is exact and total:
/// `user_has.len() + user_missing.len() == ingredients_required.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecipe {
    #[serde(flatten)]
    pub recipe: RecipeCandidate,

    /// Required ingredients present in the pantry, lowercased, in the
    /// original `ingredients_required` order
    pub user_has: Vec<String>,

    /// Required ingredients missing from the pantry, lowercased, in the
    /// original `ingredients_required` order
    pub user_missing: Vec<String>,

    /// Share of required ingredients on hand, rounded to an integer in
    /// [0, 100]
    pub match_percent: u8,
}

/// One entry of a candidate's `ingredients_required` array.
///
/// Older generation prompts asked for `{"name": ..., "isPresent": ...}`
/// objects; the current prompt asks for plain strings. Both shapes are
/// accepted on the wire. The `isPresent` flag is discarded: presence is
/// recomputed locally by the match engine.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientEntry {
    Name(String),
    Tagged {
        name: String,
    },
    Other(serde_json::Value),
}

fn ingredient_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<IngredientEntry>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry {
            IngredientEntry::Name(name) => Some(name),
            IngredientEntry::Tagged { name } => Some(name),
            IngredientEntry::Other(value) => {
                debug!("Skipping malformed ingredient entry: {}", value);
                None
            }
        })
        .collect())
}
