//! # Ingredient Match Engine
//!
//! This module computes, for each recipe candidate, the overlap between its
//! required ingredients and the user's on-hand ingredient set.
//!
//! ## Features
//!
//! - Case-insensitive membership: two ingredient names are the same iff
//!   their lowercase forms are identical (no stemming, no fuzzy matching,
//!   no synonym resolution)
//! - Order-and-duplicate-preserving partition of `ingredients_required`
//!   into `user_has` / `user_missing`
//! - Integer match percentage with a documented round-half-up rule
//! - No filtering: every candidate comes back annotated, regardless of
//!   score; a minimum-match cutoff is a separate opt-in step
//!   ([`retain_min_match`])
//!
//! The engine is a pure transformation: no I/O, no shared state, no
//! mutation of inputs. Calling it twice with the same inputs produces
//! identical output.

use std::collections::HashSet;

use log::{debug, info};

use crate::recipe_model::{AnnotatedRecipe, RecipeCandidate};

/// Annotate recipe candidates with pantry match data.
///
/// For each candidate, in input order, partitions `ingredients_required`
/// into the ingredients found in `available` (compared case-insensitively)
/// and the ones missing, and computes the match percentage. The output has
/// the same length and order as the input; no candidate is dropped or
/// reordered regardless of score.
///
/// `user_has` and `user_missing` carry the lowercased ingredient names,
/// preserving the original relative order and any duplicates from
/// `ingredients_required`.
///
/// A candidate with no stated ingredients gets `match_percent = 0`.
///
/// # Examples
///
/// ```rust
/// use pantry_recipes::matching::annotate;
/// use pantry_recipes::recipe_model::RecipeCandidate;
///
/// let recipe = RecipeCandidate {
///     name: "Omelette".to_string(),
///     ingredients_required: vec!["Egg".to_string(), "Butter".to_string()],
///     ..Default::default()
/// };
/// let available = vec!["egg".to_string()];
///
/// let annotated = annotate(vec![recipe], &available);
///
/// assert_eq!(annotated[0].user_has, vec!["egg"]);
/// assert_eq!(annotated[0].user_missing, vec!["butter"]);
/// assert_eq!(annotated[0].match_percent, 50);
/// ```
pub fn annotate(recipes: Vec<RecipeCandidate>, available: &[String]) -> Vec<AnnotatedRecipe> {
    // One lowercased lookup set per call, shared across all candidates
    let pantry: HashSet<String> = available.iter().map(|name| name.to_lowercase()).collect();

    debug!(
        "Annotating {} recipe candidates against {} distinct pantry ingredients",
        recipes.len(),
        pantry.len()
    );

    let annotated: Vec<AnnotatedRecipe> = recipes
        .into_iter()
        .map(|recipe| annotate_one(recipe, &pantry))
        .collect();

    info!("Annotated {} recipes", annotated.len());
    annotated
}

fn annotate_one(recipe: RecipeCandidate, pantry: &HashSet<String>) -> AnnotatedRecipe {
    let required = recipe.ingredients_required.len();
    let mut user_has = Vec::new();
    let mut user_missing = Vec::new();

    for ingredient in &recipe.ingredients_required {
        let normalized = ingredient.to_lowercase();
        if pantry.contains(&normalized) {
            user_has.push(normalized);
        } else {
            user_missing.push(normalized);
        }
    }

    let match_percent = match_percent(user_has.len(), required);

    AnnotatedRecipe {
        recipe,
        user_has,
        user_missing,
        match_percent,
    }
}

/// Compute the integer match percentage for `has` of `required` ingredients.
///
/// Rounding rule: round half up, in integer arithmetic. 1/3 yields 33,
/// 2/3 yields 67, 1/8 (12.5%) yields 13.
///
/// Two pinned boundary cases:
/// - `required == 0` yields 0 (a recipe with no stated ingredients cannot
///   be matched, and this avoids a division by zero)
/// - the result is 100 iff every required ingredient is on hand; an
///   incomplete match that would round up to 100 (e.g. 199/200) is
///   reported as 99
fn match_percent(has: usize, required: usize) -> u8 {
    if required == 0 {
        return 0;
    }
    if has == required {
        return 100;
    }
    let rounded = (200 * has + required) / (2 * required);
    rounded.min(99) as u8
}

/// Keep only recipes whose match percentage is at least `min_percent`.
///
/// This is a deliberately separate, opt-in post-processing step: the
/// annotation engine itself never filters, and nothing in the default
/// request pipeline calls this. Callers that want a cutoff apply it
/// downstream of [`annotate`].
pub fn retain_min_match(
    recipes: Vec<AnnotatedRecipe>,
    min_percent: u8,
) -> Vec<AnnotatedRecipe> {
    let before = recipes.len();
    let retained: Vec<AnnotatedRecipe> = recipes
        .into_iter()
        .filter(|recipe| recipe.match_percent >= min_percent)
        .collect();

    debug!(
        "Retained {} of {} recipes at >= {}% match",
        retained.len(),
        before,
        min_percent
    );
    retained
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, ingredients: &[&str]) -> RecipeCandidate {
        RecipeCandidate {
            name: name.to_string(),
            ingredients_required: ingredients.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn pantry(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_matching() {
        let annotated = annotate(vec![candidate("Salad", &["tomato"])], &pantry(&["Tomato"]));

        assert_eq!(annotated[0].user_has, vec!["tomato"]);
        assert!(annotated[0].user_missing.is_empty());
        assert_eq!(annotated[0].match_percent, 100);
    }

    #[test]
    fn test_empty_availability() {
        let annotated = annotate(vec![candidate("Crepes", &["egg", "milk"])], &[]);

        assert!(annotated[0].user_has.is_empty());
        assert_eq!(annotated[0].user_missing, vec!["egg", "milk"]);
        assert_eq!(annotated[0].match_percent, 0);
    }

    #[test]
    fn test_empty_requirements() {
        let annotated = annotate(vec![candidate("Water", &[])], &pantry(&["egg"]));

        assert!(annotated[0].user_has.is_empty());
        assert!(annotated[0].user_missing.is_empty());
        assert_eq!(annotated[0].match_percent, 0);
    }

    #[test]
    fn test_empty_recipe_list() {
        let annotated = annotate(vec![], &pantry(&["egg"]));

        assert!(annotated.is_empty());
    }

    #[test]
    fn test_full_match() {
        let annotated = annotate(
            vec![candidate("Pancakes", &["egg", "milk"])],
            &pantry(&["egg", "milk", "flour"]),
        );

        assert_eq!(annotated[0].match_percent, 100);
        assert!(annotated[0].user_missing.is_empty());
    }

    #[test]
    fn test_partition_preserves_order_and_duplicates() {
        let annotated = annotate(
            vec![candidate("Double Egg", &["Egg", "Milk", "egg", "Flour"])],
            &pantry(&["EGG"]),
        );

        // Duplicates counted individually, original relative order kept
        assert_eq!(annotated[0].user_has, vec!["egg", "egg"]);
        assert_eq!(annotated[0].user_missing, vec!["milk", "flour"]);
        assert_eq!(
            annotated[0].user_has.len() + annotated[0].user_missing.len(),
            annotated[0].recipe.ingredients_required.len()
        );
        assert_eq!(annotated[0].match_percent, 50);
    }

    #[test]
    fn test_match_percent_rounding() {
        // Round half up: documented and pinned
        assert_eq!(match_percent(1, 3), 33);
        assert_eq!(match_percent(2, 3), 67);
        assert_eq!(match_percent(1, 8), 13); // 12.5% rounds up
        assert_eq!(match_percent(1, 2), 50);
        assert_eq!(match_percent(0, 5), 0);
        assert_eq!(match_percent(5, 5), 100);
        assert_eq!(match_percent(0, 0), 0);
    }

    #[test]
    fn test_match_percent_100_only_on_full_match() {
        // 199/200 = 99.5% would round up to 100; an incomplete match
        // must not report as complete
        assert_eq!(match_percent(199, 200), 99);
    }

    #[test]
    fn test_no_implicit_filtering() {
        let recipes: Vec<RecipeCandidate> = (0..10)
            .map(|i| {
                let ingredients: Vec<String> =
                    (0..10).map(|j| format!("ingredient-{}", j)).collect();
                RecipeCandidate {
                    name: format!("recipe-{}", i),
                    ingredients_required: ingredients.into_iter().take(10 - i).collect(),
                    ..Default::default()
                }
            })
            .collect();
        let available: Vec<String> = (0..5).map(|j| format!("ingredient-{}", j)).collect();

        let annotated = annotate(recipes, &available);

        // All ten come back, in input order
        assert_eq!(annotated.len(), 10);
        for (i, recipe) in annotated.iter().enumerate() {
            assert_eq!(recipe.recipe.name, format!("recipe-{}", i));
        }
    }

    #[test]
    fn test_idempotence() {
        let recipes = vec![
            candidate("One", &["Egg", "Milk", "Flour"]),
            candidate("Two", &["Butter"]),
        ];
        let available = pantry(&["egg", "butter"]);

        let first = annotate(recipes.clone(), &available);
        let second = annotate(recipes, &available);

        // Byte-for-byte identical: output order derives from the input,
        // never from set iteration order
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_stir_fry_scenario() {
        let annotated = annotate(
            vec![candidate(
                "Lemon Garlic Chicken Stir-Fry",
                &["Chicken Breast", "Broccoli", "Olive Oil"],
            )],
            &pantry(&["chicken breast", "olive oil"]),
        );

        assert_eq!(annotated[0].user_has, vec!["chicken breast", "olive oil"]);
        assert_eq!(annotated[0].user_missing, vec!["broccoli"]);
        assert_eq!(annotated[0].match_percent, 67);
    }

    #[test]
    fn test_retain_min_match_is_opt_in() {
        let annotated = annotate(
            vec![
                candidate("Full", &["egg"]),
                candidate("Half", &["egg", "milk"]),
                candidate("None", &["milk"]),
            ],
            &pantry(&["egg"]),
        );

        let filtered = retain_min_match(annotated.clone(), 80);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].recipe.name, "Full");
        // The annotation path itself kept everything
        assert_eq!(annotated.len(), 3);
    }

    #[test]
    fn test_retain_min_match_zero_keeps_all() {
        let annotated = annotate(
            vec![candidate("A", &["milk"]), candidate("B", &[])],
            &pantry(&["egg"]),
        );

        assert_eq!(retain_min_match(annotated, 0).len(), 2);
    }
}
