//! # Match Engine Integration Tests
//!
//! End-to-end properties of the ingredient match engine: order
//! preservation, partition completeness, rounding, and the documented
//! stir-fry scenario.

use pantry_recipes::matching::{annotate, retain_min_match};
use pantry_recipes::recipe_model::RecipeCandidate;

fn candidate(name: &str, ingredients: &[&str]) -> RecipeCandidate {
    RecipeCandidate {
        name: name.to_string(),
        ingredients_required: ingredients.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn test_order_preservation_and_partition_completeness() {
    let recipes = vec![
        candidate("Alpha", &["egg", "milk", "flour"]),
        candidate("Beta", &[]),
        candidate("Gamma", &["EGG", "egg", "butter"]),
    ];
    let available = vec!["egg".to_string(), "flour".to_string()];

    let annotated = annotate(recipes, &available);

    assert_eq!(annotated.len(), 3);
    for (name, entry) in ["Alpha", "Beta", "Gamma"].iter().zip(&annotated) {
        assert_eq!(&entry.recipe.name, name);
        assert_eq!(
            entry.user_has.len() + entry.user_missing.len(),
            entry.recipe.ingredients_required.len()
        );
    }

    assert_eq!(annotated[0].user_has, vec!["egg", "flour"]);
    assert_eq!(annotated[0].user_missing, vec!["milk"]);
    assert_eq!(annotated[0].match_percent, 67);

    assert_eq!(annotated[1].match_percent, 0);

    // Duplicates survive the partition individually
    assert_eq!(annotated[2].user_has, vec!["egg", "egg"]);
    assert_eq!(annotated[2].user_missing, vec!["butter"]);
}

#[test]
fn test_case_insensitivity() {
    let annotated = annotate(
        vec![candidate("Salad", &["tomato"])],
        &["Tomato".to_string()],
    );

    assert_eq!(annotated[0].user_has, vec!["tomato"]);
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
fn test_empty_requirements_yield_zero_not_an_error() {
    let annotated = annotate(vec![candidate("Water", &[])], &["egg".to_string()]);

    assert_eq!(annotated[0].match_percent, 0);
    assert!(annotated[0].user_has.is_empty());
    assert!(annotated[0].user_missing.is_empty());
}

#[test]
fn test_full_match_with_surplus_pantry() {
    let available: Vec<String> = ["egg", "milk", "flour"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let annotated = annotate(vec![candidate("Pancakes", &["egg", "milk"])], &available);

    assert_eq!(annotated[0].match_percent, 100);
}

#[test]
fn test_partial_match_rounding() {
    let annotated = annotate(
        vec![candidate("Cake", &["egg", "milk", "flour"])],
        &["egg".to_string()],
    );

    // 1/3 = 33.33%, rounded half up to 33
    assert_eq!(annotated[0].match_percent, 33);
}

#[test]
fn test_no_implicit_filtering_across_score_range() {
    let mut recipes = Vec::new();
    for i in 0..10 {
        let ingredients: Vec<String> = (0..10)
            .map(|j| {
                if j < i {
                    format!("have-{}", j)
                } else {
                    format!("missing-{}-{}", i, j)
                }
            })
            .collect();
        recipes.push(RecipeCandidate {
            name: format!("recipe-{}", i),
            ingredients_required: ingredients,
            ..Default::default()
        });
    }
    let available: Vec<String> = (0..10).map(|j| format!("have-{}", j)).collect();

    let annotated = annotate(recipes, &available);

    // Scores range from 0% to 90%; nothing is dropped or reordered
    assert_eq!(annotated.len(), 10);
    assert_eq!(annotated[0].match_percent, 0);
    assert_eq!(annotated[9].match_percent, 90);
    for (i, entry) in annotated.iter().enumerate() {
        assert_eq!(entry.recipe.name, format!("recipe-{}", i));
    }
}

#[test]
fn test_idempotence_is_byte_for_byte() {
    let recipes = vec![
        candidate("One", &["Egg", "Milk", "Flour", "egg"]),
        candidate("Two", &["Butter", "Salt"]),
    ];
    let available = vec!["egg".to_string(), "salt".to_string()];

    let first = serde_json::to_string(&annotate(recipes.clone(), &available)).unwrap();
    let second = serde_json::to_string(&annotate(recipes, &available)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_end_to_end_stir_fry_scenario() {
    let available = vec!["chicken breast".to_string(), "olive oil".to_string()];
    let recipes = vec![candidate(
        "Lemon Garlic Chicken Stir-Fry",
        &["Chicken Breast", "Broccoli", "Olive Oil"],
    )];

    let annotated = annotate(recipes, &available);

    assert_eq!(annotated[0].user_has, vec!["chicken breast", "olive oil"]);
    assert_eq!(annotated[0].user_missing, vec!["broccoli"]);
    assert_eq!(annotated[0].match_percent, 67);
}

#[test]
fn test_threshold_filter_is_a_separate_step() {
    let available = vec!["egg".to_string()];
    let annotated = annotate(
        vec![
            candidate("Boiled Egg", &["egg"]),
            candidate("Omelette", &["egg", "butter", "milk", "chives", "salt"]),
        ],
        &available,
    );

    // Annotation kept both; the cutoff only applies when explicitly asked for
    assert_eq!(annotated.len(), 2);

    let filtered = retain_min_match(annotated, 80);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].recipe.name, "Boiled Egg");
}

#[test]
fn test_display_fields_pass_through_untouched() {
    let recipe = RecipeCandidate {
        name: "Tomato Pasta".to_string(),
        brand: "Home Recipe".to_string(),
        description: "Weeknight classic".to_string(),
        ingredients_required: vec!["Pasta".to_string(), "Tomato".to_string()],
        instructions: vec!["Boil".to_string(), "Combine".to_string()],
        time_to_make: "20 minutes".to_string(),
        estimated_calories: serde_json::json!(420),
        image_url: "https://example.com/pasta.jpg".to_string(),
    };

    let annotated = annotate(vec![recipe.clone()], &["pasta".to_string()]);

    assert_eq!(annotated[0].recipe, recipe);
}
