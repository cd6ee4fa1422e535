//! # Pantry Recipes
//!
//! A recipe suggestion service for a grocery-inventory app: derives a
//! user's available ingredients from their scanned products, asks a
//! language-model completion API for recipe candidates, and annotates each
//! candidate with which required ingredients the user has, which are
//! missing, and an integer match percentage.

pub mod breaker;
pub mod config;
pub mod extraction;
pub mod generation;
pub mod matching;
pub mod recipe_model;
pub mod server;
