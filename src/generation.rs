//! # Recipe Generation Client
//!
//! This module talks to an OpenAI-compatible chat-completions endpoint to
//! obtain recipe candidates for a set of available ingredients.
//!
//! The completion API is the one flaky external collaborator in the
//! pipeline, so the client wraps it defensively: transient failures are
//! retried with exponential backoff and random jitter, and a circuit
//! breaker rejects calls fast while the upstream is known to be down.
//! Model responses are markdown-tolerant: code fences around the JSON
//! array are stripped before parsing.
//!
//! The [`RecipeGenerator`] trait is the seam between the HTTP boundary and
//! this client; request handlers are tested against stub implementations
//! without any network access.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::breaker::CircuitBreaker;
use crate::config::GenerationConfig;
use crate::recipe_model::RecipeCandidate;

/// Source of recipe candidates for a set of available ingredients.
///
/// Implementations must deliver a list of candidates or fail; the caller
/// handles an empty list gracefully (the user sees "no recipes" rather
/// than an error).
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// Generate recipe candidates based on the available ingredients
    async fn generate(&self, available: &[String]) -> Result<Vec<RecipeCandidate>>;
}

// Chat-completions wire types, OpenAI-compatible format

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// One failed call attempt, tagged with whether a retry could help
struct AttemptError {
    error: anyhow::Error,
    retryable: bool,
}

/// Recipe-generation client for an OpenAI-compatible completion API.
///
/// Construction requires an explicit [`GenerationConfig`]; the client
/// never reads the environment itself.
pub struct OpenAiRecipeClient {
    http: Client,
    config: GenerationConfig,
    breaker: CircuitBreaker,
}

impl OpenAiRecipeClient {
    /// Create a client from the given configuration
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client for recipe generation")?;

        let breaker = CircuitBreaker::new(config.breaker.clone());

        Ok(Self {
            http,
            config,
            breaker,
        })
    }

    /// Build the recipe-generation prompt for the given ingredient list
    fn build_prompt(&self, available: &[String]) -> String {
        let ingredient_list = available.join(", ");

        format!(
            r#"I have the following food items: {ingredient_list}.
Also assume I have all common vegetables, spices, oil, salt, etc.

Based on this, suggest multiple recipes. For each recipe, return a JSON object with:
- name (e.g., "Cheesy Pizza", "Tomato Pasta", "Spicy Chickpea Snack", etc.)
- brand (e.g., "Quick Recipe", "Home Recipe", "Easy Dinner", etc.)
- description (a short summary about the dish, its flavor, and when it can be enjoyed)
- ingredients_required (list of ingredient name strings, one per required ingredient)
- instructions (list of strings)(detailed, step-by-step instructions for each stage of preparation and cooking)
- time_to_make (e.g., "20 minutes")
- estimated_calories (number)
- imageUrl (direct link to an image of the final dish)

Please ensure the recipes are based on the ingredients provided and can be easily made. Respond strictly in JSON array format as shown in the example below:
[
  {{
    "name": "Lemon Garlic Chicken Stir-Fry",
    "brand": "Quick Recipe",
    "description": "A zesty, protein-rich stir-fry perfect for weeknight dinners.",
    "ingredients_required": ["Chicken Breast", "Broccoli", "Olive Oil"],
    "instructions": [
      "Step 1: Marinate chicken in lemon juice, minced garlic, and a tablespoon of olive oil for 10 minutes.",
      "Step 2: Heat a pan over medium heat and add the marinated chicken. Cook for 5-6 minutes until browned.",
      "Step 3: Add chopped broccoli and saute for another 5-7 minutes. Stir occasionally.",
      "Step 4: Adjust seasoning with salt, pepper, and a squeeze of fresh lemon.",
      "Step 5: Serve hot with optional rice or noodles."
    ],
    "time_to_make": "30 minutes",
    "estimated_calories": 350,
    "imageUrl": "https://example.com/image.jpg"
  }}
]"#
        )
    }

    /// Perform a single completion call, returning the message content
    async fn complete_once(&self, prompt: &str) -> Result<String, AttemptError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a helpful recipe generator AI, providing meal ideas based on the ingredients provided.".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AttemptError {
                error: anyhow!(e).context("Completion request failed"),
                retryable: true,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError {
                error: anyhow!(
                    "Completion API returned {}: {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
                retryable: is_retryable_status(status),
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(|e| AttemptError {
                error: anyhow!(e).context("Failed to decode completion response"),
                retryable: true,
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AttemptError {
                error: anyhow!("Completion response contained no message content"),
                retryable: true,
            })
    }

    /// Delay before the next retry: exponential backoff plus random jitter
    fn retry_delay(&self, attempt: u32) -> Duration {
        let retry = &self.config.retry;
        let backoff = retry
            .base_retry_delay_ms
            .saturating_mul(1 << attempt.min(16))
            .min(retry.max_retry_delay_ms);
        let jitter = rand::thread_rng().gen_range(0..=retry.base_retry_delay_ms / 2);
        Duration::from_millis(backoff + jitter)
    }
}

#[async_trait]
impl RecipeGenerator for OpenAiRecipeClient {
    async fn generate(&self, available: &[String]) -> Result<Vec<RecipeCandidate>> {
        if available.is_empty() {
            warn!("No available ingredients provided, skipping generation call");
            return Ok(Vec::new());
        }

        if self.breaker.is_open() {
            return Err(anyhow!(
                "Recipe generation temporarily unavailable: too many recent upstream failures"
            ));
        }

        let prompt = self.build_prompt(available);
        debug!(
            ingredient_count = available.len(),
            model = %self.config.model,
            "Requesting recipe candidates"
        );

        let mut attempt = 0;
        let content = loop {
            match self.complete_once(&prompt).await {
                Ok(content) => break content,
                Err(failed) if failed.retryable && attempt < self.config.retry.max_retries => {
                    let delay = self.retry_delay(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %failed.error,
                        "Completion attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failed) => {
                    self.breaker.record_failure();
                    return Err(failed.error.context("Failed to generate recipes"));
                }
            }
        };

        match parse_recipes(&content) {
            Ok(recipes) => {
                self.breaker.record_success();
                info!(recipe_count = recipes.len(), "Recipe generation succeeded");
                Ok(recipes)
            }
            Err(e) => {
                self.breaker.record_failure();
                Err(e)
            }
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Strip markdown code fences the model sometimes wraps around its JSON
fn strip_code_fences(content: &str) -> String {
    content.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse the completion content into recipe candidates.
///
/// The content must be a JSON array of recipe objects, optionally wrapped
/// in markdown code fences.
fn parse_recipes(content: &str) -> Result<Vec<RecipeCandidate>> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str(&cleaned).context("Completion response was not a valid JSON recipe array")
}
