//! Text-generation capability consumed by the digest pipeline.
//!
//! The pipeline never talks to a model directly: it receives an `Arc<dyn Generator>` and issues
//! one call per task with a [`GenerationParams`] preset. The Ollama-backed client issues HTTP
//! requests directly to the runtime's `/api/generate` endpoint.

mod presets;

pub use presets::{answer_params, points_params, summary_params};

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a generation backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Backend was unreachable or explicitly refused the request.
    #[error("Generation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Backend did not answer within the configured timeout.
    #[error("Generation timed out: {0}")]
    Timeout(String),
    /// Backend returned an error response.
    #[error("Failed to generate text: {0}")]
    GenerationFailed(String),
    /// Backend response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Per-call sampling configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    /// Beam count for beam-search capable backends.
    pub num_beams: u32,
    /// Penalty applied to already generated tokens (1.0 disables it).
    pub repetition_penalty: f32,
    /// Softmax temperature used when sampling.
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Sample from the distribution instead of decoding deterministically.
    pub do_sample: bool,
    /// Forbid repeating any n-gram of this size (0 disables it).
    pub no_repeat_ngram_size: u32,
}

/// Length bounds and sampling for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Lower bound on generated tokens, where the backend supports it.
    pub min_output_tokens: u32,
    /// Sampling configuration.
    pub sampling: SamplingConfig,
}

/// Interface implemented by text-generation backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Turn a prompt into raw generated text.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError>;
}

/// Build the generator configured for this process.
pub fn get_generator() -> Arc<dyn Generator> {
    let config = get_config();
    let timeout = config.generator_timeout_secs.map(Duration::from_secs);
    Arc::new(OllamaGenerator::new(
        config.ollama_url.clone(),
        config.generator_model.clone(),
        timeout,
    ))
}

/// Generator backed by a local Ollama runtime.
pub struct OllamaGenerator {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a client for `model` served at `base_url`.
    pub fn new(base_url: String, model: String, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder().user_agent("paper-digest/generate");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .expect("Failed to construct reqwest::Client for generation");
        Self {
            http,
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

/// Translate generation parameters into Ollama `options`.
///
/// Ollama has no beam search, minimum length, or n-gram blocking, so those fields are not sent.
fn ollama_options(params: &GenerationParams) -> Map<String, Value> {
    let sampling = &params.sampling;
    let mut options = Map::new();
    options.insert("num_predict".into(), json!(params.max_output_tokens));
    options.insert("top_p".into(), json!(sampling.top_p));
    options.insert("repeat_penalty".into(), json!(sampling.repetition_penalty));
    if sampling.do_sample {
        options.insert("temperature".into(), json!(sampling.temperature));
    } else {
        options.insert("temperature".into(), json!(0.0));
        options.insert("seed".into(), json!(0));
    }
    options
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        tracing::debug!(
            model = %self.model,
            max_tokens = params.max_output_tokens,
            min_tokens = params.min_output_tokens,
            beams = params.sampling.num_beams,
            no_repeat_ngram = params.sampling.no_repeat_ngram_size,
            prompt_chars = prompt.len(),
            "Requesting generation"
        );
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": Value::Object(ollama_options(params)),
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    GenerationError::Timeout(format!(
                        "Ollama at {} did not answer in time: {error}",
                        self.base_url
                    ))
                } else {
                    GenerationError::ProviderUnavailable(format!(
                        "failed to reach Ollama at {}: {error}",
                        self.base_url
                    ))
                }
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(GenerationError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}
