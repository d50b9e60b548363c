use crate::fetcher::Fetcher;
use crate::prompt::GenerationRequest;
use crate::traits::TextGenerator;
use crate::types::{NewsError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "mistral";

/// Text generator backed by a local Ollama server (`/api/generate`, non-streaming)
pub struct OllamaGenerator {
    fetcher: Fetcher,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OllamaGenerator {
    pub fn new(fetcher: Fetcher, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    system: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn generator_name(&self) -> String {
        format!("ollama/{}", self.model)
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = Fetcher::endpoint(&self.base_url, "/api/generate")?;
        let body = GenerateBody {
            model: &self.model,
            system: request.system_prompt(),
            prompt: request.user_prompt(),
            stream: false,
            options: self
                .temperature
                .map(|temperature| GenerateOptions { temperature }),
        };

        let started = Instant::now();
        debug!("Calling {} as '{}'", self.generator_name(), request.role);

        let response: GenerateResponse = self
            .fetcher
            .post_json(url, &body)
            .await
            .map_err(|e| NewsError::GenerationFailure(format!("{}: {}", self.generator_name(), e)))?;

        if let Some(error) = response.error {
            return Err(NewsError::GenerationFailure(format!(
                "{}: {}",
                self.generator_name(),
                error
            )));
        }

        let text = response.response.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(NewsError::GenerationFailure(format!(
                "{} returned an empty response",
                self.generator_name()
            )));
        }

        info!(
            "{} answered '{}' in {}ms ({} chars)",
            self.generator_name(),
            request.role,
            started.elapsed().as_millis(),
            text.len()
        );
        Ok(text)
    }
}
