use crate::answer::ModelReply;
use crate::error::ServiceError;
use crate::traits::{ChatModel, Embedder};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Shared settings for the OpenAI-compatible embedding and chat endpoints.
/// The key is held in memory only; it is never logged or persisted.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            timeout,
        }
    }
}

pub struct OpenAiEmbedder {
    client: Client,
    config: OpenAiConfig,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    /// `dimensions` must match what the chosen model emits; the index build
    /// rejects vectors of any other length.
    pub fn new(
        config: OpenAiConfig,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            model: model.into(),
            dimensions,
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Embedding(format!(
                "embedding request returned {}",
                response.status()
            )));
        }

        let parsed: Value = response.json().await?;
        let vector = parsed
            .pointer("/data/0/embedding")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ServiceError::Embedding("response is missing embedding data".to_string())
            })?;

        vector
            .iter()
            .map(|value| {
                value.as_f64().map(|number| number as f32).ok_or_else(|| {
                    ServiceError::Embedding("embedding contains a non-numeric entry".to_string())
                })
            })
            .collect()
    }
}

pub struct OpenAiChatModel {
    client: Client,
    config: OpenAiConfig,
    model: String,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig, model: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            model: model.into(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, prompt: &str) -> Result<ModelReply, ServiceError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Model(format!(
                "chat request returned {}",
                response.status()
            )));
        }

        let parsed: Value = response.json().await?;
        ModelReply::from_value(&parsed)
    }
}
