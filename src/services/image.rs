use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use crate::config::ImageSettings;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("No image data in response")]
    NoImage,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    width: u32,
    height: u32,
    steps: u32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

/// Text-to-image client for the mannequin render
pub struct ImageClient {
    base_url: String,
    api_key: String,
    model: String,
    width: u32,
    height: u32,
    steps: u32,
    client: Client,
}

impl ImageClient {
    /// `None` when no API key is configured
    pub fn from_settings(settings: &ImageSettings) -> Result<Option<Self>, ImageError> {
        let api_key = match settings.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Ok(None),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Some(Self {
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            width: settings.width,
            height: settings.height,
            steps: settings.steps,
            client,
        }))
    }

    /// Generate a single image and return its URL
    pub async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let url = format!("{}/images/generations", self.base_url);
        let request = GenerationRequest {
            model: &self.model,
            prompt,
            width: self.width,
            height: self.height,
            steps: self.steps,
            n: 1,
        };

        tracing::debug!("Image generation request: model={}, prompt_chars={}", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::ApiError {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let generated: GenerationResponse = response.json().await?;
        generated
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or(ImageError::NoImage)
    }
}
