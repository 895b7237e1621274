use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use crate::config::LlmSettings;
use crate::models::StyleKeywords;

/// Styling tips are cut to this many words
pub const MAX_TIP_WORDS: usize = 50;

/// Errors that can occur when calling the chat completion API
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Empty response from LLM")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completion client
pub struct LlmClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.trim().to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// One system + user exchange; returns the trimmed reply
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        if !self.is_configured() {
            return Err(LlmError::MissingApiKey);
        }

        let url = format!("{}/chat/completions", self.base_url);
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": self.temperature,
        });

        tracing::debug!("Chat completion request: model={}, prompt_chars={}", self.model, user.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body: truncate_chars(&body, 500),
            });
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    /// Ask for the keyword JSON, falling back to defaults when it does not parse
    pub async fn extract_style_keywords(&self, system: &str, prompt: &str) -> Result<StyleKeywords, LlmError> {
        let content = self.complete(system, prompt).await?;
        Ok(parse_style_keywords(&content))
    }

    pub async fn styling_tips(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let content = self.complete(system, prompt).await?;
        Ok(truncate_words(&content, MAX_TIP_WORDS))
    }
}

/// Strip a leading markdown fence (with optional `json` tag)
pub fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();
    if !content.starts_with("```") {
        return content;
    }
    let inner = content.split("```").nth(1).unwrap_or("");
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

pub fn parse_style_keywords(content: &str) -> StyleKeywords {
    match serde_json::from_str::<StyleKeywords>(strip_code_fence(content)) {
        Ok(keywords) => keywords,
        Err(e) => {
            tracing::warn!(
                "Style keyword JSON did not parse ({}), using defaults. Raw: {}",
                e,
                truncate_chars(content, 200)
            );
            StyleKeywords::default()
        }
    }
}

/// Keep the first `max` words, marking the cut with `...`
pub fn truncate_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max {
        format!("{}...", words[..max].join(" "))
    } else {
        text.trim().to_string()
    }
}

fn truncate_chars(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{}... (truncated)", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn test_parse_style_keywords_partial_object() {
        let keywords = parse_style_keywords(r#"{"style_keywords": ["minimal", "elegant"]}"#);
        assert_eq!(keywords.style_keywords, vec!["minimal", "elegant"]);
        assert!(keywords.color_preferences.is_empty());
    }

    #[test]
    fn test_parse_style_keywords_falls_back() {
        assert_eq!(parse_style_keywords("Sure! Here are keywords"), StyleKeywords::default());
        assert_eq!(parse_style_keywords("[1, 2]"), StyleKeywords::default());
    }

    #[test]
    fn test_truncate_words() {
        let long = vec!["w"; 60].join(" ");
        let cut = truncate_words(&long, MAX_TIP_WORDS);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.trim_end_matches("...").split_whitespace().count(), 50);
        assert_eq!(truncate_words("  short tip ", 50), "short tip");
    }
}
