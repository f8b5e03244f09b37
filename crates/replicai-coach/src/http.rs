//! HTTP advisory service for OpenAI-compatible vision chat endpoints

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{AdvisoryError, AdvisoryResult, AdvisoryService};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const SYSTEM_PROMPT: &str =
    "You are a concise personal trainer. Answer with one or two short, actionable sentences.";

#[derive(Debug, Clone)]
pub struct HttpAdvisoryConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_endpoint: String,
    pub timeout: Duration,
}

impl Default for HttpAdvisoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl HttpAdvisoryConfig {
    /// Read `ADVISORY_API_KEY`, `ADVISORY_MODEL`, `ADVISORY_API_ENDPOINT`
    /// and `ADVISORY_TIMEOUT_MS`, keeping defaults for anything unset
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env_string("ADVISORY_API_KEY"),
            model: env_string("ADVISORY_MODEL").unwrap_or(defaults.model),
            api_endpoint: normalize_endpoint(
                env_string("ADVISORY_API_ENDPOINT").unwrap_or(defaults.api_endpoint),
            ),
            timeout: env_u64("ADVISORY_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Advisory service backed by a vision-capable chat completion API
#[derive(Clone)]
pub struct HttpAdvisoryService {
    config: HttpAdvisoryConfig,
    client: reqwest::Client,
}

impl HttpAdvisoryService {
    pub fn new(config: HttpAdvisoryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(HttpAdvisoryConfig::from_env())
    }

    pub fn config(&self) -> &HttpAdvisoryConfig {
        &self.config
    }
}

impl AdvisoryService for HttpAdvisoryService {
    fn is_available(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|v| !v.trim().is_empty())
            && !self.config.model.trim().is_empty()
            && !self.config.api_endpoint.trim().is_empty()
    }

    fn generate(
        &self,
        image: Vec<u8>,
        prompt: String,
    ) -> BoxFuture<'static, AdvisoryResult<String>> {
        let client = self.client.clone();
        let config = self.config.clone();

        async move {
            let api_key = config
                .api_key
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .ok_or(AdvisoryError::NotConfigured("ADVISORY_API_KEY"))?;

            let url = format!("{}/chat/completions", config.api_endpoint.trim_end_matches('/'));
            let payload = build_payload(&config.model, &prompt, &image);

            let resp = client.post(&url).bearer_auth(api_key).json(&payload).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(AdvisoryError::HttpStatus { status, body });
            }

            let bytes = resp.bytes().await?;
            let parsed: ChatResponse = serde_json::from_slice(&bytes)?;
            parsed
                .first_content()
                .map(|s| s.trim().to_string())
                .ok_or(AdvisoryError::EmptyResponse)
        }
        .boxed()
    }
}

fn build_payload(model: &str, prompt: &str, image: &[u8]) -> Value {
    let data_url = format!("data:{};base64,{}", image_mime(image), STANDARD.encode(image));
    json!({
        "model": model,
        "stream": false,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]
            }
        ]
    })
}

fn image_mime(image: &[u8]) -> &'static str {
    if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else {
        "image/jpeg"
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.parse().ok()
}

fn normalize_endpoint(endpoint: String) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.ends_with("/v1") || trimmed.contains("/v1/") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}
