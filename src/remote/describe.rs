//! Scene description via a vision chat-completions endpoint.

use crate::config::DescribeConfig;
use crate::defaults;
use crate::error::{RemoteEndpoint, Result, VisaidError};
use crate::pipeline::types::{Description, EncodedImage};
use crate::remote::chat;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::SystemTime;

/// Turns a captured scene into a short textual description.
#[async_trait]
pub trait DescriptionClient: Send + Sync {
    async fn describe(&self, image: &EncodedImage) -> Result<Description>;
}

/// [`DescriptionClient`] backed by the OpenAI vision chat-completions API.
pub struct OpenAiDescriptionClient {
    client: reqwest::Client,
    config: DescribeConfig,
    api_key: String,
}

impl OpenAiDescriptionClient {
    /// Build a client from configuration.
    ///
    /// Fails if no API key is configured (neither in the file nor via the
    /// environment override).
    pub fn from_config(config: DescribeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| VisaidError::MissingApiKey {
                var: defaults::DESCRIBE_KEY_VAR.to_string(),
            })?;
        Ok(Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        })
    }

    fn request_body(&self, image: &EncodedImage) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": self.config.prompt},
                    {
                        "type": "image_url",
                        "image_url": {
                            "url": image.as_data_url(),
                            "detail": self.config.detail.as_str(),
                        },
                    },
                ],
            }],
            "max_tokens": self.config.max_tokens,
        })
    }
}

#[async_trait]
impl DescriptionClient for OpenAiDescriptionClient {
    async fn describe(&self, image: &EncodedImage) -> Result<Description> {
        let body = self.request_body(image);
        tracing::debug!(
            model = %self.config.model,
            payload_bytes = image.byte_len,
            "requesting description"
        );
        let text = chat::post_chat(
            &self.client,
            &self.config.endpoint,
            &self.api_key,
            &body,
            RemoteEndpoint::Describe,
        )
        .await?;
        Ok(Description {
            text,
            model: self.config.model.clone(),
            generated_at: SystemTime::now(),
        })
    }
}

/// Mock description client for testing
pub struct MockDescriptionClient {
    response: Mutex<Option<String>>,
    should_fail: bool,
    calls: AtomicU32,
}

impl MockDescriptionClient {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(None),
            should_fail: false,
            calls: AtomicU32::new(0),
        }
    }

    /// Create a mock that returns a specific description
    pub fn with_response(text: &str) -> Self {
        Self {
            response: Mutex::new(Some(text.to_string())),
            should_fail: false,
            calls: AtomicU32::new(0),
        }
    }

    /// Create a mock that simulates an endpoint failure
    pub fn with_failure() -> Self {
        Self {
            response: Mutex::new(None),
            should_fail: true,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of times `describe` was invoked.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockDescriptionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DescriptionClient for MockDescriptionClient {
    async fn describe(&self, _image: &EncodedImage) -> Result<Description> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(VisaidError::Remote {
                endpoint: RemoteEndpoint::Describe,
                status: Some(500),
                message: "mock describe failure".to_string(),
            });
        }
        let text = self
            .response
            .lock()
            .expect("mock lock")
            .clone()
            .unwrap_or_else(|| "a clear path ahead".to_string());
        Ok(Description {
            text,
            model: "mock".to_string(),
            generated_at: SystemTime::now(),
        })
    }
}
