//! Navigation instructions from a scene description.

use crate::config::InstructConfig;
use crate::defaults;
use crate::error::{RemoteEndpoint, Result, VisaidError};
use crate::pipeline::types::{Description, Instruction};
use crate::remote::chat;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::SystemTime;

/// Turns a scene description into a short spoken instruction.
#[async_trait]
pub trait InstructionClient: Send + Sync {
    async fn instruct(&self, description: &Description) -> Result<Instruction>;
}

/// [`InstructionClient`] backed by a Falcon chat-completions endpoint.
pub struct FalconInstructionClient {
    client: reqwest::Client,
    config: InstructConfig,
    api_key: String,
}

impl FalconInstructionClient {
    /// Build a client from configuration.
    ///
    /// Fails if no API key is configured.
    pub fn from_config(config: InstructConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| VisaidError::MissingApiKey {
                var: defaults::INSTRUCT_KEY_VAR.to_string(),
            })?;
        Ok(Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        })
    }

    fn request_body(&self, description: &Description) -> serde_json::Value {
        let prompt =
            defaults::INSTRUCT_PROMPT_TEMPLATE.replace("{description}", &description.text);
        json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": self.config.system_prompt},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": self.config.max_tokens,
        })
    }
}

#[async_trait]
impl InstructionClient for FalconInstructionClient {
    async fn instruct(&self, description: &Description) -> Result<Instruction> {
        let body = self.request_body(description);
        tracing::debug!(model = %self.config.model, "requesting instructions");
        let text = chat::post_chat(
            &self.client,
            &self.config.endpoint,
            &self.api_key,
            &body,
            RemoteEndpoint::Instruct,
        )
        .await?;
        Ok(Instruction {
            text,
            model: self.config.model.clone(),
            generated_at: SystemTime::now(),
        })
    }
}

/// Mock instruction client for testing
pub struct MockInstructionClient {
    response: Mutex<Option<String>>,
    should_fail: bool,
    calls: AtomicU32,
}

impl MockInstructionClient {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(None),
            should_fail: false,
            calls: AtomicU32::new(0),
        }
    }

    /// Create a mock that returns a specific instruction
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

    /// Number of times `instruct` was invoked.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockInstructionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstructionClient for MockInstructionClient {
    async fn instruct(&self, _description: &Description) -> Result<Instruction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(VisaidError::Remote {
                endpoint: RemoteEndpoint::Instruct,
                status: Some(500),
                message: "mock instruct failure".to_string(),
            });
        }
        let text = self
            .response
            .lock()
            .expect("mock lock")
            .clone()
            .unwrap_or_else(|| "continue walking straight ahead".to_string());
        Ok(Instruction {
            text,
            model: "mock".to_string(),
            generated_at: SystemTime::now(),
        })
    }
}
