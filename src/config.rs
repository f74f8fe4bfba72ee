use crate::defaults;
use crate::pipeline::types::CameraSelector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub image: ImageConfig,
    pub describe: DescribeConfig,
    pub instruct: InstructConfig,
    pub runner: RunnerConfig,
}

/// Camera capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Which physical camera to use.
    pub selector: CameraSelector,
    /// Directory photos are written into. Relative paths resolve against
    /// the home directory.
    pub capture_dir: PathBuf,
}

/// Image preprocessing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// Edge length of the square transport image.
    pub target_size: u32,
    /// JPEG quality for the re-encoded transport image.
    pub jpeg_quality: u8,
    /// Optional directory to persist resized copies into.
    pub scratch_dir: Option<PathBuf>,
}

/// Requested detail level for the vision endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Low,
    High,
}

impl DetailLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DetailLevel::Low => "low",
            DetailLevel::High => "high",
        }
    }
}

/// Description endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DescribeConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub detail: DetailLevel,
    /// User prompt sent alongside the image.
    pub prompt: String,
    /// API key; normally injected from the environment, not the file.
    pub api_key: Option<String>,
}

/// Instruction endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstructConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    /// System prompt fixing the assistant's role.
    pub system_prompt: String,
    /// API key; normally injected from the environment, not the file.
    pub api_key: Option<String>,
}

/// Continuous runner configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Seconds between pipeline invocations.
    pub interval_secs: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            selector: CameraSelector::Back,
            capture_dir: PathBuf::from(defaults::CAPTURE_DIR),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            target_size: defaults::TARGET_SIZE,
            jpeg_quality: defaults::JPEG_QUALITY,
            scratch_dir: None,
        }
    }
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DESCRIBE_ENDPOINT.to_string(),
            model: defaults::DESCRIBE_MODEL.to_string(),
            max_tokens: defaults::DESCRIBE_MAX_TOKENS,
            detail: DetailLevel::Low,
            prompt: defaults::DESCRIBE_PROMPT.to_string(),
            api_key: None,
        }
    }
}

impl Default for InstructConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::INSTRUCT_ENDPOINT.to_string(),
            model: defaults::INSTRUCT_MODEL.to_string(),
            max_tokens: defaults::INSTRUCT_MAX_TOKENS,
            system_prompt: defaults::INSTRUCT_SYSTEM_PROMPT.to_string(),
            api_key: None,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(crate::VisaidError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - OPENAI_API_KEY → describe.api_key
    /// - AI71_API_KEY → instruct.api_key
    /// - VISAID_CAMERA → camera.selector ("back" or "front")
    /// - VISAID_DESCRIBE_MODEL → describe.model
    /// - VISAID_INSTRUCT_MODEL → instruct.model
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(defaults::DESCRIBE_KEY_VAR)
            && !key.is_empty()
        {
            self.describe.api_key = Some(key);
        }

        if let Ok(key) = std::env::var(defaults::INSTRUCT_KEY_VAR)
            && !key.is_empty()
        {
            self.instruct.api_key = Some(key);
        }

        if let Ok(camera) = std::env::var("VISAID_CAMERA") {
            match camera.as_str() {
                "back" => self.camera.selector = CameraSelector::Back,
                "front" => self.camera.selector = CameraSelector::Front,
                _ => {}
            }
        }

        if let Ok(model) = std::env::var("VISAID_DESCRIBE_MODEL")
            && !model.is_empty()
        {
            self.describe.model = model;
        }

        if let Ok(model) = std::env::var("VISAID_INSTRUCT_MODEL")
            && !model.is_empty()
        {
            self.instruct.model = model;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/visaid/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("visaid").join("config.toml"))
    }

    /// Resolve the capture directory against the home directory when it is
    /// relative (Termux photos land under `~/storage/dcim`).
    pub fn resolved_capture_dir(&self) -> PathBuf {
        if self.camera.capture_dir.is_absolute() {
            return self.camera.capture_dir.clone();
        }
        match dirs::home_dir() {
            Some(home) => home.join(&self.camera.capture_dir),
            None => self.camera.capture_dir.clone(),
        }
    }
}
