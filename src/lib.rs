//! visaid - Vision-guided walking assistance for Termux
//!
//! Takes a photo, asks a vision model what is there, asks a language model
//! how to walk through it, and speaks the answer.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod preprocess;
pub mod remote;
pub mod runner;

// Core traits (capture → preprocess → describe → instruct → speak)
pub use device::{
    CommandExecutor, DeviceCapability, MockCommandExecutor, MockDevice, SystemCommandExecutor,
    TermuxDevice,
};
pub use preprocess::ImagePreprocessor;
pub use remote::{
    DescriptionClient, FalconInstructionClient, InstructionClient, MockDescriptionClient,
    MockInstructionClient, OpenAiDescriptionClient,
};

// Pipeline
pub use pipeline::{CameraSelector, CdisPipeline, PipelineResult, Stage};
pub use runner::ContinuousRunner;

// Error handling
pub use error::{Result, VisaidError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
