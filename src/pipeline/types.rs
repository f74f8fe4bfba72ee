//! Data types flowing through the capture-describe-instruct-speak pipeline.

use std::path::PathBuf;
use std::time::SystemTime;

/// Which physical camera to capture from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSelector {
    /// Back camera (`termux-camera-photo -c 0`).
    Back,
    /// Front camera (`termux-camera-photo -c 1`).
    Front,
}

impl CameraSelector {
    /// Numeric id as expected by `termux-camera-photo -c`.
    pub fn id(self) -> u8 {
        match self {
            CameraSelector::Back => 0,
            CameraSelector::Front => 1,
        }
    }
}

impl Default for CameraSelector {
    fn default() -> Self {
        CameraSelector::Back
    }
}

/// A photo freshly taken by the device.
///
/// Owned exclusively by the pipeline invocation that requested it; nothing
/// is retained across invocations.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Path the camera tool wrote the photo to.
    pub path: PathBuf,
    /// Camera the photo was taken with.
    pub camera: CameraSelector,
    /// Capture timestamp.
    pub captured_at: SystemTime,
}

impl CapturedImage {
    pub fn new(path: PathBuf, camera: CameraSelector) -> Self {
        Self {
            path,
            camera,
            captured_at: SystemTime::now(),
        }
    }
}

/// A resized image re-expressed as base64 for inclusion in a JSON body.
///
/// Derived deterministically from a [`CapturedImage`]; immutable once
/// produced.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Base64 of the re-encoded JPEG bytes.
    pub base64: String,
    /// Width after cover-resize and crop.
    pub width: u32,
    /// Height after cover-resize and crop.
    pub height: u32,
    /// Format the source image was decoded from (e.g. "jpeg", "png").
    pub source_format: String,
    /// Size in bytes of the re-encoded JPEG (before base64 expansion).
    pub byte_len: usize,
}

impl EncodedImage {
    /// The image as a `data:` URL, the form the vision endpoint expects.
    pub fn as_data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.base64)
    }
}

/// A natural-language description bound to the image that produced it.
#[derive(Debug, Clone)]
pub struct Description {
    pub text: String,
    /// Identifier of the model that generated the text.
    pub model: String,
    pub generated_at: SystemTime,
}

/// Navigation guidance bound to the description that produced it.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub text: String,
    /// Identifier of the model that generated the text.
    pub model: String,
    pub generated_at: SystemTime,
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capture,
    Preprocess,
    Describe,
    Instruct,
    Speak,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Capture => "capture",
            Stage::Preprocess => "preprocess",
            Stage::Describe => "describe",
            Stage::Instruct => "instruct",
            Stage::Speak => "speak",
        };
        write!(f, "{name}")
    }
}

/// Outcome of one pipeline invocation.
///
/// Exactly one is produced per invocation and never mutated afterwards.
/// `Clone` so the continuous runner can fan it out to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    /// All remote stages succeeded. `spoken` is false when text-to-speech
    /// failed; the textual payload is still valid.
    Success {
        description: String,
        instruction: String,
        spoken: bool,
    },
    /// A remote stage failed after earlier stages succeeded. `message` is
    /// the user-facing fallback text; `description` carries the stage-3
    /// output when the failure happened at Instruct.
    PartialFailure {
        stage: Stage,
        description: Option<String>,
        message: String,
    },
    /// An early stage failed outright; nothing useful was produced.
    Failure { stage: Stage, message: String },
}

impl PipelineResult {
    /// True only for the hard-failure variant. The continuous runner stops
    /// the session on these; partial failures keep it going.
    pub fn is_hard_failure(&self) -> bool {
        matches!(self, PipelineResult::Failure { .. })
    }
}
