//! The capture-describe-instruct-speak pipeline.
//!
//! One invocation walks the stages in order. Capture and preprocess failures
//! abort the invocation; remote failures degrade to a spoken fallback; a
//! text-to-speech failure only clears the `spoken` flag.

use crate::defaults;
use crate::device::DeviceCapability;
use crate::pipeline::types::{CameraSelector, PipelineResult, Stage};
use crate::preprocess::ImagePreprocessor;
use crate::remote::{DescriptionClient, InstructionClient};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Orchestrates one walk-assistance cycle end to end.
pub struct CdisPipeline {
    device: Arc<dyn DeviceCapability>,
    preprocessor: ImagePreprocessor,
    describer: Arc<dyn DescriptionClient>,
    instructor: Arc<dyn InstructionClient>,
    camera: CameraSelector,
    target_size: u32,
    // Serializes invocations; a photo must never be described while the
    // next one is already being taken.
    gate: Mutex<()>,
}

impl CdisPipeline {
    pub fn new(
        device: Arc<dyn DeviceCapability>,
        preprocessor: ImagePreprocessor,
        describer: Arc<dyn DescriptionClient>,
        instructor: Arc<dyn InstructionClient>,
    ) -> Self {
        Self {
            device,
            preprocessor,
            describer,
            instructor,
            camera: CameraSelector::default(),
            target_size: defaults::TARGET_SIZE,
            gate: Mutex::new(()),
        }
    }

    pub fn with_camera(mut self, camera: CameraSelector) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_target_size(mut self, target_size: u32) -> Self {
        self.target_size = target_size;
        self
    }

    /// Run one capture-describe-instruct-speak cycle.
    ///
    /// Never returns `Err`; every failure mode is folded into the
    /// [`PipelineResult`] so callers decide policy, not plumbing.
    pub async fn run_once(&self) -> PipelineResult {
        let _invocation = self.gate.lock().await;

        let captured = match self.device.take_photo(self.camera) {
            Ok(captured) => captured,
            Err(e) => {
                tracing::error!(stage = %Stage::Capture, error = %e, "pipeline aborted");
                return PipelineResult::Failure {
                    stage: Stage::Capture,
                    message: e.to_string(),
                };
            }
        };

        let target = (self.target_size, self.target_size);
        let encoded = match self.preprocessor.prepare(&captured, target) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(stage = %Stage::Preprocess, error = %e, "pipeline aborted");
                return PipelineResult::Failure {
                    stage: Stage::Preprocess,
                    message: e.to_string(),
                };
            }
        };

        let description = match self.describer.describe(&encoded).await {
            Ok(description) => description,
            Err(e) => {
                tracing::warn!(stage = %Stage::Describe, error = %e, "remote stage failed");
                self.speak_fallback(defaults::DESCRIBE_FALLBACK);
                return PipelineResult::PartialFailure {
                    stage: Stage::Describe,
                    description: None,
                    message: defaults::DESCRIBE_FALLBACK.to_string(),
                };
            }
        };
        tracing::info!(description = %description.text, "scene described");

        let instruction = match self.instructor.instruct(&description).await {
            Ok(instruction) => instruction,
            Err(e) => {
                tracing::warn!(stage = %Stage::Instruct, error = %e, "remote stage failed");
                self.speak_fallback(defaults::INSTRUCT_FALLBACK);
                return PipelineResult::PartialFailure {
                    stage: Stage::Instruct,
                    description: Some(description.text),
                    message: defaults::INSTRUCT_FALLBACK.to_string(),
                };
            }
        };
        tracing::info!(instruction = %instruction.text, "guidance ready");

        let spoken = match self.device.speak(&instruction.text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(stage = %Stage::Speak, error = %e, "speech output failed");
                false
            }
        };

        PipelineResult::Success {
            description: description.text,
            instruction: instruction.text,
            spoken,
        }
    }

    /// Tell the user something went wrong. Best effort; a silent failure
    /// here changes nothing about the returned result.
    fn speak_fallback(&self, text: &str) {
        if let Err(e) = self.device.speak(text) {
            tracing::warn!(error = %e, "could not speak fallback message");
        }
    }
}
