//! Pipeline orchestration and the data types flowing through it.

pub mod cdis;
pub mod types;

pub use cdis::CdisPipeline;
pub use types::{
    CameraSelector, CapturedImage, Description, EncodedImage, Instruction, PipelineResult, Stage,
};
