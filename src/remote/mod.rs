//! Remote model endpoints: scene description and instruction generation.

mod chat;
pub mod describe;
pub mod instruct;

pub use describe::{DescriptionClient, OpenAiDescriptionClient, MockDescriptionClient};
pub use instruct::{FalconInstructionClient, InstructionClient, MockInstructionClient};
