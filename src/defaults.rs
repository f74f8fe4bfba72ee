//! Default configuration constants for visaid.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Default capture directory, relative to the Termux home.
///
/// `termux-setup-storage` links `~/storage/dcim` to the shared DCIM folder,
/// which is writable by the camera service.
pub const CAPTURE_DIR: &str = "storage/dcim";

/// Default edge length in pixels for the transport image.
///
/// 512x512 keeps the base64 payload small enough for low-detail vision
/// requests while preserving obstacle-scale features.
pub const TARGET_SIZE: u32 = 512;

/// JPEG quality for the re-encoded transport image.
pub const JPEG_QUALITY: u8 = 85;

/// Default vision model for image description.
pub const DESCRIBE_MODEL: &str = "gpt-4o-mini";

/// Default chat model for navigation instructions.
pub const INSTRUCT_MODEL: &str = "tiiuae/falcon-180B-chat";

/// Chat-completions endpoint for the description model.
pub const DESCRIBE_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Chat-completions endpoint for the instruction model.
pub const INSTRUCT_ENDPOINT: &str = "https://api.ai71.ai/v1/chat/completions";

/// Response-length cap for descriptions.
pub const DESCRIBE_MAX_TOKENS: u32 = 300;

/// Response-length cap for instructions.
///
/// Instructions are spoken aloud while the user is moving, so they must be
/// short enough to finish before the next capture.
pub const INSTRUCT_MAX_TOKENS: u32 = 100;

/// User prompt sent with every image.
pub const DESCRIBE_PROMPT: &str = "Describe this image concisely for a blind person. \
Focus on hazards, spatial layout, and obstacles.";

/// System prompt fixed for the instruction model.
pub const INSTRUCT_SYSTEM_PROMPT: &str = "You are an AI assistant helping a blind person \
navigate. Provide very brief, clear instructions for safe movement based on the image \
description.";

/// User-message template for the instruction model. `{description}` is
/// replaced with the description text.
pub const INSTRUCT_PROMPT_TEMPLATE: &str = "Based on this image description, what should \
a blind person do next? Keep it brief. Image description: {description}";

/// Fallback text surfaced (and spoken) when description generation fails.
pub const DESCRIBE_FALLBACK: &str = "I'm sorry, I couldn't generate a description at this time.";

/// Fallback text surfaced (and spoken) when instruction generation fails.
pub const INSTRUCT_FALLBACK: &str = "I'm sorry, I couldn't generate instructions at this time.";

/// Greeting spoken once before the walk loop starts.
pub const WELCOME_MESSAGE: &str = "VisionAId walk assistant is ready to help you.";

/// Default seconds between continuous pipeline invocations.
pub const INTERVAL_SECS: u64 = 10;

/// Environment variable holding the description endpoint API key.
pub const DESCRIBE_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the instruction endpoint API key.
pub const INSTRUCT_KEY_VAR: &str = "AI71_API_KEY";
