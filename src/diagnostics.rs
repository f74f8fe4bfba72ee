//! System diagnostics and dependency checking.
//!
//! Verifies that the Termux:API tools and API keys are in place before a
//! walk session starts failing at runtime.

use crate::defaults;
use std::process::Command;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and responding
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues, or an optional piece is missing
    Warning(String),
}

/// Check if a command exists and is executable.
fn check_tool(command: &str) -> CheckResult {
    // Termux:API tools print usage on -h; any response means installed.
    match Command::new(command).arg("-h").output() {
        Ok(_) => CheckResult::Ok,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Check that an API key environment variable is set and non-empty.
fn check_api_key(var: &str) -> CheckResult {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => CheckResult::Ok,
        _ => CheckResult::Warning(format!("{} is not set; the endpoint will be unusable", var)),
    }
}

/// Run all dependency checks and print a report.
///
/// Returns true when every required tool was found. API keys only warn;
/// `check` should work offline on a fresh install.
pub fn check_dependencies() -> bool {
    let tools = [
        ("termux-camera-photo", "camera capture"),
        ("termux-tts-speak", "text-to-speech"),
        ("termux-speech-to-text", "speech-to-text (optional)"),
    ];

    let mut all_found = true;
    println!("Checking Termux:API tools:");
    for (tool, purpose) in tools {
        match check_tool(tool) {
            CheckResult::Ok => println!("  ok       {} ({})", tool, purpose),
            CheckResult::NotFound => {
                println!(
                    "  MISSING  {} ({}) — install the Termux:API app and `pkg install termux-api`",
                    tool, purpose
                );
                // speech-to-text is optional; everything else is required
                if tool != "termux-speech-to-text" {
                    all_found = false;
                }
            }
            CheckResult::Warning(message) => println!("  warning  {}: {}", tool, message),
        }
    }

    println!("\nChecking API keys:");
    for var in [defaults::DESCRIBE_KEY_VAR, defaults::INSTRUCT_KEY_VAR] {
        match check_api_key(var) {
            CheckResult::Ok => println!("  ok       {}", var),
            CheckResult::Warning(message) => println!("  warning  {}", message),
            CheckResult::NotFound => {}
        }
    }

    all_found
}
