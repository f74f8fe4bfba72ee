//! Testable system command execution.
//!
//! Every device capability on Termux is an external binary
//! (`termux-camera-photo`, `termux-tts-speak`, ...). The `CommandExecutor`
//! trait enables full testability without those tools installed.

use crate::error::{Result, VisaidError};
use std::process::Command;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
/// Enables testability by allowing mock implementations.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    /// Returns an error if the command fails or is not found.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VisaidError::DeviceToolNotFound {
                    tool: command.to_string(),
                }
            } else if e.kind() == std::io::ErrorKind::PermissionDenied {
                VisaidError::DevicePermissionDenied {
                    message: format!(
                        "Permission denied executing {}: {}.\n\
                        Hint: install the Termux:API app and run `pkg install termux-api`,\n\
                        then grant the camera and microphone permissions in Android settings.",
                        command, e
                    ),
                }
            } else {
                VisaidError::DeviceCommandFailed {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VisaidError::DeviceCommandFailed {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command, output.status, stderr
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Mock command executor for tests.
///
/// Records all command executions and returns configured responses, in
/// order. Once configured responses are exhausted it returns empty stdout.
#[derive(Debug, Default)]
pub struct MockCommandExecutor {
    calls: std::sync::Mutex<Vec<(String, Vec<String>)>>,
    responses: std::sync::Mutex<std::collections::VecDeque<Result<String>>>,
}

impl MockCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a successful response to the queue.
    pub fn with_response(self, response: &str) -> Self {
        self.responses
            .lock()
            .expect("mock lock")
            .push_back(Ok(response.to_string()));
        self
    }

    /// Add an error response to the queue.
    pub fn with_error(self, error: VisaidError) -> Self {
        self.responses.lock().expect("mock lock").push_back(Err(error));
        self
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("mock lock").clone()
    }

    /// Get the number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock").len()
    }
}

impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        self.calls.lock().expect("mock lock").push((
            command.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        ));

        self.responses
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_executor_is_object_safe() {
        let executor: Box<dyn CommandExecutor> = Box::new(MockCommandExecutor::new());
        let result = executor.execute("echo", &["test"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_mock_executor_records_calls() {
        let mock = MockCommandExecutor::new();

        mock.execute("termux-camera-photo", &["-c", "0", "/tmp/x.jpg"])
            .unwrap();
        mock.execute("termux-tts-speak", &["hello"]).unwrap();

        assert_eq!(mock.call_count(), 2);

        let calls = mock.calls();
        assert_eq!(calls[0].0, "termux-camera-photo");
        assert_eq!(calls[0].1, vec!["-c", "0", "/tmp/x.jpg"]);
        assert_eq!(calls[1].0, "termux-tts-speak");
        assert_eq!(calls[1].1, vec!["hello"]);
    }

    #[test]
    fn test_mock_executor_returns_configured_responses_in_order() {
        let mock = MockCommandExecutor::new()
            .with_response("output1")
            .with_error(VisaidError::DeviceToolNotFound {
                tool: "termux-tts-speak".to_string(),
            });

        assert_eq!(mock.execute("cmd1", &[]).unwrap(), "output1");
        assert!(matches!(
            mock.execute("cmd2", &[]),
            Err(VisaidError::DeviceToolNotFound { .. })
        ));
        // Exhausted queue falls back to empty stdout
        assert_eq!(mock.execute("cmd3", &[]).unwrap(), "");
    }

    #[test]
    fn test_system_executor_maps_not_found() {
        let executor = SystemCommandExecutor::new();
        let result = executor.execute("definitely-not-a-real-binary-9f2c", &[]);
        assert!(matches!(
            result,
            Err(VisaidError::DeviceToolNotFound { ref tool }) if tool == "definitely-not-a-real-binary-9f2c"
        ));
    }

    #[test]
    fn test_system_executor_nonzero_exit() {
        let executor = SystemCommandExecutor::new();
        let result = executor.execute("false", &[]);
        assert!(matches!(
            result,
            Err(VisaidError::DeviceCommandFailed { .. })
        ));
    }

    #[test]
    fn test_executor_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Box<dyn CommandExecutor>>();
        assert_sync::<Box<dyn CommandExecutor>>();
    }
}
