//! Termux-backed device capabilities.
//!
//! Wraps the Termux:API command-line tools:
//! - `termux-camera-photo` for capture
//! - `termux-tts-speak` for speech output
//! - `termux-speech-to-text` for speech input

use crate::device::capability::DeviceCapability;
use crate::device::executor::CommandExecutor;
use crate::error::{Result, VisaidError};
use crate::pipeline::types::{CameraSelector, CapturedImage};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const CAMERA_TOOL: &str = "termux-camera-photo";
const TTS_TOOL: &str = "termux-tts-speak";
const STT_TOOL: &str = "termux-speech-to-text";

/// How long to wait for the camera service to flush the photo to disk.
///
/// `termux-camera-photo` can return before the file is fully written; the
/// original scripts polled for the file with short sleeps.
const PHOTO_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);
const PHOTO_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Device capabilities backed by the Termux:API tools.
pub struct TermuxDevice<E: CommandExecutor> {
    executor: E,
    capture_dir: PathBuf,
    flush_timeout: Duration,
}

impl<E: CommandExecutor> TermuxDevice<E> {
    /// Create a device writing photos into `capture_dir`.
    pub fn new(executor: E, capture_dir: PathBuf) -> Self {
        Self {
            executor,
            capture_dir,
            flush_timeout: PHOTO_FLUSH_TIMEOUT,
        }
    }

    /// Override the photo flush timeout (tests use a short one).
    pub fn with_flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    fn photo_destination(&self) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        self.capture_dir
            .join(format!("visaid_{}{:03}.jpg", now.as_secs(), now.subsec_millis()))
    }

    fn wait_for_photo(&self, path: &Path) -> Result<()> {
        let deadline = Instant::now() + self.flush_timeout;
        while !path.exists() {
            if Instant::now() >= deadline {
                return Err(VisaidError::CaptureFailed {
                    message: format!(
                        "camera reported success but {} never appeared",
                        path.display()
                    ),
                });
            }
            std::thread::sleep(PHOTO_POLL_INTERVAL);
        }
        Ok(())
    }
}

impl<E: CommandExecutor> DeviceCapability for TermuxDevice<E> {
    fn take_photo(&self, camera: CameraSelector) -> Result<CapturedImage> {
        std::fs::create_dir_all(&self.capture_dir)?;
        let dest = self.photo_destination();
        let camera_id = camera.id().to_string();
        let dest_str = dest.to_string_lossy().to_string();

        self.executor
            .execute(CAMERA_TOOL, &["-c", &camera_id, &dest_str])
            .map_err(|e| match e {
                VisaidError::DeviceToolNotFound { tool } => {
                    VisaidError::CaptureToolNotFound { tool }
                }
                VisaidError::DevicePermissionDenied { message } => {
                    VisaidError::CapturePermissionDenied { message }
                }
                other => VisaidError::CaptureFailed {
                    message: other.to_string(),
                },
            })?;

        self.wait_for_photo(&dest)?;
        tracing::debug!(path = %dest.display(), "photo captured");
        Ok(CapturedImage::new(dest, camera))
    }

    fn speak(&self, text: &str) -> Result<()> {
        self.executor
            .execute(TTS_TOOL, &[text])
            .map(|_| ())
            .map_err(|e| VisaidError::SpeakFailed {
                message: e.to_string(),
            })
    }

    fn listen(&self) -> Result<String> {
        let heard = self
            .executor
            .execute(STT_TOOL, &[])
            .map_err(|e| VisaidError::ListenFailed {
                message: e.to_string(),
            })?;
        let heard = heard.trim().to_string();
        if heard.is_empty() {
            return Err(VisaidError::ListenFailed {
                message: "no speech detected".to_string(),
            });
        }
        Ok(heard)
    }
}
