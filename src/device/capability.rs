//! Device capability abstraction.
//!
//! The pipeline never talks to hardware directly; it goes through this
//! trait so the camera and speaker can be swapped for mocks in tests.

use crate::error::{Result, VisaidError};
use crate::pipeline::types::{CameraSelector, CapturedImage};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Opaque interface to host device actions.
///
/// Methods block on the underlying platform command; callers on async tasks
/// accept the short stall the same way the capture loop does.
pub trait DeviceCapability: Send + Sync {
    /// Take a photo with the given camera and return its location on disk.
    fn take_photo(&self, camera: CameraSelector) -> Result<CapturedImage>;

    /// Speak text aloud via the platform text-to-speech engine.
    fn speak(&self, text: &str) -> Result<()>;

    /// Transcribe one utterance via the platform speech-to-text engine.
    ///
    /// Optional capability; devices without a microphone path return
    /// [`VisaidError::ListenFailed`].
    fn listen(&self) -> Result<String> {
        Err(VisaidError::ListenFailed {
            message: "speech-to-text not supported by this device".to_string(),
        })
    }
}

/// Mock device for tests.
///
/// Records every call and can be scripted to fail per capability.
#[derive(Debug, Default)]
pub struct MockDevice {
    photo_path: Mutex<PathBuf>,
    fail_capture: bool,
    fail_speak: bool,
    photo_calls: AtomicU32,
    spoken: Mutex<Vec<String>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            photo_path: Mutex::new(PathBuf::from("/tmp/visaid-mock.jpg")),
            ..Self::default()
        }
    }

    /// Path returned from `take_photo` (point it at a test fixture).
    pub fn with_photo_path(self, path: PathBuf) -> Self {
        *self.photo_path.lock().expect("mock lock") = path;
        self
    }

    /// Make `take_photo` fail with a capture error.
    pub fn with_capture_failure(mut self) -> Self {
        self.fail_capture = true;
        self
    }

    /// Make `speak` fail with a speech error.
    pub fn with_speak_failure(mut self) -> Self {
        self.fail_speak = true;
        self
    }

    /// Number of photos requested so far.
    pub fn photo_count(&self) -> u32 {
        self.photo_calls.load(Ordering::SeqCst)
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().expect("mock lock").clone()
    }
}

impl DeviceCapability for MockDevice {
    fn take_photo(&self, camera: CameraSelector) -> Result<CapturedImage> {
        self.photo_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_capture {
            return Err(VisaidError::CaptureFailed {
                message: "mock capture failure".to_string(),
            });
        }
        let path = self.photo_path.lock().expect("mock lock").clone();
        Ok(CapturedImage::new(path, camera))
    }

    fn speak(&self, text: &str) -> Result<()> {
        if self.fail_speak {
            return Err(VisaidError::SpeakFailed {
                message: "mock speech failure".to_string(),
            });
        }
        self.spoken.lock().expect("mock lock").push(text.to_string());
        Ok(())
    }

    fn listen(&self) -> Result<String> {
        Ok("mock utterance".to_string())
    }
}
