//! Image preprocessing: validate, resize, encode for transport.
//!
//! The vision endpoint wants a small JPEG inlined in the JSON body, so a
//! captured photo is resized with cover semantics (scale up to fill, then
//! center-crop to the exact target) and re-expressed as base64.

use crate::error::{Result, VisaidError};
use crate::pipeline::types::{CapturedImage, EncodedImage};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::PathBuf;

/// Prepares captured photos for the description endpoint.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    jpeg_quality: u8,
    scratch_dir: Option<PathBuf>,
}

impl ImagePreprocessor {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality,
            scratch_dir: None,
        }
    }

    /// Also persist each resized image under `dir` (e.g. for a web UI to
    /// display). The write happens on a background thread and never blocks
    /// or fails the pipeline.
    pub fn with_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.scratch_dir = Some(dir);
        self
    }

    /// Validate, resize to exactly `target` (cover + center crop), and
    /// encode for transport.
    pub fn prepare(&self, captured: &CapturedImage, target: (u32, u32)) -> Result<EncodedImage> {
        if !captured.path.exists() {
            return Err(VisaidError::ImageNotFound {
                path: captured.path.display().to_string(),
            });
        }

        let reader = ImageReader::open(&captured.path)?.with_guessed_format()?;
        let source_format = match reader.format() {
            Some(format) => format!("{format:?}").to_lowercase(),
            None => {
                return Err(VisaidError::UnsupportedImageFormat {
                    path: captured.path.display().to_string(),
                    message: "could not detect an image format".to_string(),
                });
            }
        };

        let image = reader
            .decode()
            .map_err(|e| VisaidError::UnsupportedImageFormat {
                path: captured.path.display().to_string(),
                message: e.to_string(),
            })?;

        // Cover + center crop: preserves aspect without letterboxing.
        let (width, height) = target;
        let resized = image.resize_to_fill(width, height, FilterType::Triangle);

        let jpeg = self.encode_jpeg(&resized)?;
        self.persist_scratch(captured, &jpeg);

        Ok(EncodedImage {
            base64: BASE64.encode(&jpeg),
            width,
            height,
            source_format,
            byte_len: jpeg.len(),
        })
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut jpeg = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), self.jpeg_quality);
        image
            .write_with_encoder(encoder)
            .map_err(|e| VisaidError::PreprocessFailed {
                message: format!("JPEG encoding failed: {e}"),
            })?;
        Ok(jpeg)
    }

    /// Best-effort scratch write, off the calling thread.
    fn persist_scratch(&self, captured: &CapturedImage, jpeg: &[u8]) {
        let Some(dir) = &self.scratch_dir else {
            return;
        };
        // Always .jpg: the scratch copy holds the re-encoded JPEG bytes.
        let filename = captured
            .path
            .file_stem()
            .map(|stem| format!("resized_{}.jpg", stem.to_string_lossy()))
            .unwrap_or_else(|| "resized_visaid.jpg".to_string());
        let dest = dir.join(filename);
        let dir = dir.clone();
        let bytes = jpeg.to_vec();
        std::thread::spawn(move || {
            let write = std::fs::create_dir_all(&dir).and_then(|_| std::fs::write(&dest, bytes));
            if let Err(e) = write {
                tracing::warn!(path = %dest.display(), error = %e, "scratch persist failed");
            }
        });
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(crate::defaults::JPEG_QUALITY)
    }
}
