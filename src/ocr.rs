//! OCR adapter: decodes the uploaded image and pipes it through the
//! Tesseract CLI.

use std::{io::Cursor, process::Stdio, time::Duration};

use async_trait::async_trait;
use image::ImageFormat;
use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, warn};

use crate::config::OcrConfig;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("cannot run OCR engine: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR engine exited with {status}: {stderr}")]
    Engine { status: String, stderr: String },
    #[error("OCR engine timed out after {0}s")]
    Timeout(u64),
    #[error("image task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Extracts raw (untrimmed) text from an encoded image.
    async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError>;
}

pub struct TesseractOcr {
    command: String,
    lang: String,
    timeout_secs: u64,
}

impl TesseractOcr {
    pub fn new(cfg: &OcrConfig) -> Self {
        Self {
            command: cfg.command.clone(),
            lang: cfg.lang.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }
}

/// Decodes any format the `image` crate understands and re-encodes it as PNG,
/// which Tesseract always reads.
pub fn normalize_image(bytes: &[u8]) -> Result<Vec<u8>, OcrError> {
    let img = image::load_from_memory(bytes)?;
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Runs [`normalize_image`] on the blocking pool; decoding a large scan is
/// CPU-bound.
pub async fn normalize_image_off_thread(bytes: Vec<u8>) -> Result<Vec<u8>, OcrError> {
    tokio::task::spawn_blocking(move || normalize_image(&bytes)).await?
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError> {
        let png = normalize_image_off_thread(image.to_vec()).await?;
        debug!(bytes = png.len(), lang = %self.lang, "running tesseract");

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", &self.lang])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&png).await {
                    warn!(error = %e, "writing image to tesseract failed");
                }
                // dropping stdin closes the pipe
            });
        }

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| OcrError::Timeout(self.timeout_secs))??;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
