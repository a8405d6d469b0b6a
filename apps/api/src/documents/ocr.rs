use std::process::Stdio;

use anyhow::{bail, Context};
use tokio::process::Command;

/// OCR through the `tesseract` command-line tool.
#[derive(Clone)]
pub struct TesseractOcr {
    pub executable: String,
    pub language: String,
}

impl TesseractOcr {
    pub fn new(executable: String, language: String) -> Self {
        Self {
            executable,
            language,
        }
    }

    /// Writes the image to a temp file (tesseract sniffs the format from it) and reads stdout.
    pub async fn extract_text(&self, image: &[u8], extension: &str) -> anyhow::Result<String> {
        let temp_dir = tempfile::Builder::new()
            .prefix("jd-ocr-")
            .tempdir()
            .context("failed to create OCR temp dir")?;

        let input_path = temp_dir.path().join(format!("upload.{extension}"));
        tokio::fs::write(&input_path, image)
            .await
            .context("failed to stage image for OCR")?;

        let output = Command::new(&self.executable)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run OCR executable '{}'", self.executable))?;

        if !output.status.success() {
            bail!(
                "OCR exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
