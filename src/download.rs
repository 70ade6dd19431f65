// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Model downloading utilities.
//!
//! Fetches the default pose model when it is not found locally, so the demo
//! runs out of the box.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{PoseError, Result};

/// Default pose model name.
pub const DEFAULT_MODEL: &str = "human-pose-estimation.onnx";

/// URL for downloading the default pose model.
const DEFAULT_MODEL_URL: &str =
    "https://github.com/ultralytics/assets/releases/download/v0.0.0/human-pose-estimation.onnx";

/// Format bytes as human-readable string (e.g., "10.4MB").
fn format_bytes(bytes: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    if bytes >= GB {
        format!("{:.1}GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1}KB", bytes / KB)
    } else {
        format!("{bytes:.0}B")
    }
}

/// Resolve a model path, downloading the default model if needed.
///
/// A path that already exists is returned as-is. The default model name is
/// fetched from the release assets when missing; any other missing path is
/// an error.
///
/// # Errors
///
/// Returns an error if the path is missing and not downloadable, or if the
/// download fails.
pub fn ensure_model(path: &str) -> Result<PathBuf> {
    let model_path = PathBuf::from(path);
    if model_path.exists() {
        return Ok(model_path);
    }

    if path != DEFAULT_MODEL {
        return Err(PoseError::ModelLoad(format!("Model file not found: {path}")));
    }

    download_file(DEFAULT_MODEL_URL, &model_path)?;
    Ok(model_path)
}

/// Download a file to the given destination.
fn download_file(url: &str, dest: &Path) -> Result<()> {
    println!("Downloading {url} to '{}'...", dest.display());
    let start = Instant::now();

    let mut response = ureq::get(url)
        .call()
        .map_err(|e| PoseError::Download(format!("Failed to fetch {url}: {e}")))?
        .into_body();

    let bytes = response
        .read_to_vec()
        .map_err(|e| PoseError::Download(format!("Failed to read {url}: {e}")))?;

    let mut writer = BufWriter::new(File::create(dest)?);
    writer.write_all(&bytes)?;
    writer.flush()?;

    // Leave no partial file behind on a short read.
    if bytes.is_empty() {
        let _ = fs::remove_file(dest);
        return Err(PoseError::Download(format!("Empty response from {url}")));
    }

    #[allow(clippy::cast_precision_loss)]
    let size = format_bytes(bytes.len() as f64);
    println!(
        "Downloaded {size} in {:.1}s",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512.0), "512B");
        assert_eq!(format_bytes(2048.0), "2.0KB");
        assert_eq!(format_bytes(10.4 * 1024.0 * 1024.0), "10.4MB");
    }

    #[test]
    fn test_ensure_model_missing_non_default() {
        let result = ensure_model("nonexistent-model.onnx");
        assert!(matches!(result, Err(PoseError::ModelLoad(_))));
    }
}
