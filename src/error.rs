// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the pose detection pipeline.

use std::fmt;

/// Result type alias for pose pipeline operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Main error type for the pose pipeline.
#[derive(Debug)]
pub enum PoseError {
    /// Error loading the ONNX model.
    ModelLoad(String),
    /// Error during model inference.
    Inference(String),
    /// Error processing images.
    Image(String),
    /// Invalid configuration provided.
    Config(String),
    /// Wrapped `std::io::Error`.
    Io(std::io::Error),
    /// The heatmap channel count matches none of the supported topologies.
    UnsupportedPartCount(usize),
    /// The other end of the frame pipeline has shut down.
    PipelineClosed,
    /// Camera/video capture error.
    Source(String),
    /// Display window error.
    Viewer(String),
    /// Model download error.
    Download(String),
    /// Feature not enabled.
    FeatureNotEnabled(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelLoad(msg) => write!(f, "Model load error: {msg}"),
            Self::Inference(msg) => write!(f, "Inference error: {msg}"),
            Self::Image(msg) => write!(f, "Image error: {msg}"),
            Self::Config(msg) => write!(f, "Config error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::UnsupportedPartCount(n) => write!(
                f,
                "unsupported heatmap layout: {n} channels (expected 19 for COCO, 16 for MPI, or 22 for hand)"
            ),
            Self::PipelineClosed => write!(f, "frame pipeline closed"),
            Self::Source(msg) => write!(f, "Capture error: {msg}"),
            Self::Viewer(msg) => write!(f, "Viewer error: {msg}"),
            Self::Download(msg) => write!(f, "Download error: {msg}"),
            Self::FeatureNotEnabled(msg) => write!(f, "Feature not enabled: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for PoseError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoseError::ModelLoad("test".to_string());
        assert_eq!(err.to_string(), "Model load error: test");

        let err = PoseError::PipelineClosed;
        assert_eq!(err.to_string(), "frame pipeline closed");
    }

    #[test]
    fn test_unsupported_part_count_display() {
        let err = PoseError::UnsupportedPartCount(7);
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains("COCO"));
    }
}
