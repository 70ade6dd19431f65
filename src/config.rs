// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Extraction configuration.
//!
//! This module defines the [`ExtractorConfig`] struct, which controls the
//! parameters of the pose extraction pass: the heatmap confidence threshold,
//! the fixed network input size, and ONNX Runtime threading.

/// Configuration for pose extraction.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use pose_mirror::ExtractorConfig;
///
/// let config = ExtractorConfig::new()
///     .with_confidence(0.2)
///     .with_input_size(256, 256);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Confidence threshold for accepting a heatmap peak as a body part (0.0 to 1.0).
    /// Peaks at or below this value are reported as unknown.
    pub confidence_threshold: f32,
    /// Network input size as (height, width). The frame is stretch-resized to
    /// this size before inference; the OpenPose models expect 256x256.
    pub input_size: (usize, usize),
    /// Number of intra-op threads for ONNX Runtime.
    /// Setting this to `0` lets ONNX Runtime choose.
    pub num_threads: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.1,
            input_size: (256, 256),
            num_threads: 0,
        }
    }
}

impl ExtractorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heatmap confidence threshold.
    ///
    /// A part point is accepted only when its heatmap maximum exceeds this value.
    #[must_use]
    pub const fn with_confidence(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the network input size.
    ///
    /// # Arguments
    ///
    /// * `height` - Target blob height.
    /// * `width` - Target blob width.
    #[must_use]
    pub const fn with_input_size(mut self, height: usize, width: usize) -> Self {
        self.input_size = (height, width);
        self
    }

    /// Set the number of intra-op threads for inference.
    ///
    /// Set to `0` for auto-configuration.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ExtractorConfig::default();
        assert!((config.confidence_threshold - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.input_size, (256, 256));
        assert_eq!(config.num_threads, 0);
    }

    #[test]
    fn test_config_builder() {
        let config = ExtractorConfig::new()
            .with_confidence(0.25)
            .with_input_size(368, 368)
            .with_threads(4);

        assert!((config.confidence_threshold - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.input_size, (368, 368));
        assert_eq!(config.num_threads, 4);
    }
}
