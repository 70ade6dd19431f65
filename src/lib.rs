// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # pose-mirror
//!
//! Real-time human pose estimation from a webcam, mirrored onto an animated
//! sprite mascot.
//!
//! The detection path is a two-thread pipeline: the acquisition/display
//! loop reads camera frames and hands at most one at a time to an
//! extraction worker over a bounded conduit; the worker runs an
//! OpenPose-style network through ONNX Runtime, reduces the per-part
//! confidence heatmaps to peak locations, connects them into limb segments
//! via a fixed anatomical pair table, and publishes the result back over an
//! unbounded conduit. The display loop polls that conduit without blocking,
//! so the on-screen frame rate is never gated by inference latency.
//!
//! A second window shows the mascot: a stack of static sprites whose two
//! limb layers rotate to follow the detected person's arms.
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use pose_mirror::{Device, ExtractorConfig, OnnxEngine, PoseExtractor};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractorConfig::new().with_confidence(0.1);
//!     let engine = OnnxEngine::load("human-pose-estimation.onnx", &config, &Device::Cpu)?;
//!     let mut extractor = PoseExtractor::new(engine, config);
//!
//!     let frame = image::open("person.jpg")?.to_rgb8();
//!     let pose = extractor.extract(&frame)?;
//!     println!("{} of {} limb segments detected", pose.present().count(), pose.len());
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Webcam 0, default model (auto-downloaded), mascot window on
//! pose-mirror run
//!
//! # A video file instead of a webcam, higher confidence bar
//! pose-mirror run --source clip.mp4 --conf 0.2
//!
//! # Detection only
//! pose-mirror run --no-mascot
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`engine`] | [`InferenceEngine`] trait, [`OnnxEngine`], [`PoseExtractor`] |
//! | [`pipeline`] | [`FramePipeline`] / [`PipelineWorker`] frame handoff |
//! | [`topology`] | Pose-pair tables and the [`Topology`] selector |
//! | [`preprocessing`] | Frame to NCHW blob conversion |
//! | [`postprocessing`] | Heatmap peaks, scaling, segment assembly |
//! | [`results`] | [`PoseResult`], [`Segment`], [`MascotPose`] |
//! | [`mascot`] | Sprite compositing and limb rotation |
//! | [`source`] | [`FrameSource`] trait and video capture |
//! | [`error`] | Error types ([`PoseError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `annotate` | Pose overlay drawing and mascot compositing (default) |
//! | `visualize` | Real-time window display (default) |
//! | `video` | Webcam and video file capture |
//! | `cuda` | NVIDIA CUDA acceleration |
//! | `tensorrt` | NVIDIA `TensorRT` optimization |
//! | `coreml` | Apple `CoreML` (macOS/iOS) |
//! | `openvino` | Intel `OpenVINO` |

// Modules
#[cfg(feature = "annotate")]
pub mod annotate;
pub mod cli;
pub mod config;
pub mod device;
pub mod download;
pub mod engine;
pub mod error;
#[cfg(feature = "annotate")]
pub mod mascot;
pub mod pipeline;
pub mod postprocessing;
pub mod preprocessing;
pub mod results;
pub mod source;
pub mod topology;
pub mod visualizer;

// Re-export main types for convenience
pub use config::ExtractorConfig;
pub use device::Device;
pub use engine::{HeatmapSet, InferenceEngine, OnnxEngine, PoseExtractor};
pub use error::{PoseError, Result};
#[cfg(feature = "annotate")]
pub use mascot::Mascot;
pub use pipeline::{FramePipeline, PipelineWorker};
pub use results::{MascotPose, PartPoint, PoseResult, Segment};
pub use source::{CaptureSource, FrameSource};
pub use topology::Topology;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pose-mirror");
    }
}
