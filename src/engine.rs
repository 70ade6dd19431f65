// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Model loading and inference.
//!
//! This module provides the [`InferenceEngine`] trait over the external
//! network, the ONNX Runtime implementation [`OnnxEngine`], and the
//! [`PoseExtractor`] that turns one frame into one [`PoseResult`].

use std::path::Path;

use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;

#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;
#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
#[cfg(feature = "openvino")]
use ort::execution_providers::OpenVINOExecutionProvider;
#[cfg(feature = "tensorrt")]
use ort::execution_providers::TensorRTExecutionProvider;

use crate::config::ExtractorConfig;
use crate::device::Device;
use crate::error::{PoseError, Result};
use crate::postprocessing::decode_heatmaps;
use crate::preprocessing::make_blob;
use crate::results::PoseResult;

/// Heatmap output the OpenPose checkpoints name their final stage tensor.
const OPENPOSE_HEATMAP_OUTPUT: &str = "Mconv7_stage2_L2";

/// Input tensor name the OpenPose checkpoints use.
const OPENPOSE_INPUT: &str = "data";

/// A set of per-part confidence heatmaps produced by one inference call.
///
/// Wraps a (batch, parts, height, width) tensor. Consumed read-only: the
/// extraction pass only ever locates per-channel maxima.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapSet {
    data: Array4<f32>,
}

impl HeatmapSet {
    /// Wrap a raw NCHW tensor.
    #[must_use]
    pub fn new(data: Array4<f32>) -> Self {
        Self { data }
    }

    /// Number of heatmap channels (the part-index dimension).
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.data.shape()[1]
    }

    /// Heatmap height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.data.shape()[2] as u32
        }
    }

    /// Heatmap width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.data.shape()[3] as u32
        }
    }

    /// Locate the maximum of one part's heatmap.
    ///
    /// Returns the peak confidence and its (x, y) pixel location. Ties keep
    /// the first maximum in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `part` is out of range; callers index within
    /// `0..part_count()`.
    #[must_use]
    pub fn peak(&self, part: usize) -> (f32, (u32, u32)) {
        let plane = self.data.index_axis(ndarray::Axis(0), 0);
        let plane = plane.index_axis(ndarray::Axis(0), part);

        let mut best = f32::MIN;
        let mut best_xy = (0u32, 0u32);
        for ((y, x), &v) in plane.indexed_iter() {
            if v > best {
                best = v;
                #[allow(clippy::cast_possible_truncation)]
                {
                    best_xy = (x as u32, y as u32);
                }
            }
        }
        (best, best_xy)
    }
}

/// External inference capability: blob in, heatmaps out.
///
/// The production implementation is [`OnnxEngine`]; tests substitute a
/// deterministic stub.
pub trait InferenceEngine {
    /// Run a forward pass on a preprocessed blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the inference call fails or its output is not a
    /// 4D tensor.
    fn infer(&mut self, blob: &Array4<f32>) -> Result<HeatmapSet>;
}

/// ONNX Runtime session wrapper for the pose network.
///
/// Configured once at startup with the model file and execution device;
/// afterwards only the extraction worker touches it, sequentially.
pub struct OnnxEngine {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxEngine {
    /// Load the pose network from an ONNX file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ONNX model file.
    /// * `config` - Extraction configuration (threading).
    /// * `device` - Execution device; accelerator devices require the
    ///   matching Cargo feature.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file doesn't exist, the session can't
    /// be built, or the requested device support isn't compiled in.
    pub fn load<P: AsRef<Path>>(
        path: P,
        config: &ExtractorConfig,
        device: &Device,
    ) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PoseError::ModelLoad(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let mut builder = Session::builder().map_err(|e| {
            PoseError::ModelLoad(format!("Failed to create session builder: {e}"))
        })?;

        builder = Self::apply_device(builder, device)?;

        let session = builder
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| PoseError::ModelLoad(format!("Failed to set optimization level: {e}")))?
            .with_intra_threads(config.num_threads)
            .map_err(|e| PoseError::ModelLoad(format!("Failed to set intra-thread count: {e}")))?
            .commit_from_file(path)
            .map_err(|e| PoseError::ModelLoad(format!("Failed to load model: {e}")))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| OPENPOSE_INPUT.to_string());

        // The OpenPose graphs expose two output stages (part affinity fields
        // and heatmaps); pick the heatmap stage by name when present.
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == OPENPOSE_HEATMAP_OUTPUT)
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| PoseError::ModelLoad("Model has no outputs".to_string()))?;

        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }

    /// Register the execution provider for the selected device.
    fn apply_device(
        builder: ort::session::builder::SessionBuilder,
        device: &Device,
    ) -> Result<ort::session::builder::SessionBuilder> {
        match device {
            Device::Cpu => Ok(builder),
            #[cfg(feature = "cuda")]
            Device::Cuda(idx) => builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*idx as i32)
                    .build()])
                .map_err(|e| PoseError::ModelLoad(format!("Failed to register CUDA EP: {e}"))),
            #[cfg(feature = "tensorrt")]
            Device::TensorRt(idx) => builder
                .with_execution_providers([TensorRTExecutionProvider::default()
                    .with_device_id(*idx as i32)
                    .build()])
                .map_err(|e| PoseError::ModelLoad(format!("Failed to register TensorRT EP: {e}"))),
            #[cfg(feature = "coreml")]
            Device::CoreMl => builder
                .with_execution_providers([CoreMLExecutionProvider::default().build()])
                .map_err(|e| PoseError::ModelLoad(format!("Failed to register CoreML EP: {e}"))),
            #[cfg(feature = "openvino")]
            Device::OpenVino => builder
                .with_execution_providers([OpenVINOExecutionProvider::default().build()])
                .map_err(|e| PoseError::ModelLoad(format!("Failed to register OpenVINO EP: {e}"))),
            #[allow(unreachable_patterns)]
            other => Err(PoseError::FeatureNotEnabled(format!(
                "device '{other}' requires the matching Cargo feature"
            ))),
        }
    }
}

impl InferenceEngine for OnnxEngine {
    fn infer(&mut self, blob: &Array4<f32>) -> Result<HeatmapSet> {
        let blob_contiguous = blob.as_standard_layout();

        let input_tensor = TensorRef::from_array_view(&blob_contiguous)
            .map_err(|e| PoseError::Inference(format!("Failed to create input tensor: {e}")))?;

        let inputs = ort::inputs![&self.input_name => input_tensor];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| PoseError::Inference(format!("Inference failed: {e}")))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| {
                PoseError::Inference(format!("Output '{}' not found", self.output_name))
            })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| PoseError::Inference(format!("Failed to extract output: {e}")))?;

        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        if dims.len() != 4 {
            return Err(PoseError::Inference(format!(
                "Expected 4D heatmap output, got {} dims",
                dims.len()
            )));
        }

        let maps = Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec())
            .map_err(|e| PoseError::Inference(format!("Bad output layout: {e}")))?;

        Ok(HeatmapSet::new(maps))
    }
}

/// Pose extractor: one frame in, one decoded pose out.
///
/// Owns the inference engine for its lifetime; the frame pipeline moves the
/// whole extractor into the worker thread.
pub struct PoseExtractor<E> {
    engine: E,
    config: ExtractorConfig,
}

impl<E: InferenceEngine> PoseExtractor<E> {
    /// Create a new extractor around an engine.
    #[must_use]
    pub fn new(engine: E, config: ExtractorConfig) -> Self {
        Self { engine, config }
    }

    /// Extract the pose from one frame.
    ///
    /// Preprocesses the frame into the fixed-size blob, runs the engine,
    /// and decodes the heatmaps into scaled limb segments. All intermediate
    /// buffers are dropped before returning.
    ///
    /// # Errors
    ///
    /// Propagates preprocessing and inference failures, and returns
    /// [`PoseError::UnsupportedPartCount`] when the model output matches no
    /// known topology.
    pub fn extract(&mut self, frame: &RgbImage) -> Result<PoseResult> {
        let blob = make_blob(frame, self.config.input_size)?;
        let maps = self.engine.infer(&blob)?;
        decode_heatmaps(
            &maps,
            frame.width(),
            frame.height(),
            self.config.confidence_threshold,
        )
    }

    /// The extraction configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found() {
        let config = ExtractorConfig::default();
        let result = OnnxEngine::load("nonexistent.onnx", &config, &Device::Cpu);
        assert!(matches!(result, Err(PoseError::ModelLoad(_))));
    }

    #[test]
    fn test_heatmap_peak() {
        let mut data = Array4::<f32>::zeros((1, 2, 4, 4));
        data[[0, 0, 1, 2]] = 0.7;
        data[[0, 1, 3, 0]] = 0.4;
        let maps = HeatmapSet::new(data);

        assert_eq!(maps.part_count(), 2);
        assert_eq!(maps.height(), 4);
        assert_eq!(maps.width(), 4);
        assert_eq!(maps.peak(0), (0.7, (2, 1)));
        assert_eq!(maps.peak(1), (0.4, (0, 3)));
    }

    #[test]
    fn test_heatmap_peak_tie_keeps_first() {
        let mut data = Array4::<f32>::zeros((1, 1, 4, 4));
        data[[0, 0, 0, 1]] = 0.5;
        data[[0, 0, 2, 2]] = 0.5;
        let maps = HeatmapSet::new(data);

        assert_eq!(maps.peak(0), (0.5, (1, 0)));
    }
}
