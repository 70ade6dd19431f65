// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Hardware device selection for inference.

use std::fmt;
use std::str::FromStr;

/// Hardware device for inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    /// CPU (Central Processing Unit).
    Cpu,
    /// CUDA (Compute Unified Device Architecture) for NVIDIA GPUs.
    /// The argument specifies the device index (e.g., 0 for the first GPU).
    Cuda(usize),
    /// `CoreML` (Apple Core Machine Learning).
    CoreMl,
    /// `OpenVINO` (Open Visual Inference and Neural Network Optimization) for Intel hardware.
    OpenVino,
    /// `TensorRT` (NVIDIA `TensorRT`) for high-performance deep learning inference.
    /// The argument specifies the device index.
    TensorRt(usize),
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(i) => write!(f, "cuda:{i}"),
            Self::CoreMl => write!(f, "coreml"),
            Self::OpenVino => write!(f, "openvino"),
            Self::TensorRt(i) => write!(f, "tensorrt:{i}"),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        match s.as_str() {
            "cpu" => Ok(Self::Cpu),
            "coreml" => Ok(Self::CoreMl),
            "openvino" => Ok(Self::OpenVino),
            _ => {
                if let Some(rest) = s.strip_prefix("cuda") {
                    Ok(Self::Cuda(parse_device_index(rest).unwrap_or(0)))
                } else if let Some(rest) = s.strip_prefix("tensorrt") {
                    Ok(Self::TensorRt(parse_device_index(rest).unwrap_or(0)))
                } else {
                    Err(format!("Unknown device: {s}"))
                }
            }
        }
    }
}

/// Helper to parse device index from string (e.g. ":0")
fn parse_device_index(s: &str) -> Option<usize> {
    if s.is_empty() {
        return None;
    }
    s.strip_prefix(':')
        .and_then(|index_str| index_str.parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device() {
        assert_eq!(Device::from_str("cpu").unwrap(), Device::Cpu);
        assert_eq!(Device::from_str("cuda").unwrap(), Device::Cuda(0));
        assert_eq!(Device::from_str("cuda:1").unwrap(), Device::Cuda(1));
        assert_eq!(Device::from_str("coreml").unwrap(), Device::CoreMl);
        assert_eq!(Device::from_str("openvino").unwrap(), Device::OpenVino);
        assert_eq!(Device::from_str("tensorrt:2").unwrap(), Device::TensorRt(2));
        assert!(Device::from_str("npu").is_err());
    }

    #[test]
    fn test_device_display() {
        assert_eq!(Device::Cpu.to_string(), "cpu");
        assert_eq!(Device::Cuda(1).to_string(), "cuda:1");
    }
}
