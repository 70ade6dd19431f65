// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame acquisition.
//!
//! The pipeline only sees the [`FrameSource`] trait; the concrete capture
//! device (V4L2 webcam node, video file) lives behind the `video` feature.

use std::path::PathBuf;

use image::RgbImage;

use crate::error::Result;

#[cfg(not(feature = "video"))]
use crate::error::PoseError;

/// Camera capability: one frame per call, `Ok(None)` at end of stream.
pub trait FrameSource {
    /// Read the next frame.
    ///
    /// A zero-sized frame is a transient empty read; callers skip it and
    /// keep polling. `Ok(None)` means the stream has genuinely closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture device fails mid-stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// A parsed capture target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// Webcam device index (opened as the platform's video device node).
    Webcam(u32),
    /// Path to a video file.
    Video(PathBuf),
}

impl CaptureSource {
    /// The filesystem path this source opens.
    #[must_use]
    pub fn device_path(&self) -> PathBuf {
        match self {
            Self::Webcam(idx) => PathBuf::from(format!("/dev/video{idx}")),
            Self::Video(path) => path.clone(),
        }
    }
}

impl From<&str> for CaptureSource {
    fn from(s: &str) -> Self {
        if let Ok(idx) = s.parse::<u32>() {
            return Self::Webcam(idx);
        }
        Self::Video(PathBuf::from(s))
    }
}

/// Video capture backed by `video-rs`.
#[cfg(feature = "video")]
pub struct VideoCapture {
    decoder: video_rs::decode::Decoder,
}

#[cfg(feature = "video")]
impl VideoCapture {
    /// Open a capture source.
    ///
    /// # Errors
    ///
    /// Returns an error if the device node or file cannot be opened.
    pub fn open(source: &CaptureSource) -> Result<Self> {
        use crate::error::PoseError;

        video_rs::init()
            .map_err(|e| PoseError::Source(format!("Failed to initialize video stack: {e}")))?;

        let path = source.device_path();
        let decoder = video_rs::decode::Decoder::new(path.as_path()).map_err(|e| {
            PoseError::Source(format!("Failed to open {}: {e}", path.display()))
        })?;

        Ok(Self { decoder })
    }
}

#[cfg(feature = "video")]
impl FrameSource for VideoCapture {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        match self.decoder.decode() {
            Ok((_ts, frame)) => Ok(Some(decoded_frame_to_image(&frame)?)),
            // The decoder reports end-of-stream as an error; treat any
            // decode failure as stream close rather than retrying.
            Err(_) => Ok(None),
        }
    }
}

/// Convert a decoded `video_rs` frame (HWC ndarray) to an `RgbImage`.
#[cfg(feature = "video")]
fn decoded_frame_to_image(frame: &video_rs::Frame) -> Result<RgbImage> {
    use crate::error::PoseError;

    let shape = frame.shape();
    let height = u32::try_from(shape[0])
        .map_err(|_| PoseError::Image("Frame height exceeds u32::MAX".to_string()))?;
    let width = u32::try_from(shape[1])
        .map_err(|_| PoseError::Image("Frame width exceeds u32::MAX".to_string()))?;

    let mut rgb_data = Vec::with_capacity((height * width * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            rgb_data.push(frame[[y, x, 0]]);
            rgb_data.push(frame[[y, x, 1]]);
            rgb_data.push(frame[[y, x, 2]]);
        }
    }

    RgbImage::from_raw(width, height, rgb_data)
        .ok_or_else(|| PoseError::Image("Failed to create image from frame".to_string()))
}

/// Placeholder capture when the `video` feature is disabled.
#[cfg(not(feature = "video"))]
pub struct VideoCapture;

#[cfg(not(feature = "video"))]
impl VideoCapture {
    /// Always fails: webcam capture requires the `video` feature.
    ///
    /// # Errors
    ///
    /// Always returns [`PoseError::FeatureNotEnabled`].
    pub fn open(_source: &CaptureSource) -> Result<Self> {
        Err(PoseError::FeatureNotEnabled(
            "webcam capture requires the 'video' feature".to_string(),
        ))
    }
}

#[cfg(not(feature = "video"))]
impl FrameSource for VideoCapture {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parsing() {
        assert_eq!(CaptureSource::from("0"), CaptureSource::Webcam(0));
        assert_eq!(CaptureSource::from("2"), CaptureSource::Webcam(2));
        assert_eq!(
            CaptureSource::from("clip.mp4"),
            CaptureSource::Video(PathBuf::from("clip.mp4"))
        );
    }

    #[test]
    fn test_webcam_device_path() {
        assert_eq!(
            CaptureSource::Webcam(1).device_path(),
            PathBuf::from("/dev/video1")
        );
    }
}
