// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame preprocessing for pose inference.
//!
//! The OpenPose-style models take a fixed-size NCHW blob with raw channel
//! intensities: the frame is stretch-resized to the network input size with
//! no aspect preservation, no mean subtraction, and no channel swap.

use fast_image_resize::{PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::RgbImage;
use ndarray::Array4;

use crate::error::{PoseError, Result};

/// Build the network input blob from a frame.
///
/// # Arguments
///
/// * `frame` - Source frame.
/// * `input_size` - Target blob size as (height, width).
///
/// # Returns
///
/// Array4 with shape (1, 3, H, W) and raw intensity values in 0.0..=255.0.
///
/// # Errors
///
/// Returns an error if the frame is empty or the resize fails.
pub fn make_blob(frame: &RgbImage, input_size: (usize, usize)) -> Result<Array4<f32>> {
    let (target_h, target_w) = input_size;
    if frame.width() == 0 || frame.height() == 0 {
        return Err(PoseError::Image("empty frame".to_string()));
    }
    if target_h == 0 || target_w == 0 {
        return Err(PoseError::Config(format!(
            "invalid blob size {target_w}x{target_h}"
        )));
    }

    #[allow(clippy::cast_possible_truncation)]
    let resized = resize_frame(frame, target_w as u32, target_h as u32)?;

    let mut blob = Array4::zeros((1, 3, target_h, target_w));
    let plane = target_h * target_w;
    let (r_plane, rest) = blob.as_slice_mut().unwrap().split_at_mut(plane);
    let (g_plane, b_plane) = rest.split_at_mut(plane);

    for (i, chunk) in resized.chunks_exact(3).enumerate() {
        r_plane[i] = f32::from(chunk[0]);
        g_plane[i] = f32::from(chunk[1]);
        b_plane[i] = f32::from(chunk[2]);
    }

    Ok(blob)
}

/// Stretch-resize a frame to the target size, returning packed RGB bytes.
fn resize_frame(frame: &RgbImage, target_w: u32, target_h: u32) -> Result<Vec<u8>> {
    let (src_w, src_h) = frame.dimensions();
    if (src_w, src_h) == (target_w, target_h) {
        return Ok(frame.as_raw().clone());
    }

    let src_image = Image::from_vec_u8(src_w, src_h, frame.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| PoseError::Image(format!("Failed to wrap frame for resize: {e}")))?;

    let mut dst_image = Image::new(target_w, target_h, PixelType::U8x3);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| PoseError::Image(format!("Failed to resize frame: {e}")))?;

    Ok(dst_image.into_vec())
}
