// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Sprite-compositing mascot renderer.
//!
//! The mascot is a stack of static PNG sprites on a fixed-size canvas. The
//! body layers are composited once at construction; each `render` call
//! copies that base and overlays the two limb sprites, rotated to mirror
//! the detected person's arms.

use std::path::Path;

use image::imageops::overlay;
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

use crate::error::{PoseError, Result};
use crate::results::MascotPose;

/// Canvas side length in pixels.
pub const CANVAS_SIZE: u32 = 490;

/// Vertical offset of both limb sprites on the canvas.
const LIMB_Y: i64 = 230;

/// Horizontal offset of the right limb sprite.
const RIGHT_LIMB_X: i64 = 330;

/// Body sprite files, composited bottom-up in this order.
const BODY_SPRITES: [&str; 5] = [
    "torso.png",
    "eyes.png",
    "ears.png",
    "mouth.png",
    "nose.png",
];

/// Left limb sprite file.
const LEFT_SPRITE: &str = "left-arm.png";

/// Right limb sprite file.
const RIGHT_SPRITE: &str = "right-arm.png";

/// The animated mascot.
pub struct Mascot {
    base: RgbaImage,
    left: RgbaImage,
    right: RgbaImage,
    left_angle: f32,
    right_angle: f32,
}

impl Mascot {
    /// Load the sprite set from an asset directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any sprite fails to load; sprite availability is
    /// checked once here so a missing asset is fatal at startup.
    pub fn load<P: AsRef<Path>>(asset_dir: P) -> Result<Self> {
        let dir = asset_dir.as_ref();

        let mut body = Vec::with_capacity(BODY_SPRITES.len());
        for name in BODY_SPRITES {
            body.push(load_sprite(dir, name)?);
        }
        let left = load_sprite(dir, LEFT_SPRITE)?;
        let right = load_sprite(dir, RIGHT_SPRITE)?;

        Ok(Self::from_sprites(&body, left, right))
    }

    /// Build a mascot from in-memory sprites.
    ///
    /// The body layers are composited onto a white canvas in slice order.
    #[must_use]
    pub fn from_sprites(body: &[RgbaImage], left: RgbaImage, right: RgbaImage) -> Self {
        let mut base = RgbaImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, Rgba([255, 255, 255, 255]));
        for layer in body {
            overlay(&mut base, layer, 0, 0);
        }
        Self {
            base,
            left,
            right,
            left_angle: 0.0,
            right_angle: 0.0,
        }
    }

    /// Set the left limb rotation from a pose angle in radians.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_left_angle(&mut self, theta: f64) {
        self.left_angle = -theta as f32;
    }

    /// Set the right limb rotation from a pose angle in radians.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_right_angle(&mut self, theta: f64) {
        self.right_angle = -theta as f32;
    }

    /// Apply a derived pose; limbs without a detected segment keep their
    /// previous orientation.
    pub fn apply(&mut self, pose: &MascotPose) {
        if let Some(theta) = pose.left {
            self.set_left_angle(theta);
        }
        if let Some(theta) = pose.right {
            self.set_right_angle(theta);
        }
    }

    /// Recompose the mascot frame.
    ///
    /// Rotation fills uncovered pixels with transparent, so only the sprite
    /// itself lands on the canvas.
    #[must_use]
    pub fn render(&self) -> RgbaImage {
        let mut canvas = self.base.clone();

        let left = rotate_about_center(
            &self.left,
            self.left_angle,
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        );
        overlay(&mut canvas, &left, 0, LIMB_Y);

        let right = rotate_about_center(
            &self.right,
            self.right_angle,
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        );
        overlay(&mut canvas, &right, RIGHT_LIMB_X, LIMB_Y);

        canvas
    }
}

/// Load one RGBA sprite from the asset directory.
fn load_sprite(dir: &Path, name: &str) -> Result<RgbaImage> {
    let path = dir.join(name);
    let img = image::open(&path)
        .map_err(|e| PoseError::Image(format!("Failed to load sprite {}: {e}", path.display())))?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_sprite(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    fn test_mascot() -> Mascot {
        let body = vec![solid_sprite(100, 100, [0, 128, 0, 255])];
        let left = solid_sprite(40, 12, [200, 0, 0, 255]);
        let right = solid_sprite(40, 12, [0, 0, 200, 255]);
        Mascot::from_sprites(&body, left, right)
    }

    #[test]
    fn test_render_dimensions() {
        let mascot = test_mascot();
        let frame = mascot.render();
        assert_eq!(frame.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));
    }

    #[test]
    fn test_base_composition() {
        let mascot = test_mascot();
        let frame = mascot.render();
        // Body layer covers the top-left corner; outside it the canvas is white.
        assert_eq!(*frame.get_pixel(50, 50), Rgba([0, 128, 0, 255]));
        assert_eq!(*frame.get_pixel(480, 10), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_rotation_changes_output() {
        let mut mascot = test_mascot();
        let before = mascot.render();
        mascot.set_left_angle(std::f64::consts::FRAC_PI_2);
        let after = mascot.render();
        assert_ne!(before.as_raw(), after.as_raw());
    }

    #[test]
    fn test_apply_keeps_angle_for_missing_segment() {
        let mut mascot = test_mascot();
        mascot.set_left_angle(1.0);
        let oriented = mascot.render();

        mascot.apply(&MascotPose {
            left: None,
            right: None,
        });
        assert_eq!(oriented.as_raw(), mascot.render().as_raw());
    }

    #[test]
    fn test_render_is_deterministic() {
        let mascot = test_mascot();
        assert_eq!(mascot.render().as_raw(), mascot.render().as_raw());
    }
}
