// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Window display built on minifb.

use image::{RgbImage, RgbaImage};
use minifb::{Key, Window, WindowOptions};

use crate::error::{PoseError, Result};

/// A display window for one pixel stream.
///
/// Each update repacks the image into minifb's 0x00RRGGBB buffer; the
/// window resizes itself to the incoming image dimensions.
pub struct Viewer {
    window: Window,
    width: usize,
    height: usize,
    buffer: Vec<u32>,
}

impl Viewer {
    /// Create a new viewer window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| PoseError::Viewer(format!("Failed to create window: {e}")))?;

        // ~60 fps cap
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));

        Ok(Self {
            window,
            width,
            height,
            buffer: Vec::new(),
        })
    }

    /// Whether the user has asked to close this window.
    #[must_use]
    pub fn close_requested(&self) -> bool {
        !self.window.is_open()
            || self.window.is_key_down(Key::Escape)
            || self.window.is_key_down(Key::Q)
    }

    /// Display an RGB frame.
    ///
    /// Returns `Ok(false)` when the window was closed or an exit key is
    /// held; the caller should stop its loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the window buffer update fails.
    pub fn update_rgb(&mut self, image: &RgbImage) -> Result<bool> {
        if self.close_requested() {
            return Ok(false);
        }

        let (w, h) = image.dimensions();
        self.repack(w as usize, h as usize, image.pixels().map(|p| (p[0], p[1], p[2])));
        self.present()
    }

    /// Display an RGBA frame (alpha is ignored; the mascot canvas is
    /// already composited).
    ///
    /// # Errors
    ///
    /// Returns an error if the window buffer update fails.
    pub fn update_rgba(&mut self, image: &RgbaImage) -> Result<bool> {
        if self.close_requested() {
            return Ok(false);
        }

        let (w, h) = image.dimensions();
        self.repack(w as usize, h as usize, image.pixels().map(|p| (p[0], p[1], p[2])));
        self.present()
    }

    /// Pack pixels as 0x00RRGGBB into the window buffer.
    fn repack<I: Iterator<Item = (u8, u8, u8)>>(&mut self, width: usize, height: usize, pixels: I) {
        let num_pixels = width * height;
        if self.buffer.len() != num_pixels {
            self.buffer.resize(num_pixels, 0);
        }
        self.width = width;
        self.height = height;

        for (slot, (r, g, b)) in self.buffer.iter_mut().zip(pixels) {
            *slot = (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
        }
    }

    /// Push the packed buffer to the window.
    fn present(&mut self) -> Result<bool> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| PoseError::Viewer(format!("Failed to update window: {e}")))?;
        Ok(true)
    }
}
