// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Display windows for the camera feed and the mascot.

#[cfg(feature = "visualize")]
pub mod viewer;

#[cfg(feature = "visualize")]
pub use viewer::Viewer;
