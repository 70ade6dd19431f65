// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Command-line interface.

pub mod args;
pub mod logging;
pub mod run;
