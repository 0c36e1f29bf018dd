// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for running the feature pipeline.
//!
//! This module contains the command-line interface logic, including argument
//! parsing and the `extract`, `weights` and `compare` commands.

// Modules
/// CLI arguments.
pub mod args;

/// Frame comparison and weight printing.
pub mod compare;

/// Feature extraction.
pub mod extract;

/// Console logging.
pub mod logging;
