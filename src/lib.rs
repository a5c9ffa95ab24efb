//! Tooling for the YAML option files that drive ESRGAN-family and SPAN
//! super-resolution training runs: a typed data model, structural
//! validation, and generation of ready-to-edit templates.
//!
//! The training engine the documents configure is external; every `type`
//! tag is carried as a reference to one of its registered components and is
//! only checked against [`registry`]'s known names.

#[macro_use]
extern crate serde_derive;

pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod loader;
pub mod logging;
pub mod options;
pub mod registry;
pub mod validate;

pub use error::{OptError, Result};
pub use loader::{normalize_str, parse_value_tree, template_yaml, Preset};
pub use options::TrainOptions;
pub use validate::{check_options, validate_options, Report, Severity};
