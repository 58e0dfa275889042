//! CLI-specific functionality
//!
//! Argument parsing for the `bastion-sessions` binary. Configuration loading
//! lives in [`crate::config`] so it can be shared with embedders.

pub mod args;

pub use args::{Args, Commands};
