//! Shared test utilities for the dem-contours workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic elevation grid generators
//! - An independent RGB elevation encoder for building pixel buffers
//! - Golden values for the projection regression tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{create_cone_grid, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use generators::*;
