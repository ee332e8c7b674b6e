//! Gantry - build, package and publish CMake-based C/C++ libraries
//!
//! This crate provides the library side of Gantry: recipe evaluation
//! (version resolution and option normalization), the CMake build driver,
//! the packager and the consumer-info publisher.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for Gantry unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a recording command runner and recipe/build-tree fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{EnvSignals, PackageDescriptor, Recipe, Settings};
pub use util::context::GlobalContext;
