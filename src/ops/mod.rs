//! High-level operations.
//!
//! This module contains the implementation of Gantry commands.

pub mod consumer_info;
pub mod evaluate;
pub mod gantry_build;
pub mod package;

pub use consumer_info::{publish, ConsumerInfo};
pub use evaluate::{evaluate, Evaluation};
pub use gantry_build::{build, prepare, BuildOptions, BuildResult, PreparedBuild};
pub use package::{CopyPolicy, CopyRule, PackageError, Packager};
