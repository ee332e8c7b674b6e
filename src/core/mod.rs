//! Core data structures for Gantry.
//!
//! This module contains the foundational types used throughout Gantry:
//! - Recipes (`Gantry.toml`) and their requirements
//! - Settings, options and environment signals
//! - Version resolution and the resolved package descriptor
//! - The packaged artifact layout

pub mod dependency;
pub mod descriptor;
pub mod errors;
pub mod layout;
pub mod manifest;
pub mod options;
pub mod settings;
pub mod signals;
pub mod version;

pub use dependency::{DependencySpec, Requirement};
pub use descriptor::PackageDescriptor;
pub use errors::RecipeError;
pub use layout::ArtifactLayout;
pub use manifest::{Recipe, MANIFEST_NAME};
pub use options::{BuildOptionSet, OptionOverride, OptionValues};
pub use settings::{BuildType, Os, Settings};
pub use signals::EnvSignals;
pub use version::{ResolvedVersion, VersionPolicy, VersionResolver};
