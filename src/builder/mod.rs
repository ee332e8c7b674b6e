//! Native build driver.
//!
//! Turns an evaluated recipe into CMake configure and build commands and runs
//! them through a [`CommandRunner`].

pub mod cmake;
pub mod errors;
pub mod invocation;
pub mod runner;

pub use cmake::CMakeBuilder;
pub use errors::BuildError;
pub use invocation::{BuildDirs, BuildInvocation};
pub use runner::{CommandRunner, SystemRunner};
