//! The settings tuple a build is configured under.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;

/// Target operating system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Os {
    Windows,
    Linux,
    Macos,
    FreeBsd,
    /// Anything else, kept verbatim
    Other(String),
}

impl Os {
    /// The host operating system.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Os::Windows,
            "linux" => Os::Linux,
            "macos" => Os::Macos,
            "freebsd" => Os::FreeBsd,
            other => Os::Other(other.to_string()),
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Os::Windows)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::Macos => "Macos",
            Os::FreeBsd => "FreeBSD",
            Os::Other(s) => s,
        }
    }
}

impl FromStr for Os {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RecipeError::InvalidSetting {
                setting: "os",
                value: s.to_string(),
                expected: Some("a non-empty operating system name".to_string()),
            });
        }

        Ok(match trimmed.to_lowercase().as_str() {
            "windows" | "win32" | "win64" => Os::Windows,
            "linux" => Os::Linux,
            "macos" | "darwin" | "osx" => Os::Macos,
            "freebsd" => Os::FreeBsd,
            _ => Os::Other(trimmed.to_string()),
        })
    }
}

impl TryFrom<String> for Os {
    type Error = RecipeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Os> for String {
    fn from(os: Os) -> String {
        os.as_str().to_string()
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(RecipeError::InvalidSetting {
                setting: "build_type",
                value: s.to_string(),
                expected: Some("Debug, Release, RelWithDebInfo, or MinSizeRel".to_string()),
            }),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The (os, compiler, build type, arch) tuple. Supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub compiler: String,
    pub build_type: BuildType,
    pub arch: String,
}

impl Settings {
    /// Settings describing the host, with a release build type.
    pub fn host() -> Self {
        let os = Os::host();
        let compiler = Self::default_compiler(&os).to_string();

        Settings {
            os,
            compiler,
            build_type: BuildType::Release,
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// The usual compiler for an OS.
    pub fn default_compiler(os: &Os) -> &'static str {
        match os {
            Os::Windows => "msvc",
            Os::Macos => "apple-clang",
            _ => "gcc",
        }
    }

    pub fn with_os(mut self, os: Os) -> Self {
        self.os = os;
        self
    }

    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compiler() {
        assert_eq!(Settings::default_compiler(&Os::Windows), "msvc");
        assert_eq!(Settings::default_compiler(&Os::Linux), "gcc");
    }

    #[test]
    fn test_os_parse_is_case_insensitive() {
        assert_eq!("Windows".parse::<Os>().unwrap(), Os::Windows);
        assert_eq!("windows".parse::<Os>().unwrap(), Os::Windows);
        assert_eq!("Darwin".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("Linux".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!(
            "Android".parse::<Os>().unwrap(),
            Os::Other("Android".to_string())
        );
    }

    #[test]
    fn test_os_parse_rejects_empty() {
        assert!(matches!(
            "  ".parse::<Os>(),
            Err(RecipeError::InvalidSetting { setting: "os", .. })
        ));
    }

    #[test]
    fn test_build_type_parse() {
        assert_eq!("release".parse::<BuildType>().unwrap(), BuildType::Release);
        assert_eq!(
            "RelWithDebInfo".parse::<BuildType>().unwrap(),
            BuildType::RelWithDebInfo
        );
        assert!("Fast".parse::<BuildType>().is_err());
    }

    #[test]
    fn test_settings_builders() {
        let settings = Settings::host()
            .with_os(Os::Windows)
            .with_compiler("msvc")
            .with_build_type(BuildType::Debug)
            .with_arch("x86_64");

        assert!(settings.os.is_windows());
        assert_eq!(settings.compiler, "msvc");
        assert_eq!(settings.build_type, BuildType::Debug);
        assert_eq!(settings.arch, "x86_64");
    }
}
