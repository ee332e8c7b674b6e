//! Resolved package identity for one invocation.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::manifest::PackageMetadata;
use crate::core::settings::Settings;
use crate::core::version::ResolvedVersion;

/// Identity and metadata of the package being built.
///
/// Constructed once per invocation after version resolution; there are no
/// setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    name: String,
    version: ResolvedVersion,
    license: Option<String>,
    author: Option<String>,
    url: Option<String>,
    description: Option<String>,
    topics: BTreeSet<String>,
    settings: Settings,
}

impl PackageDescriptor {
    pub fn new(metadata: &PackageMetadata, version: ResolvedVersion, settings: Settings) -> Self {
        PackageDescriptor {
            name: metadata.name.clone(),
            version,
            license: metadata.license.clone(),
            author: metadata.author.clone(),
            url: metadata.url.clone(),
            description: metadata.description.clone(),
            topics: metadata.topics.clone(),
            settings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version.value
    }

    pub fn resolved_version(&self) -> &ResolvedVersion {
        &self.version
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn topics(&self) -> &BTreeSet<String> {
        &self.topics
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
