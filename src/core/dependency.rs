//! Configure-time requirements.
//!
//! A requirement names a library, a version, and optionally a channel
//! (`user/channel`) qualifying that version in the package framework. They
//! are written `name/version` or `name/version@user/channel`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;

/// Namespace qualifying a requirement's version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    pub user: String,
    pub channel: String,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.channel)
    }
}

/// A single `(name, version, channel)` requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Requirement {
    pub name: String,
    pub version: String,
    pub channel: Option<Channel>,
}

impl Requirement {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Requirement {
            name: name.into(),
            version: version.into(),
            channel: None,
        }
    }

    pub fn with_channel(mut self, user: impl Into<String>, channel: impl Into<String>) -> Self {
        self.channel = Some(Channel {
            user: user.into(),
            channel: channel.into(),
        });
        self
    }
}

fn is_valid_component(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

impl FromStr for Requirement {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RecipeError::InvalidRequirement {
            spec: s.to_string(),
            reason: reason.to_string(),
        };

        let (reference, channel) = match s.split_once('@') {
            Some((reference, channel)) => (reference, Some(channel)),
            None => (s, None),
        };

        let (name, version) = reference
            .split_once('/')
            .ok_or_else(|| invalid("expected `name/version`"))?;

        if !is_valid_component(name) {
            return Err(invalid("empty or malformed name"));
        }
        if !is_valid_component(version) {
            return Err(invalid("empty or malformed version"));
        }

        let mut req = Requirement::new(name, version);

        if let Some(channel) = channel {
            let (user, chan) = channel
                .split_once('/')
                .ok_or_else(|| invalid("expected `@user/channel`"))?;
            if !is_valid_component(user) || !is_valid_component(chan) {
                return Err(invalid("empty or malformed channel"));
            }
            req = req.with_channel(user, chan);
        }

        Ok(req)
    }
}

impl TryFrom<String> for Requirement {
    type Error = RecipeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Requirement> for String {
    fn from(req: Requirement) -> String {
        req.to_string()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if let Some(ref channel) = self.channel {
            write!(f, "@{}", channel)?;
        }
        Ok(())
    }
}

/// Requirements in declaration order, unique by library name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencySpec {
    requirements: Vec<Requirement>,
}

impl DependencySpec {
    /// Build a spec, rejecting a second entry for an already-required name.
    pub fn new(requirements: Vec<Requirement>) -> Result<Self, RecipeError> {
        for (i, req) in requirements.iter().enumerate() {
            if let Some(first) = requirements[..i].iter().find(|r| r.name == req.name) {
                return Err(RecipeError::DuplicateRequirement {
                    name: req.name.clone(),
                    first: first.to_string(),
                    second: req.to_string(),
                });
            }
        }
        Ok(DependencySpec { requirements })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_requirement() {
        let req: Requirement = "boost/1.80.0".parse().unwrap();
        assert_eq!(req.name, "boost");
        assert_eq!(req.version, "1.80.0");
        assert!(req.channel.is_none());
    }

    #[test]
    fn test_parse_channel_requirement() {
        let req: Requirement = "data/v0.0.26@proofofwork/stable".parse().unwrap();
        assert_eq!(req.name, "data");
        assert_eq!(req.version, "v0.0.26");
        assert_eq!(
            req.channel,
            Some(Channel {
                user: "proofofwork".into(),
                channel: "stable".into()
            })
        );
        assert_eq!(req.to_string(), "data/v0.0.26@proofofwork/stable");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["boost", "/1.0", "boost/", "boost/1.0@stable", "boost/1.0@/stable"] {
            assert!(bad.parse::<Requirement>().is_err(), "{} should fail", bad);
        }
    }

    #[test]
    fn test_spec_preserves_order() {
        let spec = DependencySpec::new(vec![
            "openssl/1.1.1t".parse().unwrap(),
            "boost/1.80.0".parse().unwrap(),
        ])
        .unwrap();
        let names: Vec<_> = spec.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["openssl", "boost"]);
    }

    #[test]
    fn test_spec_rejects_duplicates() {
        let err = DependencySpec::new(vec![
            "gmp/6.2.1".parse().unwrap(),
            "boost/1.80.0".parse().unwrap(),
            "gmp/6.3.0".parse().unwrap(),
        ])
        .unwrap_err();

        match err {
            RecipeError::DuplicateRequirement { name, first, second } => {
                assert_eq!(name, "gmp");
                assert_eq!(first, "gmp/6.2.1");
                assert_eq!(second, "gmp/6.3.0");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
