//! Ordered list of resources a session fetches and hands to the runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_RESOURCES;
use crate::ids::is_safe_resource_name;

/// Validation error for a resource manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// The manifest lists no resources
    #[error("manifest lists no resources")]
    Empty,

    /// A name cannot be used as a single runtime file name
    #[error("invalid resource name {0:?}")]
    InvalidName(String),

    /// The same name appears more than once
    #[error("resource {0:?} is listed more than once")]
    Duplicate(String),

    /// JSON parsing error
    #[error("manifest parsing failed: {0}")]
    Parse(String),
}

/// Ordered resource names.
///
/// Order is significant twice over: it is the fetch order, and it is the
/// argument order passed to the runtime entry point.
///
/// ```
/// use gbhost_shared::ResourceManifest;
///
/// let manifest = ResourceManifest::default();
/// assert_eq!(manifest.names(), ["bootRom.gb", "tetris.gb"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceManifest {
    resources: Vec<String>,
}

impl ResourceManifest {
    /// Build a manifest from names, validating each one.
    pub fn new<I, S>(names: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let manifest = Self {
            resources: names.into_iter().map(Into::into).collect(),
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from JSON of the form `{"resources": ["a.gb", "b.gb"]}`.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self =
            serde_json::from_str(json).map_err(|e| ManifestError::Parse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check every name and reject duplicates.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.resources.is_empty() {
            return Err(ManifestError::Empty);
        }

        for (i, name) in self.resources.iter().enumerate() {
            if !is_safe_resource_name(name) {
                return Err(ManifestError::InvalidName(name.clone()));
            }
            if self.resources[..i].contains(name) {
                return Err(ManifestError::Duplicate(name.clone()));
            }
        }

        Ok(())
    }

    /// Resource names in fetch order.
    pub fn names(&self) -> &[String] {
        &self.resources
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Always false for a validated manifest.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The argument vector for the runtime entry point.
    pub fn to_args(&self) -> Vec<String> {
        self.resources.clone()
    }
}

impl Default for ResourceManifest {
    fn default() -> Self {
        Self {
            resources: DEFAULT_RESOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
