//! Packager metadata (`.pkgmeta`) document.
//!
//! The document is kept as an ordered YAML mapping so keys we do not
//! manage (`ignore`, `move-folders`, ...) survive a load/save cycle.

use std::path::Path;

use anyhow::Context;
use serde_yaml::{Mapping, Value};

use crate::error::PackError;

const EXTERNALS_KEY: &str = "externals";
const PACKAGE_AS_KEY: &str = "package-as";
const NOLIB_KEY: &str = "enable-nolib-creation";

/// Where an embedded library is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSource {
    pub url: String,
    /// Absent means the packager takes the latest revision.
    pub tag: Option<String>,
}

impl ExternalSource {
    pub fn new(url: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            url: url.into(),
            tag,
        }
    }

    fn to_value(&self) -> Value {
        let mut entry = Mapping::new();
        entry.insert("url".into(), self.url.clone().into());
        if let Some(tag) = &self.tag {
            entry.insert("tag".into(), tag.clone().into());
        }
        Value::Mapping(entry)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(url) => Some(Self::new(url.clone(), None)),
            Value::Mapping(entry) => {
                let url = entry.get("url")?.as_str()?.to_string();
                let tag = entry.get("tag").and_then(|t| match t {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
                Some(Self::new(url, tag))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageMetaDocument {
    root: Mapping,
}

impl PackageMetaDocument {
    /// Fresh document for an add-on packaged as `package_as`.
    pub fn new(package_as: &str) -> Self {
        let mut root = Mapping::new();
        root.insert(PACKAGE_AS_KEY.into(), package_as.into());
        root.insert(NOLIB_KEY.into(), "no".into());
        root.insert(EXTERNALS_KEY.into(), Value::Mapping(Mapping::new()));
        Self { root }
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        match serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string())? {
            Value::Null => Ok(Self::default()),
            Value::Mapping(root) => match root.get(EXTERNALS_KEY) {
                None | Some(Value::Null) | Some(Value::Mapping(_)) => Ok(Self { root }),
                Some(other) => Err(format!("'{EXTERNALS_KEY}' must be a mapping, found {other:?}")),
            },
            other => Err(format!("expected a mapping at the top level, found {other:?}")),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read package metadata: {}", path.display()))?;
        Self::parse(&content)
            .map_err(|message| PackError::malformed("package metadata", path, message).into())
    }

    /// Load `path`, or start a new document packaged as `package_as`.
    pub fn load_or_new(path: &Path, package_as: &str) -> anyhow::Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "Creating new package metadata");
            Ok(Self::new(package_as))
        }
    }

    pub fn package_as(&self) -> Option<&str> {
        self.root.get(PACKAGE_AS_KEY).and_then(Value::as_str)
    }

    /// Externals in document order; entries we cannot read are skipped.
    pub fn externals(&self) -> Vec<(String, ExternalSource)> {
        let Some(Value::Mapping(externals)) = self.root.get(EXTERNALS_KEY) else {
            return Vec::new();
        };
        externals
            .iter()
            .filter_map(|(key, value)| {
                Some((key.as_str()?.to_string(), ExternalSource::from_value(value)?))
            })
            .collect()
    }

    /// Insert or replace the external at `install_path`.
    ///
    /// An existing entry keeps its position.
    pub fn upsert_external(&mut self, install_path: &str, source: &ExternalSource) {
        let externals = self
            .root
            .entry(EXTERNALS_KEY.into())
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        // Parsing only admits a mapping or null here.
        if !externals.is_mapping() {
            *externals = Value::Mapping(Mapping::new());
        }
        if let Value::Mapping(externals) = externals {
            externals.insert(install_path.into(), source.to_value());
        }
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(&self.root).context("Failed to serialize package metadata")
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_yaml()?)
            .with_context(|| format!("Failed to write package metadata: {}", path.display()))
    }
}
