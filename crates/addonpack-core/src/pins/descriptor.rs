//! Pin descriptor (`.dependencies`) parsing.
//!
//! Two YAML layouts are accepted:
//!
//! ```yaml
//! LibStub:
//!   url: https://github.com/owner/LibStub.git
//!   tag: "1.0.2"
//!   path: libs/LibStub        # optional
//! ```
//!
//! or a sequence of `{url, tag, path}` records, where the name is the
//! last component of `path`.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::PackError;

/// A dependency pinned to a source-control tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRecord {
    pub name: String,
    pub url: String,
    pub tag: String,
    /// `/`-separated path relative to the consuming add-on's root
    pub install_path: String,
}

impl PinRecord {
    /// Move the pin under `libraries_dir`, keeping its folder name.
    pub fn rehome(&mut self, libraries_dir: &Path) {
        let folder = self
            .install_path
            .rsplit(['/', '\\'])
            .find(|part| !part.is_empty())
            .unwrap_or(&self.name)
            .to_string();
        self.install_path = library_install_path(libraries_dir, &folder);
    }
}

/// `<libraries_dir>/<name>` with `/` separators.
pub fn library_install_path(libraries_dir: &Path, name: &str) -> String {
    let mut parts: Vec<String> = libraries_dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .filter(|p| p != ".")
        .collect();
    parts.push(name.to_string());
    parts.join("/")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinDescriptor {
    pub pins: Vec<PinRecord>,
}

#[derive(Debug, Deserialize)]
struct RawPin {
    #[serde(default)]
    name: Option<String>,
    url: String,
    #[serde(deserialize_with = "scalar_string")]
    tag: String,
    #[serde(default)]
    path: Option<String>,
}

/// Accept unquoted numeric tags such as `tag: 3`.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar tag, found {other:?}"
        ))),
    }
}

impl PinDescriptor {
    /// Parse descriptor text; `libraries_dir` supplies default install paths.
    pub fn parse(content: &str, libraries_dir: &Path) -> Result<Self, String> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        let mut pins = Vec::new();

        match value {
            Value::Null => {}
            Value::Mapping(entries) => {
                for (key, entry) in entries {
                    let name = key
                        .as_str()
                        .ok_or_else(|| format!("pin names must be strings, found {key:?}"))?
                        .to_string();
                    let raw: RawPin = serde_yaml::from_value(entry)
                        .map_err(|e| format!("pin '{name}': {e}"))?;
                    pins.push(Self::record(Some(name), raw, libraries_dir)?);
                }
            }
            Value::Sequence(entries) => {
                for (index, entry) in entries.into_iter().enumerate() {
                    let raw: RawPin = serde_yaml::from_value(entry)
                        .map_err(|e| format!("pin #{}: {e}", index + 1))?;
                    pins.push(Self::record(None, raw, libraries_dir)?);
                }
            }
            other => return Err(format!("expected a mapping or a list, found {other:?}")),
        }

        Ok(Self { pins })
    }

    fn record(key: Option<String>, raw: RawPin, libraries_dir: &Path) -> Result<PinRecord, String> {
        let name = key
            .or(raw.name)
            .or_else(|| {
                raw.path.as_deref().and_then(|p| {
                    p.rsplit(['/', '\\'])
                        .find(|part| !part.is_empty())
                        .map(str::to_string)
                })
            })
            .ok_or_else(|| format!("pin for {} has neither a name nor a path", raw.url))?;
        let install_path = raw
            .path
            .map(|p| p.trim_end_matches(['/', '\\']).to_string())
            .unwrap_or_else(|| library_install_path(libraries_dir, &name));

        Ok(PinRecord {
            name,
            url: raw.url,
            tag: raw.tag,
            install_path,
        })
    }

    /// Load a descriptor that must exist.
    pub fn load(path: &Path, libraries_dir: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pin descriptor: {}", path.display()))?;
        Self::parse(&content, libraries_dir)
            .map_err(|message| PackError::malformed("pin descriptor", path, message).into())
    }

    /// Load a descriptor if the file exists.
    pub fn load_optional(path: &Path, libraries_dir: &Path) -> anyhow::Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(path, libraries_dir).map(Some)
    }
}
