//! TOC manifest reading and load-list rewriting.
//!
//! A TOC file is line oriented:
//! - `## Key: Value` lines are metadata directives
//! - any other line starting with `#` is a comment
//! - every other non-blank line is a file to load, in order
//!
//! Rewrites keep every untouched line byte-for-byte, including the
//! original line ending style and a leading BOM.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::PackError;

const BOM: char = '\u{feff}';

/// Classified view of a single manifest line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocLine<'a> {
    Directive { key: &'a str, value: &'a str },
    Comment,
    File(&'a str),
    Blank,
}

impl<'a> TocLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return TocLine::Blank;
        }
        if let Some(rest) = trimmed.strip_prefix("##") {
            return match rest.split_once(':') {
                Some((key, value)) if !key.trim().is_empty() => TocLine::Directive {
                    key: key.trim(),
                    value: value.trim(),
                },
                _ => TocLine::Comment,
            };
        }
        if trimmed.starts_with('#') {
            return TocLine::Comment;
        }
        TocLine::File(trimmed)
    }
}

/// An add-on manifest held as its original lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocManifest {
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
    bom: bool,
}

impl TocManifest {
    pub fn parse(content: &str) -> Self {
        let bom = content.starts_with(BOM);
        let body = content.strip_prefix(BOM).unwrap_or(content);
        let line_ending = if body.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = body.ends_with('\n');
        let lines = body
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            lines,
            line_ending,
            trailing_newline,
            bom,
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| PackError::malformed("manifest", path, e))?;
        Ok(Self::parse(&content))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_text())
            .with_context(|| format!("Failed to write manifest: {}", path.display()))
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push(BOM);
        }
        out.push_str(&self.lines.join(self.line_ending));
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.line_ending);
        }
        out
    }

    fn classified(&self) -> impl Iterator<Item = TocLine<'_>> {
        self.lines.iter().map(|line| TocLine::classify(line))
    }

    /// First value of a metadata directive, matched case-insensitively.
    pub fn directive(&self, key: &str) -> Option<&str> {
        self.classified().find_map(|line| match line {
            TocLine::Directive { key: k, value } if k.eq_ignore_ascii_case(key) => Some(value),
            _ => None,
        })
    }

    /// Declared required dependencies, in declaration order, without duplicates.
    ///
    /// Read from `RequiredDeps` and every directive whose key starts with
    /// `Dep` (`Dependencies`, `Dep1`, ...). `OptionalDeps` is not included.
    pub fn dependencies(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for line in self.classified() {
            let TocLine::Directive { key, value } = line else {
                continue;
            };
            if !is_dependency_key(key) {
                continue;
            }
            for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                if !names.iter().any(|existing| existing == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Declared version, empty when absent.
    pub fn version(&self) -> String {
        self.directive("Version").unwrap_or_default().to_string()
    }

    pub fn files_to_load(&self) -> Vec<&str> {
        self.classified()
            .filter_map(|line| match line {
                TocLine::File(file) => Some(file),
                _ => None,
            })
            .collect()
    }

    /// Insert load directives before every existing one.
    ///
    /// Without existing load directives the files are appended.
    pub fn prepend_files_to_load<S: AsRef<str>>(&mut self, files: &[S]) {
        if files.is_empty() {
            return;
        }
        let insert_at = self
            .classified()
            .position(|line| matches!(line, TocLine::File(_)))
            .unwrap_or(self.lines.len());
        let new_lines = files.iter().map(|f| f.as_ref().to_string());
        self.lines.splice(insert_at..insert_at, new_lines);
        if insert_at == self.lines.len() - files.len() {
            self.trailing_newline = true;
        }
    }
}

fn is_dependency_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("RequiredDeps")
        || key
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("Dep"))
}

/// `<dir>/<name>.toc`
pub fn manifest_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.toc"))
}

/// The add-on's name is the name of its directory.
pub fn retrieve_addon_name(addon_root: &Path) -> anyhow::Result<String> {
    addon_root
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Cannot determine add-on name from path: {}",
                addon_root.display()
            )
        })
}

pub fn retrieve_dependencies(path: &Path) -> anyhow::Result<Vec<String>> {
    Ok(TocManifest::load(path)?.dependencies())
}

pub fn retrieve_version(path: &Path) -> anyhow::Result<String> {
    Ok(TocManifest::load(path)?.version())
}

pub fn prepend_files_to_load<S: AsRef<str>>(path: &Path, files: &[S]) -> anyhow::Result<()> {
    let mut manifest = TocManifest::load(path)?;
    manifest.prepend_files_to_load(files);
    manifest.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "## Interface: 100200
## Title: Questie Helper
## Version: 1.2.3
## Dependencies: LibStub, CallbackHandler
## OptionalDeps: Ace3
#@no-lib-strip@
Core.lua
UI/Frame.xml
";

    #[test]
    fn classify_lines() {
        assert_eq!(
            TocLine::classify("## Title: Foo"),
            TocLine::Directive {
                key: "Title",
                value: "Foo"
            }
        );
        assert_eq!(TocLine::classify("#@debug@"), TocLine::Comment);
        assert_eq!(TocLine::classify("## no colon here"), TocLine::Comment);
        assert_eq!(TocLine::classify("   "), TocLine::Blank);
        assert_eq!(TocLine::classify("  Core.lua "), TocLine::File("Core.lua"));
    }

    #[test]
    fn reads_metadata() {
        let toc = TocManifest::parse(SAMPLE);
        assert_eq!(toc.version(), "1.2.3");
        assert_eq!(toc.directive("title"), Some("Questie Helper"));
        assert_eq!(toc.dependencies(), vec!["LibStub", "CallbackHandler"]);
        assert_eq!(toc.files_to_load(), vec!["Core.lua", "UI/Frame.xml"]);
    }

    #[test]
    fn missing_version_is_empty() {
        let toc = TocManifest::parse("## Title: Foo\nFoo.lua\n");
        assert_eq!(toc.version(), "");
    }

    #[test]
    fn dependencies_merge_all_required_keys() {
        let toc = TocManifest::parse(
            "## RequiredDeps: A, B\n## Dep1: C\n## Dependencies: B,, D \n## OptionalDeps: E\n",
        );
        assert_eq!(toc.dependencies(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn prepend_goes_before_first_file() {
        let mut toc = TocManifest::parse(SAMPLE);
        toc.prepend_files_to_load(&["libs/LibStub", "libs/CallbackHandler"]);
        assert_eq!(
            toc.files_to_load(),
            vec![
                "libs/LibStub",
                "libs/CallbackHandler",
                "Core.lua",
                "UI/Frame.xml"
            ]
        );
        // The comment directly above the first file stays above the new lines.
        let text = toc.to_text();
        assert!(text.contains("#@no-lib-strip@\nlibs/LibStub\n"));
    }

    #[test]
    fn prepend_without_files_appends() {
        let mut toc = TocManifest::parse("## Title: Empty");
        toc.prepend_files_to_load(&["libs/LibStub"]);
        assert_eq!(toc.to_text(), "## Title: Empty\nlibs/LibStub\n");
    }

    #[test]
    fn untouched_manifest_round_trips() {
        let crlf = "\u{feff}## Title: Foo\r\nFoo.lua\r\n";
        assert_eq!(TocManifest::parse(crlf).to_text(), crlf);
        assert_eq!(TocManifest::parse(SAMPLE).to_text(), SAMPLE);
        let no_trailing = "## Title: Foo\nFoo.lua";
        assert_eq!(TocManifest::parse(no_trailing).to_text(), no_trailing);
    }

    #[test]
    fn prepend_keeps_crlf() {
        let mut toc = TocManifest::parse("## Title: Foo\r\nFoo.lua\r\n");
        toc.prepend_files_to_load(&["libs/Lib"]);
        assert_eq!(toc.to_text(), "## Title: Foo\r\nlibs/Lib\r\nFoo.lua\r\n");
    }

    #[test]
    fn addon_name_is_directory_name() {
        let name = retrieve_addon_name(Path::new("/work/AddOns/MyAddOn")).unwrap();
        assert_eq!(name, "MyAddOn");
    }

    #[test]
    fn file_helpers_read_and_rewrite() {
        let temp = TempDir::new().unwrap();
        let path = manifest_path(temp.path(), "Foo");
        std::fs::write(&path, SAMPLE).unwrap();

        assert_eq!(retrieve_version(&path).unwrap(), "1.2.3");
        assert_eq!(
            retrieve_dependencies(&path).unwrap(),
            vec!["LibStub", "CallbackHandler"]
        );

        prepend_files_to_load(&path, &["libs/LibStub"]).unwrap();
        let toc = TocManifest::load(&path).unwrap();
        assert_eq!(toc.files_to_load()[0], "libs/LibStub");
    }

    #[test]
    fn non_utf8_manifest_is_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Bad.toc");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = TocManifest::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::MalformedDocument { .. })
        ));
    }
}
