//! TOML parser with helpful error messages

use super::schema::PackConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse an addonpack.toml file with detailed error messages
pub fn parse_pack_toml(path: &Path) -> Result<PackConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_pack_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse addonpack.toml content from string
pub fn parse_pack_toml_str(content: &str) -> Result<PackConfig> {
    let config: PackConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

/// Attach the offending lines to a TOML error when a position is known
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    let line_num = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    match line_num {
        Some(line_num) => anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            get_line_context(content, line_num),
            message
        ),
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 2).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a configuration layer to TOML string
pub fn to_toml(config: &PackConfig) -> Result<String> {
    toml::to_string_pretty(config).with_context(|| "Failed to serialize configuration to TOML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiverKind;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
[build]
output_dir = "dist"
archiver = "7z"
exclude_extensions = ["bat", "ps1"]

[sync]
libraries_dir = "Libs"
manifest_variants = ["", "_Cata"]
"#;

        let config = parse_pack_toml_str(toml).unwrap();
        assert_eq!(config.build.output_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.build.archiver, Some(ArchiverKind::SevenZip));
        assert_eq!(
            config.sync.manifest_variants,
            Some(vec![String::new(), "_Cata".to_string()])
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_pack_toml_str("").unwrap();
        assert_eq!(config, PackConfig::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = parse_pack_toml_str("[build]\noutput = \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("TOML parsing error"));
    }

    #[test]
    fn test_error_points_at_line() {
        let content = "[build]\narchiver = \"zip\"\nexclude_names = 5\n";
        let err = parse_pack_toml_str(content).unwrap_err().to_string();
        assert!(err.contains("line 3"), "unexpected error: {err}");
        assert!(err.contains(">>>"));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let err = parse_pack_toml_str("[build]\nexclude_extensions = [\".bat\"]\n").unwrap_err();
        assert!(err.to_string().contains("Invalid exclude extension"));
    }

    #[test]
    fn test_parse_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sync]\npin_file = \".pins\"").unwrap();

        let config = parse_pack_toml(file.path()).unwrap();
        assert_eq!(config.sync.pin_file.as_deref(), Some(".pins"));
    }

    #[test]
    fn test_round_trip_through_to_toml() {
        let mut config = PackConfig::new();
        config.sync.libraries_dir = Some(PathBuf::from("Libs"));
        let text = to_toml(&config).unwrap();
        assert_eq!(parse_pack_toml_str(&text).unwrap(), config);
    }
}
