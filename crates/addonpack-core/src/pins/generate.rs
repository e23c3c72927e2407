//! `.pkgmeta` generation from the resolved sibling dependencies.

use std::path::PathBuf;

use super::{ExternalSource, PackageMetaDocument, library_install_path};
use crate::context::BuildContext;
use crate::git::{SourceControl, origin_url};
use crate::manifest::TocManifest;
use crate::resolver::DependencyGraphResolver;

#[derive(Debug, Clone, Default)]
pub struct PackageMetaReport {
    pub path: PathBuf,
    /// Upserted `(install path, source)` pairs in resolution order
    pub externals: Vec<(String, ExternalSource)>,
    pub warnings: Vec<String>,
}

/// Record every resolved dependency as an external of the add-on.
///
/// Each dependency's checkout supplies the url (its origin fetch URL)
/// and its manifest supplies the tag (its declared version).
pub fn generate_package_meta(
    ctx: &BuildContext,
    source_control: &dyn SourceControl,
) -> anyhow::Result<PackageMetaReport> {
    let resolved = DependencyGraphResolver::new(ctx.addons_root()).resolve(&ctx.manifest_path())?;

    let path = ctx.package_meta_path();
    let mut document = PackageMetaDocument::load_or_new(&path, ctx.addon_name())?;
    let mut report = PackageMetaReport {
        path: path.clone(),
        warnings: resolved.warnings.clone(),
        ..Default::default()
    };

    for dependency in &resolved.dependencies {
        let url = match origin_url(source_control, &dependency.source_path) {
            Ok(Some(url)) => url,
            Ok(None) => {
                skip(&mut report, &dependency.name, "it has no origin remote");
                continue;
            }
            Err(e) => {
                skip(&mut report, &dependency.name, &format!("{e:#}"));
                continue;
            }
        };

        let version = TocManifest::load(&ctx.dependency_manifest_path(&dependency.name))?.version();
        let tag = (!version.is_empty()).then_some(version);
        let install_path =
            library_install_path(&ctx.sync_settings().libraries_dir, &dependency.name);
        let source = ExternalSource::new(url, tag);

        document.upsert_external(&install_path, &source);
        report.externals.push((install_path, source));
    }

    document.save(&path)?;
    tracing::info!(path = %path.display(), externals = report.externals.len(), "Wrote package metadata");
    Ok(report)
}

fn skip(report: &mut PackageMetaReport, name: &str, reason: &str) {
    tracing::debug!(dependency = %name, "No resolvable origin: {}", reason);
    report.warnings.push(format!(
        "Dependency \"{name}\" has been left out of the package metadata: {reason}"
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackConfig;
    use crate::git::{RemoteDirection, RemoteEntry};
    use std::path::Path;
    use tempfile::TempDir;

    /// Every checkout reports the same origin derived from its directory name.
    #[derive(Debug)]
    struct NamedOrigins;

    impl SourceControl for NamedOrigins {
        fn clone_repository(&self, _url: &str, _dest: &Path) -> anyhow::Result<()> {
            unreachable!("not used")
        }

        fn checkout(&self, _repo: &Path, _reference: &str) -> anyhow::Result<()> {
            unreachable!("not used")
        }

        fn remotes(&self, repo: &Path) -> anyhow::Result<Vec<RemoteEntry>> {
            let name = repo.file_name().unwrap().to_string_lossy();
            if name == "NoOrigin" {
                return Ok(vec![RemoteEntry::new(
                    "fork",
                    "https://example.com/fork.git",
                    RemoteDirection::Fetch,
                )]);
            }
            Ok(vec![RemoteEntry::new(
                "origin",
                format!("git@github.com:owner/{name}.git"),
                RemoteDirection::Fetch,
            )])
        }
    }

    fn write_addon(root: &Path, name: &str, version: &str, deps: &[&str], git: bool) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        if git {
            std::fs::create_dir_all(dir.join(".git")).unwrap();
        }
        let mut toc = String::new();
        if !version.is_empty() {
            toc.push_str(&format!("## Version: {version}\n"));
        }
        if !deps.is_empty() {
            toc.push_str(&format!("## Dependencies: {}\n", deps.join(", ")));
        }
        toc.push_str("Main.lua\n");
        std::fs::write(dir.join(format!("{name}.toc")), toc).unwrap();
    }

    #[test]
    fn externals_use_origin_and_version() {
        let temp = TempDir::new().unwrap();
        write_addon(temp.path(), "MyAddOn", "1.0", &["LibA", "LibB", "Gone"], false);
        write_addon(temp.path(), "LibA", "2.1", &[], true);
        write_addon(temp.path(), "LibB", "", &[], true);
        let ctx = BuildContext::new(&temp.path().join("MyAddOn"), &PackConfig::default()).unwrap();

        let report = generate_package_meta(&ctx, &NamedOrigins).unwrap();
        assert_eq!(
            report.externals,
            vec![
                (
                    "libs/LibA".to_string(),
                    ExternalSource::new("https://github.com/owner/LibA", Some("2.1".into()))
                ),
                (
                    "libs/LibB".to_string(),
                    ExternalSource::new("https://github.com/owner/LibB", None)
                ),
            ]
        );
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("\"Gone\""));

        let document = PackageMetaDocument::load(&report.path).unwrap();
        assert_eq!(document.package_as(), Some("MyAddOn"));
        assert_eq!(document.externals(), report.externals);
    }

    #[test]
    fn dependencies_without_origin_are_warned() {
        let temp = TempDir::new().unwrap();
        write_addon(temp.path(), "MyAddOn", "1.0", &["NoOrigin", "Plain"], false);
        write_addon(temp.path(), "NoOrigin", "1", &[], true);
        write_addon(temp.path(), "Plain", "1", &[], false);
        let ctx = BuildContext::new(&temp.path().join("MyAddOn"), &PackConfig::default()).unwrap();

        let report = generate_package_meta(&ctx, &NamedOrigins).unwrap();
        assert!(report.externals.is_empty());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("\"NoOrigin\""));
        assert!(report.warnings[0].contains("no origin remote"));
        assert!(report.warnings[1].contains("Not a git checkout"));
    }

    #[test]
    fn existing_document_keeps_package_as() {
        let temp = TempDir::new().unwrap();
        write_addon(temp.path(), "MyAddOn", "1.0", &["LibA"], false);
        write_addon(temp.path(), "LibA", "3", &[], true);
        std::fs::write(
            temp.path().join("MyAddOn").join(".pkgmeta"),
            "package-as: Renamed\nexternals:\n  libs/Other: https://example.com/other\n",
        )
        .unwrap();
        let ctx = BuildContext::new(&temp.path().join("MyAddOn"), &PackConfig::default()).unwrap();

        let report = generate_package_meta(&ctx, &NamedOrigins).unwrap();
        let document = PackageMetaDocument::load(&report.path).unwrap();
        assert_eq!(document.package_as(), Some("Renamed"));
        assert_eq!(document.externals().len(), 2);
        assert!(!std::fs::read_to_string(&report.path).unwrap().contains("nolib"));
    }
}
