//! Configuration layer merging logic
//!
//! Global -> Project: a field set in the project layer replaces the
//! global value; unset fields fall through.

use super::schema::{BuildSection, PackConfig, SyncSection};

/// Merge the global and project layers into one.
pub fn merge_configs(global: Option<PackConfig>, project: Option<PackConfig>) -> PackConfig {
    let mut merged = global.unwrap_or_default();
    if let Some(project) = project {
        merge_build(&mut merged.build, project.build);
        merge_sync(&mut merged.sync, project.sync);
    }
    merged
}

fn merge_build(base: &mut BuildSection, layer: BuildSection) {
    overlay(&mut base.output_dir, layer.output_dir);
    overlay(&mut base.archiver, layer.archiver);
    overlay(&mut base.seven_zip_program, layer.seven_zip_program);
    overlay(&mut base.exclude_names, layer.exclude_names);
    overlay(&mut base.exclude_extensions, layer.exclude_extensions);
}

fn merge_sync(base: &mut SyncSection, layer: SyncSection) {
    overlay(&mut base.libraries_dir, layer.libraries_dir);
    overlay(&mut base.pin_file, layer.pin_file);
    overlay(&mut base.package_meta_file, layer.package_meta_file);
    overlay(&mut base.manifest_variants, layer.manifest_variants);
    overlay(&mut base.git_program, layer.git_program);
}

fn overlay<T>(base: &mut Option<T>, layer: Option<T>) {
    if layer.is_some() {
        *base = layer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiverKind;
    use std::path::PathBuf;

    #[test]
    fn project_fields_override_global() {
        let mut global = PackConfig::new();
        global.build.archiver = Some(ArchiverKind::SevenZip);
        global.build.output_dir = Some(PathBuf::from("/srv/build"));

        let mut project = PackConfig::new();
        project.build.archiver = Some(ArchiverKind::Zip);

        let merged = merge_configs(Some(global), Some(project));
        assert_eq!(merged.build.archiver, Some(ArchiverKind::Zip));
        assert_eq!(merged.build.output_dir, Some(PathBuf::from("/srv/build")));
    }

    #[test]
    fn lists_are_replaced_not_concatenated() {
        let mut global = PackConfig::new();
        global.sync.manifest_variants = Some(vec!["".into(), "_Wrath".into()]);

        let mut project = PackConfig::new();
        project.sync.manifest_variants = Some(vec!["".into()]);

        let merged = merge_configs(Some(global), Some(project));
        assert_eq!(merged.sync.manifest_variants, Some(vec![String::new()]));
    }

    #[test]
    fn no_layers_is_default() {
        assert_eq!(merge_configs(None, None), PackConfig::default());
    }
}
