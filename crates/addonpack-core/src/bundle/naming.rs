//! Output archive naming.

pub const ARCHIVE_EXTENSION: &str = "zip";

/// `Foo` + `1.2.3` -> `Foo_1_2_3.zip`; an empty version gives `Foo.zip`.
pub fn archive_file_name(name: &str, version: &str) -> String {
    let mut file_name = name.to_string();
    if !version.is_empty() {
        file_name.push('_');
        file_name.push_str(&version.replace('.', "_"));
    }
    file_name.push('.');
    file_name.push_str(ARCHIVE_EXTENSION);
    file_name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_dots_become_underscores() {
        assert_eq!(archive_file_name("Foo", "1.2.3"), "Foo_1_2_3.zip");
    }

    #[test]
    fn empty_version_is_omitted() {
        assert_eq!(archive_file_name("Foo", ""), "Foo.zip");
    }

    #[test]
    fn non_numeric_versions_are_kept() {
        assert_eq!(archive_file_name("Foo", "v2.0-beta"), "Foo_v2_0-beta.zip");
    }
}
