//! Remote URL normalization.

const GITHUB_SSH_PREFIX: &str = "git@github.com:";

/// Rewrite `git@github.com:<path>.git` to `https://github.com/<path>`.
///
/// Any other form is returned unchanged.
pub fn normalize_github_url(url: &str) -> String {
    url.strip_prefix(GITHUB_SSH_PREFIX)
        .and_then(|rest| rest.strip_suffix(".git"))
        .filter(|path| !path.is_empty())
        .map(|path| format!("https://github.com/{path}"))
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssh_becomes_https() {
        assert_eq!(
            normalize_github_url("git@github.com:org/repo.git"),
            "https://github.com/org/repo"
        );
    }

    #[test]
    fn https_is_unchanged() {
        let url = "https://github.com/org/repo.git";
        assert_eq!(normalize_github_url(url), url);
    }

    #[test]
    fn other_hosts_are_unchanged() {
        let url = "git@gitlab.com:org/repo.git";
        assert_eq!(normalize_github_url(url), url);
        let url = "https://repos.wowace.com/wow/libstub/trunk";
        assert_eq!(normalize_github_url(url), url);
    }

    #[test]
    fn ssh_without_git_suffix_is_unchanged() {
        let url = "git@github.com:org/repo";
        assert_eq!(normalize_github_url(url), url);
        assert_eq!(normalize_github_url("git@github.com:.git"), "git@github.com:.git");
    }
}
