//! Structured view of `git remote -v` output.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDirection {
    Fetch,
    Push,
}

impl RemoteDirection {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "(fetch)" => Some(Self::Fetch),
            "(push)" => Some(Self::Push),
            _ => None,
        }
    }
}

/// One row of a remote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub url: String,
    pub direction: RemoteDirection,
}

impl RemoteEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>, direction: RemoteDirection) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            direction,
        }
    }
}

/// Parse `<name>\t<url> (fetch|push)` rows; anything else is skipped.
pub fn parse_remote_listing(output: &str) -> Vec<RemoteEntry> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let url = parts.next()?;
            let direction = RemoteDirection::parse(parts.next()?)?;
            if parts.next().is_some() {
                return None;
            }
            Some(RemoteEntry::new(name, url, direction))
        })
        .collect()
}

/// The fetch URL of the remote named `origin`.
pub fn origin_fetch_url(remotes: &[RemoteEntry]) -> Option<&str> {
    remotes
        .iter()
        .find(|r| r.name == "origin" && r.direction == RemoteDirection::Fetch)
        .map(|r| r.url.as_str())
}
