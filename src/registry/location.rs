//! Parsing of registry download locations
//!
//! Two location shapes are understood:
//! - a tarball API URL: `https://<host>/repos/<owner>/<repo>/tarball/<ref>/...`
//! - a git forced-getter URL: `git::https://<host>/<owner>/<repo>[.git][//dir]?ref=<ref>`
//!
//! Both normalize to `https://<host>/<owner>/<repo>.git` plus the ref.

use std::sync::LazyLock;

use regex::Regex;

static TARBALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://([^/]+)/repos/([^/]+)/([^/]+)/tarball/([^/]+)/.*")
        .unwrap_or_else(|e| unreachable!("tarball pattern is valid: {e}"))
});

static GIT_GETTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git::https://([^/]+)/([^/]+)/([^/?]+?)(?:\.git)?(?://[^?]*)?\?(?:.*&)?ref=([^&]+)")
        .unwrap_or_else(|e| unreachable!("git getter pattern is valid: {e}"))
});

/// Cloneable repository and ref extracted from a download location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub url: String,
    pub git_ref: String,
}

/// Extract the repository and ref from a download location
pub fn parse_download_location(location: &str) -> Option<ResolvedLocation> {
    if let Some(captures) = TARBALL_RE.captures(location) {
        let host = captures[1].strip_prefix("api.").unwrap_or(&captures[1]);
        return Some(ResolvedLocation {
            url: format!("https://{host}/{}/{}.git", &captures[2], &captures[3]),
            git_ref: captures[4].to_string(),
        });
    }

    let captures = GIT_GETTER_RE.captures(location)?;
    Some(ResolvedLocation {
        url: format!("https://{}/{}/{}.git", &captures[1], &captures[2], &captures[3]),
        git_ref: captures[4].to_string(),
    })
}
