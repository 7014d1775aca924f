//! Credential embedding for HTTPS clone URLs
//!
//! A token from the environment is inserted as the user part of URLs shaped
//! like `https://host/owner/repo.git`. Other URLs are left untouched and rely
//! on git's own credential handling.

use std::sync::LazyLock;

use regex::Regex;

static HTTPS_REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://([^/@]+)/([^/]+)/([^/]+)\.git$")
        .unwrap_or_else(|e| unreachable!("https repository pattern is valid: {e}"))
});

static URL_USERINFO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://)[^/@\s]+@")
        .unwrap_or_else(|e| unreachable!("url userinfo pattern is valid: {e}"))
});

/// Embed `token` into an HTTPS repository URL, if the URL has the expected shape
pub fn add_token(url: &str, token: &str) -> String {
    match HTTPS_REPO_RE.captures(url) {
        Some(captures) => format!(
            "https://{token}@{}/{}/{}.git",
            &captures[1], &captures[2], &captures[3]
        ),
        None => url.to_string(),
    }
}

/// Replace every occurrence of `token` in `text`
pub fn redact(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, "***")
}

/// Mask the user part of every HTTP(S) URL in `text`
pub fn mask_userinfo(text: &str) -> String {
    URL_USERINFO_RE.replace_all(text, "${1}***@").into_owned()
}
