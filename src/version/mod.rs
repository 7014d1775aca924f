//! Version expression handling
//!
//! A Terrafile `version` is either a literal ref (`master`, `HEAD`, `v1.2.0`,
//! a branch name) or a wildcard expression such as `v1.+` or `2.3.+`, where
//! `+` stands for any run of digits. Wildcard expressions are matched against
//! the remote's tags, newest first, and the first tag whose name starts with
//! the expression wins.

use regex::Regex;

use crate::error::{Result, TerrafileError};

/// Marker for "any numeric suffix"
pub const WILDCARD: char = '+';

/// Default version-prefix character class
pub const DEFAULT_VERSION_PREFIX: &str = "vV0-9";

const RESERVED_ALIASES: &[&str] = &["master", "head"];

/// Validated version-prefix grammar
///
/// Holds the body of a regex character class (e.g. `vV0-9`) and the compiled
/// validation pattern `^[prefix]+[\d.|+]+[+|-]*[\w]*$` built from it.
#[derive(Debug, Clone)]
pub struct VersionPrefix {
    class: String,
    validation: Regex,
}

impl VersionPrefix {
    pub fn new(class: impl Into<String>) -> Result<Self> {
        let class = class.into();
        if class.is_empty() {
            return Err(TerrafileError::InvalidVersionPrefix {
                prefix: class,
                reason: "prefix class must not be empty".to_string(),
            });
        }

        let validation = Regex::new(&format!(r"^[{class}]+[\d.|+]+[+|-]*[\w]*$")).map_err(|e| {
            TerrafileError::InvalidVersionPrefix {
                prefix: class.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { class, validation })
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    fn validate(&self, version: &str) -> Result<()> {
        if self.validation.is_match(version) {
            Ok(())
        } else {
            Err(TerrafileError::InvalidVersionExpression {
                version: version.to_string(),
                pattern: self.validation.as_str().to_string(),
            })
        }
    }
}

impl Default for VersionPrefix {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_PREFIX)
            .unwrap_or_else(|e| unreachable!("default version prefix is valid: {e}"))
    }
}

/// A parsed manifest version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionExpression {
    /// Used as-is; existence is only checked when cloning
    Literal(String),

    /// Resolved against remote tags
    Pattern(String),
}

impl VersionExpression {
    pub fn parse(version: &str) -> Self {
        if is_reserved_alias(version) || !version.contains(WILDCARD) {
            VersionExpression::Literal(version.to_string())
        } else {
            VersionExpression::Pattern(version.to_string())
        }
    }
}

/// Whether `version` names a moving ref (`master`, `HEAD`, any case)
pub fn is_reserved_alias(version: &str) -> bool {
    let trimmed = version.trim();
    RESERVED_ALIASES
        .iter()
        .any(|alias| trimmed.eq_ignore_ascii_case(alias))
}

/// Whether `version` is the `HEAD` alias
pub fn is_head(version: &str) -> bool {
    version.trim().eq_ignore_ascii_case("head")
}

/// Resolve a manifest version to a literal ref
///
/// Literal versions are returned unchanged without calling `list_tags`.
/// Wildcard versions are validated against `prefix`, then matched against the
/// tag refs returned by `list_tags` (expected newest first). `source` only
/// names the repository in errors.
pub fn resolve_version<F>(
    version: &str,
    source: &str,
    prefix: &VersionPrefix,
    list_tags: F,
) -> Result<String>
where
    F: FnOnce() -> Result<Vec<String>>,
{
    let expression = match VersionExpression::parse(version) {
        VersionExpression::Literal(literal) => return Ok(literal),
        VersionExpression::Pattern(pattern) => pattern,
    };

    prefix.validate(&expression)?;

    let tags = list_tags()?;
    let matcher = tag_matcher(&expression)?;

    tags.iter()
        .find_map(|tag_ref| {
            matcher
                .captures(tag_ref)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .ok_or_else(|| TerrafileError::VersionNotFound {
            version: expression.clone(),
            source_url: source.to_string(),
        })
}

/// Build the tag regex for a wildcard expression
///
/// Literal segments are escaped, `+` becomes `\d*`, and the match is anchored
/// at `refs/tags/`. Trailing characters after the expression are captured too.
fn tag_matcher(expression: &str) -> Result<Regex> {
    let pattern = expression
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\d*");

    Regex::new(&format!("^refs/tags/({pattern}.*)$")).map_err(|e| {
        TerrafileError::InvalidVersionExpression {
            version: expression.to_string(),
            pattern: e.to_string(),
        }
    })
}
