//! Process environment access
//!
//! The sync engine reads the environment only through [`Environment`], so
//! tests can supply variables without touching process-wide state.

/// Variable holding a token for cloning private repositories
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Read-only view of environment variables
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;

    /// Credential token, ignoring empty values
    fn token(&self) -> Option<String> {
        self.var(TOKEN_VAR).filter(|token| !token.trim().is_empty())
    }
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}
