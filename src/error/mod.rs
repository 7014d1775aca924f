//! Error types and handling for terrafile
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes.
//!
//! Errors fall into two families that map to distinct exit codes:
//! - bad input: manifest and validation errors
//! - external failures: registry, git and filesystem errors

use miette::Diagnostic;
use thiserror::Error;


/// Exit status for bad input (EX_DATAERR)
pub const EXIT_BAD_INPUT: i32 = 65;

/// Exit status for external failures that carry no status of their own
pub const EXIT_EXTERNAL_FAILURE: i32 = 1;

/// Main error type for terrafile operations
#[derive(Error, Diagnostic, Debug)]
pub enum TerrafileError {
    // Manifest errors
    #[error("Terrafile not found: {path}")]
    #[diagnostic(
        code(terrafile::manifest::not_found),
        help("Pass the Terrafile location, or a directory containing one, as the first argument")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to read Terrafile {path}: {reason}")]
    #[diagnostic(code(terrafile::manifest::read_failed))]
    ManifestReadFailed { path: String, reason: String },

    #[error("Failed to parse Terrafile {path}: {reason}")]
    #[diagnostic(
        code(terrafile::manifest::parse_failed),
        help("Each entry needs a 'source' and a 'version', and may set 'module_path'")
    )]
    ManifestParseFailed { path: String, reason: String },

    #[error("Terrafile {path} is empty")]
    #[diagnostic(code(terrafile::manifest::empty))]
    ManifestEmpty { path: String },

    // Validation errors
    #[error("Version '{version}' does not match the version format {pattern}")]
    #[diagnostic(
        code(terrafile::validation::version),
        help("Wildcard versions look like v1.+ or 2.3.+ ('+' matches any number)")
    )]
    InvalidVersionExpression { version: String, pattern: String },

    #[error("Invalid version prefix '{prefix}': {reason}")]
    #[diagnostic(code(terrafile::validation::version_prefix))]
    InvalidVersionPrefix { prefix: String, reason: String },

    #[error("Invalid source URL: {url}")]
    #[diagnostic(code(terrafile::validation::source_url))]
    InvalidSourceUrl { url: String },

    #[error("Refusing to pass '{value}' to git: {reason}")]
    #[diagnostic(code(terrafile::validation::unsafe_argument))]
    UnsafeArgument { value: String, reason: String },

    #[error("Cannot derive a target directory for '{name}' from '{source_path}'")]
    #[diagnostic(
        code(terrafile::validation::target),
        help("Set 'module_path' on the entry to choose the directory explicitly")
    )]
    TargetDerivationFailed { name: String, source_path: String },

    // Registry errors
    #[error("Registry request to {url} failed: {reason}")]
    #[diagnostic(code(terrafile::registry::request_failed))]
    RegistryRequestFailed { url: String, reason: String },

    #[error("Error looking up {url} in registry ({status}): {body}")]
    #[diagnostic(code(terrafile::registry::lookup_failed))]
    RegistryLookupFailed { url: String, status: u16, body: String },

    #[error("Registry returned an unsupported download location '{location}': {body}")]
    #[diagnostic(code(terrafile::registry::location_invalid))]
    RegistryLocationInvalid { location: String, body: String },

    // Version resolution errors
    #[error("Version {version} doesn't exist in {source_url}")]
    #[diagnostic(
        code(terrafile::version::not_found),
        help("List the available tags with: git ls-remote --tags <source>")
    )]
    VersionNotFound { version: String, source_url: String },

    // Source control errors
    #[error("git {operation} failed: {output}")]
    #[diagnostic(code(terrafile::git::command_failed))]
    GitCommandFailed {
        operation: String,
        status: Option<i32>,
        output: String,
    },

    #[error("Git operation failed: {message}")]
    #[diagnostic(code(terrafile::git::operation_failed))]
    GitOperationFailed { message: String },

    // File system errors
    #[error("Local module source not found: {path}")]
    #[diagnostic(
        code(terrafile::fs::source_not_found),
        help("Local sources are resolved relative to the Terrafile directory")
    )]
    LocalSourceNotFound { path: String },

    #[error("Failed to remove {path}: {reason}")]
    #[diagnostic(code(terrafile::fs::remove_failed))]
    RemoveFailed { path: String, reason: String },

    #[error("Failed to copy {from} to {to}: {reason}")]
    #[diagnostic(code(terrafile::fs::copy_failed))]
    CopyFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("IO error: {message}")]
    #[diagnostic(code(terrafile::fs::io_error))]
    IoError { message: String },

    // Entry context
    #[error("Module '{name}': {error}")]
    #[diagnostic(code(terrafile::module::failed))]
    ModuleFailed {
        name: String,
        #[source]
        error: Box<TerrafileError>,
    },
}

impl TerrafileError {
    /// Attach the manifest entry name to an error raised while processing it
    pub fn in_module(self, name: impl Into<String>) -> Self {
        TerrafileError::ModuleFailed {
            name: name.into(),
            error: Box::new(self),
        }
    }

    /// The error without entry context
    pub fn innermost(&self) -> &TerrafileError {
        match self {
            TerrafileError::ModuleFailed { error, .. } => error.innermost(),
            other => other,
        }
    }

    /// Whether the failure was caused by bad input rather than an external operation
    pub fn is_bad_input(&self) -> bool {
        match self {
            TerrafileError::ManifestNotFound { .. }
            | TerrafileError::ManifestReadFailed { .. }
            | TerrafileError::ManifestParseFailed { .. }
            | TerrafileError::ManifestEmpty { .. }
            | TerrafileError::InvalidVersionExpression { .. }
            | TerrafileError::InvalidVersionPrefix { .. }
            | TerrafileError::InvalidSourceUrl { .. }
            | TerrafileError::UnsafeArgument { .. }
            | TerrafileError::TargetDerivationFailed { .. } => true,
            TerrafileError::ModuleFailed { error, .. } => error.is_bad_input(),
            _ => false,
        }
    }

    /// Process exit status for this error
    ///
    /// Git failures propagate the subprocess status when it is known.
    pub fn exit_code(&self) -> i32 {
        match self {
            TerrafileError::ModuleFailed { error, .. } => error.exit_code(),
            TerrafileError::GitCommandFailed {
                status: Some(status),
                ..
            } if *status != 0 => *status,
            err if err.is_bad_input() => EXIT_BAD_INPUT,
            _ => EXIT_EXTERNAL_FAILURE,
        }
    }
}

impl From<std::io::Error> for TerrafileError {
    fn from(err: std::io::Error) -> Self {
        TerrafileError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<git2::Error> for TerrafileError {
    fn from(err: git2::Error) -> Self {
        TerrafileError::GitOperationFailed {
            message: err.message().to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, TerrafileError>;
