//! Module registry lookups
//!
//! The registry answers `GET {base}/{namespace}/{name}/{provider}/{version}/download`
//! with `204 No Content` and an `X-Terraform-Get` header naming the real
//! download location. That location is turned back into a cloneable git URL
//! and ref by [`location`].
//!
//! The HTTP exchange sits behind [`RegistryClient`] so the resolution logic
//! can be exercised without a network.

pub mod location;

use tracing::debug;

use crate::error::{Result, TerrafileError};
use crate::source::RegistryCoordinate;

/// Default public registry modules endpoint
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.terraform.io/v1/modules";

/// Header carrying the download location on a 204 response
pub const DOWNLOAD_HEADER: &str = "X-Terraform-Get";

/// Raw answer to a download lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResponse {
    pub status: u16,

    /// Value of the `X-Terraform-Get` header, if present
    pub location: Option<String>,

    pub body: String,
}

/// Transport for registry download lookups
pub trait RegistryClient {
    /// Issue the download lookup for `coordinate` at `version`
    ///
    /// Any HTTP status is returned as a [`DownloadResponse`]; only transport
    /// failures are errors.
    fn download(&self, coordinate: &RegistryCoordinate, version: &str) -> Result<DownloadResponse>;
}

/// Registry client over HTTP
#[derive(Clone)]
pub struct HttpRegistry {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Download lookup URL for a coordinate and version
    pub fn download_url(&self, coordinate: &RegistryCoordinate, version: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}/download",
            self.base_url, coordinate.namespace, coordinate.name, coordinate.provider, version
        )
    }
}

impl RegistryClient for HttpRegistry {
    fn download(&self, coordinate: &RegistryCoordinate, version: &str) -> Result<DownloadResponse> {
        let url = self.download_url(coordinate, version);
        debug!(%url, "registry download lookup");

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => {
                return Err(TerrafileError::RegistryRequestFailed {
                    url,
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status();
        let location = response.header(DOWNLOAD_HEADER).map(str::to_string);
        let body = response
            .into_string()
            .map_err(|e| TerrafileError::RegistryRequestFailed {
                url: url.clone(),
                reason: format!("failed to read response body: {e}"),
            })?;

        Ok(DownloadResponse {
            status,
            location,
            body,
        })
    }
}

/// Resolve a registry coordinate to a git URL and ref
///
/// Only a 204 carrying a recognised download location succeeds; every other
/// answer is an error that carries the response body.
pub fn resolve_from_registry(
    client: &dyn RegistryClient,
    coordinate: &RegistryCoordinate,
    version: &str,
) -> Result<(String, String)> {
    let response = client.download(coordinate, version)?;

    if response.status != 204 {
        return Err(TerrafileError::RegistryLookupFailed {
            url: coordinate.to_string(),
            status: response.status,
            body: response.body,
        });
    }

    let raw_location = response.location.unwrap_or_default();
    match location::parse_download_location(&raw_location) {
        Some(resolved) => {
            debug!(
                module = %coordinate,
                url = %resolved.url,
                git_ref = %resolved.git_ref,
                "registry resolved module"
            );
            Ok((resolved.url, resolved.git_ref))
        }
        None => Err(TerrafileError::RegistryLocationInvalid {
            location: raw_location,
            body: response.body,
        }),
    }
}
