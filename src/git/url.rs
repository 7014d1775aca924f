//! Repository URL helpers

use crate::error::{Result, TerrafileError};

/// Repository name from a URL or path: the last segment, without `.git`
///
/// `https://github.com/acme/terraform-aws-vpc.git` gives `terraform-aws-vpc`.
pub fn repo_name_from_url(url: &str) -> Result<String> {
    let suffix_index = url.rfind(".git").unwrap_or(url.len());
    let slash_index = url[..suffix_index].rfind('/');

    match slash_index {
        Some(slash) if slash + 1 < suffix_index => Ok(url[slash + 1..suffix_index].to_string()),
        _ => Err(TerrafileError::InvalidSourceUrl {
            url: url.to_string(),
        }),
    }
}
