//! Tags pointing at a checkout

use std::path::Path;

use git2::Repository;

use crate::error::Result;

/// Names of the tags whose target commit is the current HEAD of `dir`
///
/// Annotated and lightweight tags are both peeled to their commit.
pub fn tags_pointing_at_head(dir: &Path) -> Result<Vec<String>> {
    let repo = Repository::open(dir)?;
    let head = repo.head()?.peel_to_commit()?.id();

    let names = repo.tag_names(None)?;
    let mut tags: Vec<String> = names
        .iter()
        .flatten()
        .filter(|name| {
            repo.find_reference(&format!("refs/tags/{name}"))
                .and_then(|reference| reference.peel_to_commit())
                .is_ok_and(|commit| commit.id() == head)
        })
        .map(str::to_string)
        .collect();

    tags.sort();
    Ok(tags)
}
