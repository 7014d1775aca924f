//! File system operations behind a swappable port
//!
//! Materializing a module is a destructive overwrite: the target tree is
//! removed and recreated. [`Filesystem`] captures the few operations the sync
//! engine needs so it can be driven by an in-memory double in tests.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, TerrafileError};

/// File system operations used to materialize modules
pub trait Filesystem {
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a directory tree; succeeds when the path does not exist
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Recursively copy `from` into `to`, creating `to` and its parents
    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()>;
}

/// The real file system
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TerrafileError::RemoveFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()> {
        copy_dir_recursive(from, to).map_err(|e| TerrafileError::CopyFailed {
            from: from.display().to_string(),
            to: to.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Copy a directory recursively
///
/// Symlinks are followed, so the copy holds regular files and directories.
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2) -> io::Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    fs::create_dir_all(dst_ref)?;

    for entry in fs::read_dir(src_ref)? {
        let entry = entry?;
        let entry_path = entry.path();
        let dst_path = dst_ref.join(entry.file_name());

        if entry_path.is_dir() {
            copy_dir_recursive(&entry_path, &dst_path)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
        }
    }

    Ok(())
}
