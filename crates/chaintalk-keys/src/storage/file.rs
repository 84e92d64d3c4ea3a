//! Raw file persistence.
//!
//! Byte-level read and write of a single named file. Reads fail with
//! [`KeystoreError::NotFound`] when the file is absent; writes go to a
//! uniquely named sibling temp file that is then renamed over the target,
//! so concurrent writers never share a temp file and readers never see a
//! partial write.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{KeystoreError, Result};

/// Permission bits requested for new files (before the process umask).
pub const FILE_MODE: u32 = 0o666;

/// True when `path` exists.
///
/// # Errors
///
/// Returns `KeystoreError::Io` when existence cannot be determined, for
/// example when a parent component is not a directory or is unreadable.
pub async fn exists(path: &Path) -> Result<bool> {
    Ok(tokio::fs::try_exists(path).await?)
}

/// Read the full contents of `path`.
///
/// # Errors
///
/// Returns `KeystoreError::NotFound` if the file does not exist at call
/// time, or `KeystoreError::Io` if the existence check or the read fails.
/// The check and the read are not atomic; see
/// [`KeystoreError::is_not_found`].
pub async fn read(path: &Path) -> Result<Vec<u8>> {
    if !exists(path).await? {
        return Err(KeystoreError::NotFound(path.to_path_buf()));
    }
    Ok(tokio::fs::read(path).await?)
}

/// Write `data` to `path`, replacing any existing file.
///
/// Creates the parent directory if it does not exist. The data goes to a
/// fresh temp file in the same directory, which is then renamed into place.
///
/// # Errors
///
/// Returns `KeystoreError::InvalidPath` if `path` is empty or names no
/// file, or `KeystoreError::Io` for filesystem errors.
pub async fn write(path: &Path, data: &[u8]) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(KeystoreError::InvalidPath("path is empty".to_string()));
    }
    let prefix = tmp_prefix_for(path)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent).await?;

    let target = path.to_path_buf();
    let bytes = data.to_vec();
    tokio::task::spawn_blocking(move || replace_file(&parent, &prefix, &target, &bytes))
        .await
        .map_err(|e| KeystoreError::Io(std::io::Error::other(e)))??;

    tracing::debug!(path = %path.display(), bytes = data.len(), "file written");
    Ok(())
}

fn replace_file(dir: &Path, prefix: &OsString, target: &Path, data: &[u8]) -> Result<()> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix).suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(FILE_MODE));
    }

    // The temp file is removed on drop if anything below fails.
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

fn tmp_prefix_for(path: &Path) -> Result<OsString> {
    let name = path.file_name().ok_or_else(|| {
        KeystoreError::InvalidPath(format!("{} does not name a file", path.display()))
    })?;
    let mut prefix = OsString::from(name);
    prefix.push(".");
    Ok(prefix)
}
