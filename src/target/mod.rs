//! Reading and committing the target file.
//!
//! This module handles:
//! - Reading the target under an exclusive lock
//! - Atomic writes (tempfile in the same directory, fsync, rename)

use crate::error::{Result, RewriteError};
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Read the whole target file as UTF-8 while holding an exclusive lock.
///
/// The lock is released before this returns; no lock is held while rules run.
pub fn read_target(path: &Path) -> Result<String> {
	let file = File::open(path).map_err(|source| open_error(path, source))?;
	let read_error = |source| RewriteError::FileRead {
		path: path.to_path_buf(),
		source,
	};

	file.lock().map_err(read_error)?;
	let mut content = String::new();
	(&file).read_to_string(&mut content).map_err(read_error)?;

	Ok(content)
}

fn open_error(path: &Path, source: std::io::Error) -> RewriteError {
	match source.kind() {
		ErrorKind::NotFound => RewriteError::FileNotFound {
			path: path.to_path_buf(),
		},
		ErrorKind::PermissionDenied => RewriteError::FileAccessDenied {
			path: path.to_path_buf(),
			source,
		},
		_ => RewriteError::FileRead {
			path: path.to_path_buf(),
			source,
		},
	}
}

/// Replace the target's contents atomically.
pub fn write_target(path: &Path, contents: &str) -> Result<()> {
	write_target_with(path, contents, |temp, dest| {
		temp.persist(dest).map(drop).map_err(|e| e.error)
	})
}

/// Write `contents` to a temporary file next to `path`, then hand it to
/// `commit` to move it into place.
///
/// If anything fails before `commit` succeeds, the temporary file is removed
/// and `path` keeps its previous contents.
pub fn write_target_with<F>(path: &Path, contents: &str, commit: F) -> Result<()>
where
	F: FnOnce(NamedTempFile, &Path) -> std::io::Result<()>,
{
	let write_error = |source| RewriteError::WriteFailure {
		path: path.to_path_buf(),
		source,
	};

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
	temp.write_all(contents.as_bytes()).map_err(write_error)?;
	temp.as_file().sync_all().map_err(write_error)?;

	// The temp file is created 0600; keep the target's mode.
	if let Ok(metadata) = fs::metadata(path) {
		fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_error)?;
	}

	commit(temp, path).map_err(write_error)?;
	log::info!("wrote {} ({} bytes)", path.display(), contents.len());

	Ok(())
}
