//! Recent-files stores.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use quill_files::{FileError, RecentFilesStore, Result};
use tracing::warn;

/// Recent files persisted as a JSON array of paths.
///
/// A missing or empty file reads as an empty list. A malformed file is logged
/// and also reads as empty; the next write replaces it.
#[derive(Debug, Clone)]
pub struct JsonRecentFiles {
	path: PathBuf,
}

impl JsonRecentFiles {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl RecentFilesStore for JsonRecentFiles {
	fn get(&self) -> Vec<String> {
		let contents = match std::fs::read_to_string(&self.path) {
			Ok(contents) => contents,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
			Err(err) => {
				warn!(path = %self.path.display(), error = %err, "failed to read recent files");
				return Vec::new();
			}
		};
		if contents.trim().is_empty() {
			return Vec::new();
		}
		serde_json::from_str(&contents).unwrap_or_else(|err| {
			warn!(path = %self.path.display(), error = %err, "ignoring malformed recent files");
			Vec::new()
		})
	}

	fn set(&self, files: &[String]) -> Result<()> {
		let path = self.path.display().to_string();
		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			std::fs::create_dir_all(parent).map_err(|e| FileError::io(&path, e))?;
		}
		let json = serde_json::to_string(files).map_err(|e| FileError::Malformed(e.to_string()))?;
		std::fs::write(&self.path, json).map_err(|e| FileError::io(path, e))
	}
}

/// Recent files kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryRecentFiles {
	files: Mutex<Vec<String>>,
}

impl MemoryRecentFiles {
	pub fn new() -> Self {
		Self::default()
	}
}

impl RecentFilesStore for MemoryRecentFiles {
	fn get(&self) -> Vec<String> {
		self.files.lock().clone()
	}

	fn set(&self, files: &[String]) -> Result<()> {
		*self.files.lock() = files.to_vec();
		Ok(())
	}
}
