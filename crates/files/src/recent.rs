//! Bounded, deduplicated, most-recent-first list of document paths.

/// Maximum number of remembered paths.
pub const MAX_RECENT_FILES: usize = 10;

/// Recent documents, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentFiles {
	entries: Vec<String>,
}

impl From<Vec<String>> for RecentFiles {
	fn from(entries: Vec<String>) -> Self {
		Self { entries }
	}
}

impl RecentFiles {
	/// Moves `path` to the front, dropping duplicates and anything past the
	/// cap.
	pub fn add(&mut self, path: &str) {
		self.entries.insert(0, path.to_string());
		let mut seen = std::collections::HashSet::with_capacity(self.entries.len());
		self.entries.retain(|entry| seen.insert(entry.clone()));
		self.entries.truncate(MAX_RECENT_FILES);
	}

	/// Paths, most recent first.
	pub fn entries(&self) -> &[String] {
		&self.entries
	}

	/// Consumes the list for storing.
	pub fn into_vec(self) -> Vec<String> {
		self.entries
	}

	/// Number of remembered paths.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when nothing has been remembered yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
