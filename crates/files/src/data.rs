//! Document and dialog value types.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// In-memory document content and its last known on-disk location.
///
/// `path == None` means the document has not been saved anywhere yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
	#[serde(default)]
	pub path: Option<String>,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub data: String,
}

impl FileData {
	/// Builds file data for a known location, naming it after the last path
	/// component.
	pub fn at_path(path: impl Into<String>, data: impl Into<String>) -> Self {
		let path = path.into();
		let name = display_name(&path);
		Self {
			path: Some(path),
			name,
			data: data.into(),
		}
	}

	/// Builds file data that has no location yet.
	pub fn unsaved(name: impl Into<String>, data: impl Into<String>) -> Self {
		Self {
			path: None,
			name: name.into(),
			data: data.into(),
		}
	}
}

/// Last component of `path`, or the whole string when it has none.
pub fn display_name(path: &str) -> String {
	Path::new(path)
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.to_string())
}

/// The document slot owned by the file manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CurrentFile {
	/// Untitled document.
	#[default]
	NoFile,
	/// Document backed by `path`.
	Open(String),
}

impl CurrentFile {
	/// Path of the open document, if any.
	pub fn path(&self) -> Option<&str> {
		match self {
			Self::NoFile => None,
			Self::Open(path) => Some(path),
		}
	}
}

/// Answer to a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
	Yes,
	No,
	/// Dismissed, or answered with something unrecognized.
	Cancelled,
}

impl DialogResult {
	/// Maps a host answer label. Anything unrecognized is `Cancelled`, never a
	/// destructive default.
	pub fn from_label(label: &str) -> Self {
		match label.trim().to_ascii_lowercase().as_str() {
			"yes" | "y" => Self::Yes,
			"no" | "n" => Self::No,
			_ => Self::Cancelled,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Yes => "yes",
			Self::No => "no",
			Self::Cancelled => "cancelled",
		}
	}
}
