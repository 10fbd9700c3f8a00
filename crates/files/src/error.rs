//! Error types for file providers and stores.

use thiserror::Error;

/// Failure reported by a host file provider or recent-files store.
#[derive(Debug, Error)]
pub enum FileError {
	/// Reading or writing the file system failed.
	#[error("I/O error on {path}: {source}")]
	Io {
		/// Path the operation targeted.
		path: String,
		/// The underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// File content is not valid UTF-8 text.
	#[error("{path} is not valid UTF-8 text")]
	Encoding {
		/// Path of the offending file.
		path: String,
	},

	/// The native bridge rejected the call.
	#[error("native bridge rejected the call: {0}")]
	Bridge(String),

	/// The host cannot perform this operation.
	#[error("not supported on this host: {0}")]
	Unsupported(&'static str),

	/// A host returned data that does not describe a file.
	#[error("malformed file data: {0}")]
	Malformed(String),
}

impl FileError {
	/// Wraps an I/O error with the path it happened on.
	pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}
}

/// Result type for file operations.
pub type Result<T> = std::result::Result<T, FileError>;
