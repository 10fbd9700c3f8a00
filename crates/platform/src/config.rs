//! Host configuration loaded from `config.toml`.
//!
//! ```toml
//! [files]
//! default_name = "Lyrics.txt"
//! extensions = ["txt"]
//!
//! [recent]
//! path = "/home/me/.local/share/quill/recent.json"
//!
//! [log]
//! dir = "/tmp/quill-logs"
//! ```
//!
//! Every key is optional. Unknown keys are ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Directory name under the platform config and data dirs.
pub const APP_DIR: &str = "quill";

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading the configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The file is not valid TOML or has values of the wrong type.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
	pub files: FilesConfig,
	pub recent: RecentConfig,
	pub log: LogConfig,
}

/// Picker defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
	/// Suggested name for a document saved for the first time.
	pub default_name: String,
	/// Extensions offered by pickers, without the leading dot.
	pub extensions: Vec<String>,
}

impl Default for FilesConfig {
	fn default() -> Self {
		Self {
			default_name: "Lyrics.txt".to_string(),
			extensions: vec!["txt".to_string()],
		}
	}
}

/// Recent-files storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecentConfig {
	/// JSON file holding the list. Defaults to `<data_dir>/quill/recent.json`.
	pub path: Option<PathBuf>,
}

impl RecentConfig {
	/// Configured path, else the platform default. `None` when the platform
	/// has no data directory.
	pub fn resolved_path(&self) -> Option<PathBuf> {
		self.path
			.clone()
			.or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR).join("recent.json")))
	}
}

/// Log output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
	/// Directory for log files. Logs go to stderr when unset.
	pub dir: Option<PathBuf>,
}

impl QuillConfig {
	/// Default location, `<config_dir>/quill/config.toml`.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
	}

	/// Loads `path`, or the default location when `None`.
	///
	/// A missing file yields the defaults.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let path = match path {
			Some(path) => path.to_path_buf(),
			None => match Self::default_path() {
				Some(path) => path,
				None => {
					tracing::debug!("no config directory, using defaults");
					return Ok(Self::default());
				}
			},
		};
		Self::from_path(&path)
	}

	/// Loads `path`. A missing file yields the defaults.
	pub fn from_path(path: &Path) -> Result<Self> {
		match std::fs::read_to_string(path) {
			Ok(contents) => {
				let config = Self::parse(&contents)?;
				tracing::debug!(path = %path.display(), "loaded config");
				Ok(config)
			}
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "config not found, using defaults");
				Ok(Self::default())
			}
			Err(error) => Err(ConfigError::Io {
				path: path.to_path_buf(),
				error,
			}),
		}
	}

	/// Parses TOML text.
	pub fn parse(contents: &str) -> Result<Self> {
		Ok(toml::from_str(contents)?)
	}
}
