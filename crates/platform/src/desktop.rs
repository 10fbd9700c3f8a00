//! Desktop host: direct file system access behind a native picker.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quill_files::data::display_name;
use quill_files::{FileData, FileError, FileIoProvider, Result};
use tracing::debug;

use crate::config::FilesConfig;

/// Named group of extensions offered by a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
	pub name: String,
	/// Extensions without the leading dot.
	pub extensions: Vec<String>,
}

impl FileFilter {
	pub fn new(name: impl Into<String>, extensions: Vec<String>) -> Self {
		Self {
			name: name.into(),
			extensions,
		}
	}

	/// Whether `path` has one of this filter's extensions.
	pub fn matches(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
	}
}

/// Native open/save dialogs. `None` means the user cancelled.
#[async_trait]
pub trait FilePicker: Send + Sync {
	async fn pick_open(&self, filters: &[FileFilter]) -> Option<PathBuf>;

	async fn pick_save(&self, default_name: &str, filters: &[FileFilter]) -> Option<PathBuf>;
}

/// File provider reading and writing the local file system.
#[derive(Debug)]
pub struct DesktopFiles<P> {
	picker: P,
	default_name: String,
	filters: Vec<FileFilter>,
}

impl<P: FilePicker> DesktopFiles<P> {
	pub fn new(picker: P, config: &FilesConfig) -> Self {
		Self {
			picker,
			default_name: config.default_name.clone(),
			filters: vec![FileFilter::new("Text Files", config.extensions.clone())],
		}
	}

	pub fn picker(&self) -> &P {
		&self.picker
	}

	async fn read_path(&self, path: &Path) -> Result<FileData> {
		let shown = path.display().to_string();
		let bytes = tokio::fs::read(path).await.map_err(|e| FileError::io(&shown, e))?;
		let data = String::from_utf8(bytes).map_err(|_| FileError::Encoding { path: shown.clone() })?;
		debug!(path = %shown, len = data.len(), "read file");
		Ok(FileData {
			name: display_name(&shown),
			path: Some(shown),
			data,
		})
	}
}

#[async_trait]
impl<P: FilePicker> FileIoProvider for DesktopFiles<P> {
	async fn open_file(&self) -> Result<Option<FileData>> {
		let Some(path) = self.picker.pick_open(&self.filters).await else {
			return Ok(None);
		};
		self.read_path(&path).await.map(Some)
	}

	async fn save_file(&self, data: &str, path: Option<&str>) -> Result<Option<String>> {
		let target = match path {
			Some(path) => PathBuf::from(path),
			None => match self.picker.pick_save(&self.default_name, &self.filters).await {
				Some(path) => path,
				None => return Ok(None),
			},
		};
		let shown = target.display().to_string();

		if let Some(parent) = target.parent()
			&& !parent.as_os_str().is_empty()
		{
			tokio::fs::create_dir_all(parent)
				.await
				.map_err(|e| FileError::io(&shown, e))?;
		}
		tokio::fs::write(&target, data)
			.await
			.map_err(|e| FileError::io(&shown, e))?;

		debug!(path = %shown, len = data.len(), "wrote file");
		Ok(Some(shown))
	}

	async fn read_file(&self, path: &str) -> Result<FileData> {
		self.read_path(Path::new(path)).await
	}
}
