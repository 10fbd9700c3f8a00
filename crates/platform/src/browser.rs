//! Browser host over a file-system-access style API.
//!
//! The browser never exposes real paths. A picked or saved file comes with an
//! opaque handle. Each handle gets a document key, its display name with a
//! `#n` suffix when another handle already took that name, so later saves
//! reuse it without a prompt and reads work for documents picked in this
//! session.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_files::{FileData, FileError, FileIoProvider, Result};
use tracing::{debug, trace};

/// Opaque reference to a user-granted file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(pub String);

/// A file picked through the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
	pub name: String,
	pub data: String,
	/// Absent when the browser only supports legacy uploads.
	pub handle: Option<FileHandle>,
}

/// Browser file API. `None` means the user cancelled.
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
	async fn open(&self, extensions: &[String]) -> Result<Option<PickedFile>>;

	/// Writes `data` through `existing`, or prompts for a new handle when `None`.
	async fn save(&self, data: &str, suggested_name: &str, existing: Option<&FileHandle>) -> Result<Option<FileHandle>>;

	/// Reads the current contents behind `handle`.
	async fn read(&self, handle: &FileHandle) -> Result<String>;

	/// Display name for `handle`.
	fn name(&self, handle: &FileHandle) -> String;
}

#[derive(Debug, Default)]
struct HandleCache {
	by_key: HashMap<String, FileHandle>,
	keys: HashMap<FileHandle, String>,
}

/// File provider for the browser host.
pub struct BrowserFiles<A> {
	access: A,
	suggested_name: String,
	extensions: Vec<String>,
	handles: Mutex<HandleCache>,
}

impl<A: FileSystemAccess> BrowserFiles<A> {
	pub fn new(access: A, suggested_name: impl Into<String>, extensions: Vec<String>) -> Self {
		Self {
			access,
			suggested_name: suggested_name.into(),
			extensions,
			handles: Mutex::default(),
		}
	}

	pub fn access(&self) -> &A {
		&self.access
	}

	fn remember(&self, handle: FileHandle) -> String {
		let mut cache = self.handles.lock();
		if let Some(key) = cache.keys.get(&handle) {
			return key.clone();
		}
		let name = self.access.name(&handle);
		let mut key = name.clone();
		let mut n = 1;
		while cache.by_key.contains_key(&key) {
			n += 1;
			key = format!("{name}#{n}");
		}
		trace!(%key, "caching file handle");
		cache.by_key.insert(key.clone(), handle.clone());
		cache.keys.insert(handle, key.clone());
		key
	}

	fn handle(&self, path: &str) -> Option<FileHandle> {
		self.handles.lock().by_key.get(path).cloned()
	}
}

#[async_trait]
impl<A: FileSystemAccess> FileIoProvider for BrowserFiles<A> {
	async fn open_file(&self) -> Result<Option<FileData>> {
		let Some(picked) = self.access.open(&self.extensions).await? else {
			return Ok(None);
		};
		let path = picked.handle.map(|handle| self.remember(handle));
		debug!(name = %picked.name, has_handle = path.is_some(), "picked file");
		Ok(Some(FileData {
			path,
			name: picked.name,
			data: picked.data,
		}))
	}

	async fn save_file(&self, data: &str, path: Option<&str>) -> Result<Option<String>> {
		let existing = path.and_then(|path| self.handle(path));
		let Some(handle) = self
			.access
			.save(data, &self.suggested_name, existing.as_ref())
			.await?
		else {
			return Ok(None);
		};
		Ok(Some(self.remember(handle)))
	}

	async fn read_file(&self, path: &str) -> Result<FileData> {
		let Some(handle) = self.handle(path) else {
			return Err(FileError::Unsupported("reading files not picked in this session"));
		};
		let data = self.access.read(&handle).await?;
		Ok(FileData {
			path: Some(path.to_string()),
			name: self.access.name(&handle),
			data,
		})
	}
}
