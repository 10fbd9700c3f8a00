//! Host capabilities the file manager is written against.
//!
//! One implementation per host (desktop, browser, mobile). Every async method
//! may suspend; user cancellation resolves to `None` or
//! [`DialogResult::Cancelled`], never to an error.

use async_trait::async_trait;

use crate::data::{DialogResult, FileData};
use crate::error::Result;

/// Host file access.
#[async_trait]
pub trait FileIoProvider: Send + Sync {
	/// Lets the user pick a document. `Ok(None)` when the picker was cancelled.
	async fn open_file(&self) -> Result<Option<FileData>>;

	/// Persists `data`. A `path` overwrites directly; `None` asks the user for a
	/// destination. Returns the path written to, or `None` when cancelled.
	async fn save_file(&self, data: &str, path: Option<&str>) -> Result<Option<String>>;

	/// Reads `path` without any user-facing picker.
	async fn read_file(&self, path: &str) -> Result<FileData>;
}

/// Host confirmation dialogs.
#[async_trait]
pub trait DialogProvider: Send + Sync {
	/// Asks a yes/no question and waits for the answer.
	async fn show_dialog(&self, message: &str) -> DialogResult;
}

/// Persisted recent-files list.
///
/// Read-modify-write on every change; implementations hold no cache the
/// manager relies on.
pub trait RecentFilesStore: Send + Sync {
	/// Stored paths, most recent first. Unreadable storage yields an empty list.
	fn get(&self) -> Vec<String>;

	/// Replaces the stored paths.
	fn set(&self, files: &[String]) -> Result<()>;
}
