//! Mobile host over a native plugin bridge.
//!
//! Plugin methods take a JSON options object and resolve with a JSON object,
//! resolve empty when the user cancelled, or reject with a message.

use async_trait::async_trait;
use quill_files::data::display_name;
use quill_files::{DialogProvider, DialogResult, FileData, FileError, FileIoProvider, Result};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Call into the native side.
#[async_trait]
pub trait NativeBridge: Send + Sync {
	/// Invokes `method`. `Ok(None)` is an empty resolve, `Err` a rejection
	/// message.
	async fn call(&self, method: &str, options: Value) -> std::result::Result<Option<Value>, String>;
}

#[derive(Debug, Deserialize)]
struct FileMetadata {
	path: Option<String>,
	name: Option<String>,
	#[serde(default)]
	data: String,
}

#[derive(Debug, Deserialize)]
struct DialogAnswer {
	selected: String,
}

/// File provider backed by the native files plugin.
#[derive(Debug)]
pub struct MobileFiles<B> {
	bridge: B,
}

impl<B: NativeBridge> MobileFiles<B> {
	pub fn new(bridge: B) -> Self {
		Self { bridge }
	}

	pub fn bridge(&self) -> &B {
		&self.bridge
	}

	async fn invoke(&self, method: &str, options: Value) -> Result<Option<FileMetadata>> {
		let Some(reply) = self.bridge.call(method, options).await.map_err(FileError::Bridge)? else {
			debug!(method, "bridge call cancelled");
			return Ok(None);
		};
		serde_json::from_value(reply)
			.map(Some)
			.map_err(|e| FileError::Malformed(format!("{method}: {e}")))
	}
}

fn into_file_data(meta: FileMetadata) -> FileData {
	let name = meta
		.name
		.or_else(|| meta.path.as_deref().map(display_name))
		.unwrap_or_default();
	FileData {
		path: meta.path,
		name,
		data: meta.data,
	}
}

#[async_trait]
impl<B: NativeBridge> FileIoProvider for MobileFiles<B> {
	async fn open_file(&self) -> Result<Option<FileData>> {
		Ok(self.invoke("openFile", json!({})).await?.map(into_file_data))
	}

	async fn save_file(&self, data: &str, path: Option<&str>) -> Result<Option<String>> {
		let options = match path {
			Some(path) => json!({ "data": data, "path": path }),
			None => json!({ "data": data }),
		};
		match self.invoke("saveFile", options).await? {
			Some(FileMetadata { path: Some(path), .. }) => Ok(Some(path)),
			Some(_) => Err(FileError::Malformed("saveFile resolved without a path".into())),
			None => Ok(None),
		}
	}

	async fn read_file(&self, path: &str) -> Result<FileData> {
		match self.invoke("readFile", json!({ "path": path })).await? {
			Some(meta) => {
				let mut file = into_file_data(meta);
				file.path.get_or_insert_with(|| path.to_string());
				Ok(file)
			}
			None => Err(FileError::Bridge(format!("readFile resolved empty for {path}"))),
		}
	}
}

/// Confirmation dialogs through the native `showDialog` method.
#[derive(Debug)]
pub struct BridgeDialogs<B> {
	bridge: B,
}

impl<B: NativeBridge> BridgeDialogs<B> {
	pub fn new(bridge: B) -> Self {
		Self { bridge }
	}
}

#[async_trait]
impl<B: NativeBridge> DialogProvider for BridgeDialogs<B> {
	async fn show_dialog(&self, message: &str) -> DialogResult {
		match self.bridge.call("showDialog", json!({ "message": message })).await {
			Ok(Some(reply)) => match serde_json::from_value::<DialogAnswer>(reply) {
				Ok(answer) => DialogResult::from_label(&answer.selected),
				Err(err) => {
					warn!(error = %err, "malformed dialog answer");
					DialogResult::Cancelled
				}
			},
			Ok(None) => DialogResult::Cancelled,
			Err(err) => {
				warn!(error = %err, "dialog rejected");
				DialogResult::Cancelled
			}
		}
	}
}
