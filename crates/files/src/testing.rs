//! Scripted providers and a renderer probe for exercising the file manager.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_bus::RendererEndpoint;
use quill_bus::channels::{
	EditorText, FileOpened, FileSaveEnded, IsOkayForNewFile, NewFileCreated, OpenedFile, RequestEditorText, SaveEnded,
};

use crate::data::{DialogResult, FileData};
use crate::error::{FileError, Result};
use crate::provider::{DialogProvider, FileIoProvider, RecentFilesStore};

type OpenScript = Box<dyn Fn() -> Result<Option<FileData>> + Send + Sync>;
type SaveScript = Box<dyn Fn(&str, Option<&str>) -> Result<Option<String>> + Send + Sync>;
type ReadScript = Box<dyn Fn(&str) -> Result<FileData> + Send + Sync>;

/// File provider whose answers are closures, recording every call.
///
/// Defaults: the picker is cancelled, saves return the target path unchanged,
/// direct reads are unsupported.
pub struct ScriptedFiles {
	open: Mutex<OpenScript>,
	save: Mutex<SaveScript>,
	read: Mutex<ReadScript>,
	calls: Mutex<FileCalls>,
}

/// Calls seen by [`ScriptedFiles`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCalls {
	pub opens: usize,
	/// `(data, target path)` per save.
	pub saves: Vec<(String, Option<String>)>,
	pub reads: Vec<String>,
}

impl Default for ScriptedFiles {
	fn default() -> Self {
		Self {
			open: Mutex::new(Box::new(|| Ok(None))),
			save: Mutex::new(Box::new(|_, path| Ok(path.map(str::to_string)))),
			read: Mutex::new(Box::new(|_| Err(FileError::Unsupported("direct reads")))),
			calls: Mutex::new(FileCalls::default()),
		}
	}
}

impl ScriptedFiles {
	pub fn new() -> Self {
		Self::default()
	}

	/// Picker always yields `file`.
	pub fn opening(self, file: FileData) -> Self {
		self.on_open(move || Ok(Some(file.clone())));
		self
	}

	/// Saves always report `path` as the written location.
	pub fn saving_to(self, path: &str) -> Self {
		let path = path.to_string();
		self.on_save(move |_, _| Ok(Some(path.clone())));
		self
	}

	pub fn on_open(&self, script: impl Fn() -> Result<Option<FileData>> + Send + Sync + 'static) {
		*self.open.lock() = Box::new(script);
	}

	pub fn on_save(&self, script: impl Fn(&str, Option<&str>) -> Result<Option<String>> + Send + Sync + 'static) {
		*self.save.lock() = Box::new(script);
	}

	pub fn on_read(&self, script: impl Fn(&str) -> Result<FileData> + Send + Sync + 'static) {
		*self.read.lock() = Box::new(script);
	}

	pub fn calls(&self) -> FileCalls {
		self.calls.lock().clone()
	}
}

#[async_trait]
impl FileIoProvider for ScriptedFiles {
	async fn open_file(&self) -> Result<Option<FileData>> {
		self.calls.lock().opens += 1;
		(self.open.lock())()
	}

	async fn save_file(&self, data: &str, path: Option<&str>) -> Result<Option<String>> {
		self.calls
			.lock()
			.saves
			.push((data.to_string(), path.map(str::to_string)));
		(self.save.lock())(data, path)
	}

	async fn read_file(&self, path: &str) -> Result<FileData> {
		self.calls.lock().reads.push(path.to_string());
		(self.read.lock())(path)
	}
}

/// Dialog provider with a fixed answer, recording every prompt.
#[derive(Debug)]
pub struct ScriptedDialogs {
	answer: Mutex<DialogResult>,
	prompts: Mutex<Vec<String>>,
}

impl ScriptedDialogs {
	pub fn answering(answer: DialogResult) -> Self {
		Self {
			answer: Mutex::new(answer),
			prompts: Mutex::new(Vec::new()),
		}
	}

	pub fn set_answer(&self, answer: DialogResult) {
		*self.answer.lock() = answer;
	}

	pub fn prompts(&self) -> Vec<String> {
		self.prompts.lock().clone()
	}
}

#[async_trait]
impl DialogProvider for ScriptedDialogs {
	async fn show_dialog(&self, message: &str) -> DialogResult {
		self.prompts.lock().push(message.to_string());
		*self.answer.lock()
	}
}

/// In-memory store recording every write.
#[derive(Debug, Default)]
pub struct RecordingRecentFiles {
	entries: Mutex<Vec<String>>,
	writes: Mutex<Vec<Vec<String>>>,
}

impl RecordingRecentFiles {
	pub fn with_entries(entries: &[&str]) -> Self {
		Self {
			entries: Mutex::new(entries.iter().map(|s| s.to_string()).collect()),
			writes: Mutex::new(Vec::new()),
		}
	}

	/// Every list passed to `set`, oldest first.
	pub fn writes(&self) -> Vec<Vec<String>> {
		self.writes.lock().clone()
	}
}

impl RecentFilesStore for RecordingRecentFiles {
	fn get(&self) -> Vec<String> {
		self.entries.lock().clone()
	}

	fn set(&self, files: &[String]) -> Result<()> {
		*self.entries.lock() = files.to_vec();
		self.writes.lock().push(files.to_vec());
		Ok(())
	}
}

/// Renderer-bound event as seen by [`RendererProbe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererEvent {
	IsOkayForNewFile,
	NewFileCreated,
	RequestEditorText,
	FileOpened(OpenedFile),
	FileSaveEnded(SaveEnded),
}

/// Stand-in renderer that records every platform message and can answer
/// editor text requests.
#[derive(Clone)]
pub struct RendererProbe {
	events: Arc<Mutex<Vec<RendererEvent>>>,
	reply: Arc<Mutex<Option<String>>>,
}

impl RendererProbe {
	/// Subscribes to every renderer-bound channel on `renderer`.
	pub fn attach(renderer: &RendererEndpoint) -> Self {
		let probe = Self {
			events: Arc::default(),
			reply: Arc::default(),
		};

		let events = Arc::clone(&probe.events);
		renderer.on::<IsOkayForNewFile>(move |_| events.lock().push(RendererEvent::IsOkayForNewFile));
		let events = Arc::clone(&probe.events);
		renderer.on::<NewFileCreated>(move |_| events.lock().push(RendererEvent::NewFileCreated));
		let events = Arc::clone(&probe.events);
		renderer.on::<FileOpened>(move |opened| events.lock().push(RendererEvent::FileOpened(opened.clone())));
		let events = Arc::clone(&probe.events);
		renderer.on::<FileSaveEnded>(move |ended| events.lock().push(RendererEvent::FileSaveEnded(ended.clone())));

		let events = Arc::clone(&probe.events);
		let reply = Arc::clone(&probe.reply);
		let endpoint = renderer.clone();
		renderer.on::<RequestEditorText>(move |_| {
			events.lock().push(RendererEvent::RequestEditorText);
			let text = reply.lock().clone();
			if let Some(text) = text {
				endpoint.send::<EditorText>(text);
			}
		});

		probe
	}

	/// Answers every editor text request with `text`.
	pub fn auto_reply(&self, text: impl Into<String>) {
		*self.reply.lock() = Some(text.into());
	}

	pub fn events(&self) -> Vec<RendererEvent> {
		self.events.lock().clone()
	}

	pub fn count(&self, event: impl Fn(&RendererEvent) -> bool) -> usize {
		self.events.lock().iter().filter(|e| event(e)).count()
	}

	/// `file-opened` payloads, in order.
	pub fn opened(&self) -> Vec<OpenedFile> {
		self.events
			.lock()
			.iter()
			.filter_map(|e| match e {
				RendererEvent::FileOpened(opened) => Some(opened.clone()),
				_ => None,
			})
			.collect()
	}

	/// `file-save-ended` payloads, in order.
	pub fn save_ends(&self) -> Vec<SaveEnded> {
		self.events
			.lock()
			.iter()
			.filter_map(|e| match e {
				RendererEvent::FileSaveEnded(ended) => Some(ended.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn clear(&self) {
		self.events.lock().clear();
	}
}
