//! Headless renderer: the editor side of the bus without a UI.

use std::sync::Arc;

use parking_lot::Mutex;
use quill_bus::RendererEndpoint;
use quill_bus::channels::{
	EditorText, FileOpened, FileSaveEnded, IsOkayForNewFile, NewFileAttempt, NewFileCreated, OkayForNewFile,
	OpenFileAttempt, PromptSaveFileForNew, PromptSaveFileForOpen, ReadyForEvents, RequestEditorText,
};
use tracing::debug;

/// Editor buffer as the renderer sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
	pub text: String,
	pub dirty: bool,
	pub path: Option<String>,
}

/// Holds the document text and answers platform questions about it.
#[derive(Clone)]
pub struct HeadlessRenderer {
	endpoint: RendererEndpoint,
	state: Arc<Mutex<EditorState>>,
}

impl HeadlessRenderer {
	/// Subscribes to every platform message.
	pub fn attach(endpoint: RendererEndpoint) -> Self {
		let renderer = Self {
			endpoint,
			state: Arc::default(),
		};

		let this = renderer.clone();
		renderer.endpoint.on::<IsOkayForNewFile>(move |_| {
			if this.state.lock().dirty {
				this.endpoint.send::<PromptSaveFileForNew>(());
			} else {
				this.endpoint.send::<OkayForNewFile>(());
			}
		});

		let this = renderer.clone();
		renderer.endpoint.on::<NewFileCreated>(move |_| {
			*this.state.lock() = EditorState::default();
			println!("new file");
		});

		let this = renderer.clone();
		renderer.endpoint.on::<FileOpened>(move |opened| {
			if let Some(error) = &opened.error {
				println!("could not open file: {error}");
				return;
			}
			let mut state = this.state.lock();
			state.text = opened.data.clone().unwrap_or_default();
			state.dirty = false;
			state.path = opened.path.clone();
			println!("opened {}", opened.path.as_deref().unwrap_or("untitled"));
		});

		let this = renderer.clone();
		renderer.endpoint.on::<RequestEditorText>(move |_| {
			let text = this.state.lock().text.clone();
			debug!(len = text.len(), "answering editor text request");
			this.endpoint.send::<EditorText>(text);
		});

		renderer.endpoint.on::<FileSaveEnded>(|ended| match &ended.error {
			Some(error) => println!("save failed: {error}"),
			None => debug!(path = ?ended.path, "save ended"),
		});

		renderer
	}

	/// Announces that the renderer is subscribed.
	pub fn ready(&self) {
		self.endpoint.send::<ReadyForEvents>(());
	}

	pub fn new_file(&self) {
		self.endpoint.send::<NewFileAttempt>(());
	}

	/// Opens `path` (or picks one), confirming first when there are unsaved
	/// changes.
	pub fn open(&self, path: Option<String>) {
		if self.state.lock().dirty {
			self.endpoint.send::<PromptSaveFileForOpen>(path.into());
		} else {
			self.endpoint.send::<OpenFileAttempt>(path);
		}
	}

	/// Appends a line and marks the buffer dirty.
	pub fn write_line(&self, line: &str) {
		let mut state = self.state.lock();
		if !state.text.is_empty() && !state.text.ends_with('\n') {
			state.text.push('\n');
		}
		state.text.push_str(line);
		state.dirty = true;
	}

	pub fn state(&self) -> EditorState {
		self.state.lock().clone()
	}
}
