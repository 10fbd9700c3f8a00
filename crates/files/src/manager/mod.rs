//! File lifecycle coordinator.
//!
//! # Flows
//!
//! ```text
//! new:  new-file-attempt ─► is-okay-for-new-file ─┬─► okay-for-new-file ─────────────► reset
//!                                                 └─► prompt-save-file-for-new ─► dialog ─(yes)─► reset
//! open: open-file-attempt(path?) ─► read_file(path) | open_file() ─► file-opened + recents
//! save: request-editor-text ─► editor-text ─► save_file(text, path?) ─► [file-opened + recents] ─► file-save-ended
//! ```
//!
//! The manager is the only writer of the current document slot and of the
//! recent-files store. Open, save and confirmed resets run one at a time
//! behind an async gate, so a second save waits until the first save's reply
//! listener is consumed and removed.
//!
//! There is no timeout on the editor text reply. A renderer that never
//! answers keeps the gate held and later operations queue behind it.

mod reply;

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use quill_bus::channels::{
	FileOpened, FileSaveEnded, IsOkayForNewFile, NewFileAttempt, NewFileCreated, OkayForNewFile, OpenFileAttempt, OpenRequest,
	OpenedFile, PromptSaveFileForNew, PromptSaveFileForOpen, ReadyForEvents, RequestEditorText, SaveEnded, SaveFileAttempt, SaveRequest,
};
use quill_bus::{Channel, PayloadError, Platform, PlatformEndpoint};
use tracing::{debug, info, warn};

use self::reply::{PendingReply, ReplySlot};
use crate::data::{CurrentFile, DialogResult, FileData, display_name};
use crate::provider::{DialogProvider, FileIoProvider, RecentFilesStore};
use crate::recent::RecentFiles;
use crate::tasks::IntentTasks;

/// Confirmation shown before discarding unsaved changes for a new file.
pub const NEW_FILE_PROMPT: &str = "Your changes haven't been saved. Are you sure you want to create a new file?";

/// Confirmation shown before discarding unsaved changes to open a file.
pub const OPEN_FILE_PROMPT: &str = "Your changes haven't been saved. Are you sure you want to open a file?";

type FileChangedListener = Arc<dyn Fn(Option<&str>, &[String]) + Send + Sync>;

/// Coordinator for new/open/save over the event bus.
///
/// Cloning is cheap; clones share one document slot.
#[derive(Clone)]
pub struct FileManager {
	inner: Arc<Inner>,
}

struct Inner {
	platform: PlatformEndpoint,
	files: Arc<dyn FileIoProvider>,
	dialogs: Arc<dyn DialogProvider>,
	recent: Arc<dyn RecentFilesStore>,
	current: Mutex<CurrentFile>,
	pending_reply: ReplySlot,
	file_changed: Mutex<Vec<FileChangedListener>>,
	gate: tokio::sync::Mutex<()>,
	tasks: IntentTasks,
	registered: AtomicBool,
}

impl fmt::Debug for FileManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FileManager")
			.field("current", &*self.inner.current.lock())
			.field("pending_reply", &*self.inner.pending_reply.lock())
			.field("tasks", &self.inner.tasks.len())
			.finish_non_exhaustive()
	}
}

impl FileManager {
	/// Creates a manager with an untitled document.
	pub fn new(
		platform: PlatformEndpoint,
		files: Arc<dyn FileIoProvider>,
		dialogs: Arc<dyn DialogProvider>,
		recent: Arc<dyn RecentFilesStore>,
	) -> Self {
		Self {
			inner: Arc::new(Inner {
				platform,
				files,
				dialogs,
				recent,
				current: Mutex::new(CurrentFile::NoFile),
				pending_reply: ReplySlot::default(),
				file_changed: Mutex::new(Vec::new()),
				gate: tokio::sync::Mutex::new(()),
				tasks: IntentTasks::default(),
				registered: AtomicBool::new(false),
			}),
		}
	}

	/// Subscribes to every renderer intent. Call once.
	pub fn register(&self) {
		if self.inner.registered.swap(true, Ordering::AcqRel) {
			warn!("file manager registered twice, ignoring");
			return;
		}

		self.listen::<ReadyForEvents, _, _>(|manager, ()| async move { manager.reset_document().await });
		self.listen::<OkayForNewFile, _, _>(|manager, ()| async move { manager.reset_document().await });
		self.listen::<PromptSaveFileForNew, _, _>(|manager, ()| async move { manager.confirm_new_file().await });
		self.listen::<PromptSaveFileForOpen, _, _>(|manager, request| async move { manager.confirm_open_file(request).await });
		self.listen::<OpenFileAttempt, _, _>(|manager, hint| async move { manager.open_file(hint).await });
		self.listen::<SaveFileAttempt, _, _>(|manager, request| async move { manager.save_text(request).await });

		let weak = self.downgrade();
		self.inner.platform.on::<NewFileAttempt>(move |_| {
			if let Some(manager) = Self::upgrade(&weak) {
				manager.on_new_file();
			}
		});
	}

	/// Adds an observer called with `(current path, recent files)` after every
	/// successful new/open/save, in registration order.
	pub fn add_on_file_changed_listener(&self, listener: impl Fn(Option<&str>, &[String]) + Send + Sync + 'static) {
		self.inner.file_changed.lock().push(Arc::new(listener));
	}

	/// Current document slot.
	pub fn current_file(&self) -> CurrentFile {
		self.inner.current.lock().clone()
	}

	/// Path of the current document, if it has one.
	pub fn current_path(&self) -> Option<String> {
		self.inner.current.lock().path().map(str::to_string)
	}

	/// Recent files as stored.
	pub fn recent_files(&self) -> Vec<String> {
		self.inner.recent.get()
	}

	/// Asks the renderer whether its content may be discarded.
	///
	/// The manager has no notion of unsaved changes; the renderer answers with
	/// `okay-for-new-file` or `prompt-save-file-for-new`.
	pub fn on_new_file(&self) {
		debug!("new file requested");
		self.inner.platform.send::<IsOkayForNewFile>(());
	}

	/// Resets to an untitled document without asking.
	pub async fn reset_document(&self) {
		let _gate = self.inner.gate.lock().await;
		self.reset_locked();
	}

	/// Confirms with the user, then resets on `yes`.
	pub async fn confirm_new_file(&self) {
		let _gate = self.inner.gate.lock().await;
		match self.inner.dialogs.show_dialog(NEW_FILE_PROMPT).await {
			DialogResult::Yes => self.reset_locked(),
			answer => debug!(answer = answer.as_str(), "new file declined"),
		}
	}

	/// Confirms with the user, then opens on `yes`.
	///
	/// Contents carried by `request` are opened without touching the host.
	pub async fn confirm_open_file(&self, request: OpenRequest) {
		let _gate = self.inner.gate.lock().await;
		match self.inner.dialogs.show_dialog(OPEN_FILE_PROMPT).await {
			DialogResult::Yes => match request {
				OpenRequest {
					path,
					data: Some(data),
				} => {
					let name = path.as_deref().map(display_name).unwrap_or_default();
					self.apply_opened(FileData { path, name, data }, None);
				}
				OpenRequest { path, data: None } => self.open_locked(path).await,
			},
			answer => debug!(answer = answer.as_str(), "open file declined"),
		}
	}

	/// Opens `path_hint` directly, or through the host picker when `None`.
	///
	/// A cancelled picker changes nothing and emits nothing. Failures are
	/// reported on `file-opened`.
	pub async fn open_file(&self, path_hint: Option<String>) {
		let _gate = self.inner.gate.lock().await;
		self.open_locked(path_hint).await;
	}

	/// Fetches the live editor text from the renderer and persists it.
	///
	/// `force_save_as` ignores the current path so the host asks for a
	/// destination.
	pub async fn save_file(&self, force_save_as: bool) {
		let _gate = self.inner.gate.lock().await;
		let reply = PendingReply::register(&self.inner.platform, &self.inner.pending_reply);
		self.inner.platform.send::<RequestEditorText>(());

		let Some(text) = reply.wait().await else {
			warn!("editor text request dropped before a reply");
			self.inner.platform.send::<FileSaveEnded>(SaveEnded {
				error: Some(PayloadError::new("editor text request was dropped")),
				path: self.current_path(),
			});
			return;
		};

		let target = if force_save_as { None } else { self.current_path() };
		self.persist_locked(text, target).await;
	}

	/// Persists text the renderer already sent along with its intent.
	pub async fn save_text(&self, request: SaveRequest) {
		let _gate = self.inner.gate.lock().await;
		let target = if request.force_save_as { None } else { self.current_path() };
		self.persist_locked(request.text, target).await;
	}

	/// Fire-and-forget [`Self::save_file`] for synchronous callers such as menu
	/// handlers.
	pub fn request_save(&self, force_save_as: bool) {
		let manager = self.clone();
		self.inner.tasks.spawn("save-file", async move { manager.save_file(force_save_as).await });
	}

	/// Fire-and-forget [`Self::open_file`].
	pub fn request_open(&self, path_hint: Option<String>) {
		let manager = self.clone();
		self.inner.tasks.spawn("open-file", async move { manager.open_file(path_hint).await });
	}

	/// Waits until every intent started from the bus or a `request_*` call
	/// has finished.
	pub async fn settle(&self) {
		self.inner.tasks.settle().await;
	}

	fn listen<C, F, Fut>(&self, handler: F)
	where
		C: Channel<Target = Platform>,
		C::Payload: Clone,
		F: Fn(FileManager, C::Payload) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = ()> + Send + 'static,
	{
		let weak = self.downgrade();
		self.inner.platform.on::<C>(move |payload| {
			let Some(manager) = Self::upgrade(&weak) else {
				return;
			};
			let fut = handler(manager.clone(), payload.clone());
			manager.inner.tasks.spawn(C::NAME, fut);
		});
	}

	fn downgrade(&self) -> Weak<Inner> {
		Arc::downgrade(&self.inner)
	}

	fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
		weak.upgrade().map(|inner| Self { inner })
	}

	fn reset_locked(&self) {
		*self.inner.current.lock() = CurrentFile::NoFile;
		let recent = self.inner.recent.get();
		self.notify_file_changed(None, &recent);
		self.inner.platform.send::<NewFileCreated>(());
		info!("new file created");
	}

	async fn open_locked(&self, path_hint: Option<String>) {
		let result = match path_hint.as_deref() {
			Some(path) => self.inner.files.read_file(path).await.map(Some),
			None => self.inner.files.open_file().await,
		};

		match result {
			Ok(Some(file)) => self.apply_opened(file, path_hint),
			Ok(None) => debug!("open cancelled"),
			Err(err) => {
				warn!(path = ?path_hint, error = %err, "open failed");
				self.inner
					.platform
					.send::<FileOpened>(OpenedFile::failed(PayloadError::from_error(&err)));
			}
		}
	}

	fn apply_opened(&self, file: FileData, path_hint: Option<String>) {
		let Some(path) = file.path.or(path_hint) else {
			// Content without a location stays untitled and is not remembered.
			*self.inner.current.lock() = CurrentFile::NoFile;
			self.inner.platform.send::<FileOpened>(OpenedFile::ok(None, file.data));
			return;
		};

		info!(%path, "file opened");
		*self.inner.current.lock() = CurrentFile::Open(path.clone());
		self.inner
			.platform
			.send::<FileOpened>(OpenedFile::ok(Some(path.clone()), file.data));
		let recent = self.remember(&path);
		self.notify_file_changed(Some(&path), &recent);
	}

	async fn persist_locked(&self, text: String, target: Option<String>) {
		let error = match self.inner.files.save_file(&text, target.as_deref()).await {
			Ok(Some(path)) => {
				info!(%path, "file saved");
				*self.inner.current.lock() = CurrentFile::Open(path.clone());
				self.inner.platform.send::<FileOpened>(OpenedFile::ok(Some(path.clone()), text));
				let recent = self.remember(&path);
				self.notify_file_changed(Some(&path), &recent);
				None
			}
			Ok(None) => {
				debug!("save cancelled");
				None
			}
			Err(err) => {
				warn!(path = ?target, error = %err, "save failed");
				Some(PayloadError::from_error(&err))
			}
		};

		self.inner.platform.send::<FileSaveEnded>(SaveEnded {
			error,
			path: self.current_path(),
		});
	}

	/// Read-modify-write of the recent list with `path` at the front.
	fn remember(&self, path: &str) -> Vec<String> {
		let mut recent = RecentFiles::from(self.inner.recent.get());
		recent.add(path);
		let recent = recent.into_vec();
		if let Err(err) = self.inner.recent.set(&recent) {
			warn!(error = %err, "failed to persist recent files");
		}
		recent
	}

	fn notify_file_changed(&self, path: Option<&str>, recent: &[String]) {
		let listeners = self.inner.file_changed.lock().clone();
		for listener in listeners {
			listener(path, recent);
		}
	}
}

#[cfg(test)]
mod tests;
