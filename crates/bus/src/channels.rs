//! Channel contracts shared by the platform and the renderer.
//!
//! Renderer → platform (intents):
//! * [`ReadyForEvents`], [`NewFileAttempt`], [`OkayForNewFile`],
//!   [`PromptSaveFileForNew`], [`PromptSaveFileForOpen`],
//!   [`OpenFileAttempt`], [`SaveFileAttempt`], [`EditorText`]
//!
//! Platform → renderer (questions and results):
//! * [`IsOkayForNewFile`], [`NewFileCreated`], [`FileOpened`],
//!   [`RequestEditorText`], [`FileSaveEnded`]

use std::error::Error as StdError;

use crate::channel::{Channel, Platform, Renderer};
use crate::error::PayloadError;

crate::declare_channels! {
	/// Renderer finished subscribing; the platform may push initial state.
	ReadyForEvents => "ready-for-events", Platform, ();
	/// Request to discard the current document and start fresh.
	NewFileAttempt => "new-file-attempt", Platform, ();
	/// Renderer confirms discarding its content is safe.
	OkayForNewFile => "okay-for-new-file", Platform, ();
	/// Renderer holds unsaved changes; ask the user before a new file.
	PromptSaveFileForNew => "prompt-save-file-for-new", Platform, ();
	/// Renderer holds unsaved changes; ask the user before opening. Carries
	/// what to open once confirmed.
	PromptSaveFileForOpen => "prompt-save-file-for-open", Platform, OpenRequest;
	/// Request to open a document, directly by path or through a picker.
	OpenFileAttempt => "open-file-attempt", Platform, Option<String>;
	/// Request to persist the given text.
	SaveFileAttempt => "save-file-attempt", Platform, SaveRequest;
	/// One-shot reply carrying the live editor text.
	EditorText => "editor-text", Platform, String;

	/// Ask the renderer whether discarding its content is safe.
	IsOkayForNewFile => "is-okay-for-new-file", Renderer, ();
	/// The document was reset to an untitled one.
	NewFileCreated => "new-file-created", Renderer, ();
	/// One-shot request for the live editor text.
	RequestEditorText => "request-editor-text", Renderer, ();
}

/// Payload of [`SaveFileAttempt`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveRequest {
	/// Text to persist.
	pub text: String,
	/// Ask for a destination even when the document already has a path.
	pub force_save_as: bool,
}

impl SaveRequest {
	/// Plain save of `text` to the current document.
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			force_save_as: false,
		}
	}

	/// Save of `text` to a freshly chosen destination.
	pub fn save_as(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			force_save_as: true,
		}
	}
}

/// Payload of [`PromptSaveFileForOpen`].
///
/// A file dropped onto the renderer arrives with its contents, which are
/// opened as-is. Otherwise `path` is read, or the picker is shown when there
/// is no path either.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenRequest {
	pub path: Option<String>,
	pub data: Option<String>,
}

impl OpenRequest {
	/// Contents already in hand, e.g. from a drop.
	pub fn dropped(path: impl Into<String>, data: impl Into<String>) -> Self {
		Self {
			path: Some(path.into()),
			data: Some(data.into()),
		}
	}
}

impl From<Option<String>> for OpenRequest {
	fn from(path: Option<String>) -> Self {
		Self { path, data: None }
	}
}

/// Result of an open, or of a save that changed the document path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenedFile {
	pub error: Option<PayloadError>,
	pub path: Option<String>,
	pub data: Option<String>,
}

impl OpenedFile {
	/// Successful result.
	pub fn ok(path: Option<String>, data: impl Into<String>) -> Self {
		Self {
			error: None,
			path,
			data: Some(data.into()),
		}
	}

	/// Failed open; no path or data.
	pub fn failed(error: PayloadError) -> Self {
		Self {
			error: Some(error),
			path: None,
			data: None,
		}
	}
}

/// Terminal result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveEnded {
	pub error: Option<PayloadError>,
	/// Document path after the save, if any.
	pub path: Option<String>,
}

/// Result of an open, or of a save that changed the document path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOpened;

impl Channel for FileOpened {
	const NAME: &'static str = "file-opened";
	type Target = Renderer;
	type Payload = OpenedFile;

	fn error(payload: &OpenedFile) -> Option<&(dyn StdError + 'static)> {
		payload.error.as_ref().map(|e| e as &(dyn StdError + 'static))
	}
}

/// Terminal save result, sent after every save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSaveEnded;

impl Channel for FileSaveEnded {
	const NAME: &'static str = "file-save-ended";
	type Target = Renderer;
	type Payload = SaveEnded;

	fn error(payload: &SaveEnded) -> Option<&(dyn StdError + 'static)> {
		payload.error.as_ref().map(|e| e as &(dyn StdError + 'static))
	}
}
