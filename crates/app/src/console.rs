//! Terminal-backed picker and dialogs sharing one stdin reader.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use quill_files::{DialogProvider, DialogResult};
use quill_platform::{FileFilter, FilePicker};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

/// Line reader over stdin. The command loop and prompts take turns.
#[derive(Clone)]
pub struct Console {
	lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl Console {
	pub fn stdin() -> Self {
		Self {
			lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
		}
	}

	/// Prints `prompt` and reads one line. `None` at end of input.
	pub async fn read_line(&self, prompt: &str) -> Option<String> {
		print!("{prompt}");
		let _ = std::io::stdout().flush();
		match self.lines.lock().await.next_line().await {
			Ok(line) => line,
			Err(err) => {
				warn!(error = %err, "failed to read stdin");
				None
			}
		}
	}

	/// Reads a line, treating blank input as no answer.
	async fn answer(&self, prompt: &str) -> Option<String> {
		self.read_line(prompt)
			.await
			.map(|line| line.trim().to_string())
			.filter(|line| !line.is_empty())
	}
}

/// Asks for paths on the terminal. A blank answer cancels.
#[derive(Clone)]
pub struct TerminalPicker {
	console: Console,
}

impl TerminalPicker {
	pub fn new(console: Console) -> Self {
		Self { console }
	}

	fn check_filters(path: &Path, filters: &[FileFilter]) {
		if !filters.is_empty() && !filters.iter().any(|filter| filter.matches(path)) {
			warn!(path = %path.display(), "path does not match the offered file types");
		}
	}
}

#[async_trait]
impl FilePicker for TerminalPicker {
	async fn pick_open(&self, filters: &[FileFilter]) -> Option<PathBuf> {
		let path = PathBuf::from(self.console.answer("open path (blank to cancel): ").await?);
		Self::check_filters(&path, filters);
		Some(path)
	}

	async fn pick_save(&self, default_name: &str, filters: &[FileFilter]) -> Option<PathBuf> {
		let prompt = format!("save as (e.g. {default_name}, blank to cancel): ");
		let path = PathBuf::from(self.console.answer(&prompt).await?);
		Self::check_filters(&path, filters);
		Some(path)
	}
}

/// Yes/no questions on the terminal. Anything but yes or no cancels.
#[derive(Clone)]
pub struct TerminalDialogs {
	console: Console,
}

impl TerminalDialogs {
	pub fn new(console: Console) -> Self {
		Self { console }
	}
}

#[async_trait]
impl DialogProvider for TerminalDialogs {
	async fn show_dialog(&self, message: &str) -> DialogResult {
		let prompt = format!("{message} [yes/no]: ");
		match self.console.answer(&prompt).await {
			Some(label) => DialogResult::from_label(&label),
			None => DialogResult::Cancelled,
		}
	}
}
