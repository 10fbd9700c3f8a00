//! Command execution against the file manager and the headless renderer.

use quill_files::FileManager;
use tracing::debug;

use crate::command::{Command, HELP};
use crate::renderer::HeadlessRenderer;

/// Whether the command loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	Quit,
}

/// The platform and renderer halves of one running editor.
pub struct Session {
	manager: FileManager,
	renderer: HeadlessRenderer,
}

impl Session {
	pub fn new(manager: FileManager, renderer: HeadlessRenderer) -> Self {
		Self { manager, renderer }
	}

	/// Runs `command` and waits until every flow it started has finished.
	pub async fn execute(&self, command: Command) -> Flow {
		debug!(?command, "executing");
		match command {
			Command::New => self.renderer.new_file(),
			Command::Open(path) => self.renderer.open(path),
			Command::Recent => print_recent(&self.manager.recent_files()),
			Command::OpenRecent(index) => {
				let recent = self.manager.recent_files();
				match index.checked_sub(1).and_then(|i| recent.get(i)) {
					Some(path) => self.renderer.open(Some(path.clone())),
					None => println!("no recent file #{index}"),
				}
			}
			Command::Save => self.manager.request_save(false),
			Command::SaveAs => self.manager.request_save(true),
			Command::Write(text) => self.renderer.write_line(&text),
			Command::Show => {
				let state = self.renderer.state();
				let marker = if state.dirty { " (modified)" } else { "" };
				println!("-- {}{marker} --", state.path.as_deref().unwrap_or("untitled"));
				println!("{}", state.text);
			}
			Command::Help => println!("{HELP}"),
			Command::Quit => {
				if self.renderer.state().dirty {
					println!("discarding unsaved changes");
				}
				return Flow::Quit;
			}
		}
		self.manager.settle().await;
		Flow::Continue
	}
}

/// Prints the recent list the way a host "Open Recent" menu lists it.
pub fn print_recent(recent: &[String]) {
	if recent.is_empty() {
		println!("no recent files");
		return;
	}
	for (i, path) in recent.iter().enumerate() {
		println!("{:>2}. {path}", i + 1);
	}
}
