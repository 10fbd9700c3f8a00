//! Line commands accepted by the terminal host.

use thiserror::Error;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Start an untitled document.
	New,
	/// Open a path, or pick one when absent.
	Open(Option<String>),
	/// List recent files.
	Recent,
	/// Open the n-th recent file, 1-based.
	OpenRecent(usize),
	Save,
	SaveAs,
	/// Append a line to the document.
	Write(String),
	/// Print the document.
	Show,
	Help,
	Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
	#[error("unknown command: {0} (try `help`)")]
	Unknown(String),

	#[error("`{command}` takes no arguments")]
	UnexpectedArgument { command: &'static str },

	#[error("`write` needs text")]
	MissingText,

	#[error("invalid recent file number: {0}")]
	InvalidIndex(String),
}

pub const HELP: &str = "\
commands:
  new             start an untitled document
  open [PATH]     open PATH, or pick a file
  recent [N]      list recent files, or open the N-th
  save            save the document
  save-as         save under a new name
  write TEXT      append a line
  show            print the document
  quit            exit";

impl Command {
	/// Parses `line`. Blank lines yield `None`.
	pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
		let line = line.trim();
		if line.is_empty() {
			return Ok(None);
		}
		let (word, rest) = match line.split_once(char::is_whitespace) {
			Some((word, rest)) => (word, rest.trim()),
			None => (line, ""),
		};

		let no_args = |command: &'static str, parsed: Self| {
			if rest.is_empty() {
				Ok(parsed)
			} else {
				Err(CommandError::UnexpectedArgument { command })
			}
		};

		let command = match word {
			"new" | "n" => no_args("new", Self::New)?,
			"open" | "o" => Self::Open((!rest.is_empty()).then(|| rest.to_string())),
			"recent" | "r" if rest.is_empty() => Self::Recent,
			"recent" | "r" => match rest.parse::<usize>() {
				Ok(index) if index > 0 => Self::OpenRecent(index),
				_ => return Err(CommandError::InvalidIndex(rest.to_string())),
			},
			"save" | "s" => no_args("save", Self::Save)?,
			"save-as" => no_args("save-as", Self::SaveAs)?,
			"write" | "w" if rest.is_empty() => return Err(CommandError::MissingText),
			"write" | "w" => Self::Write(rest.to_string()),
			"show" => no_args("show", Self::Show)?,
			"help" | "?" => Self::Help,
			"quit" | "q" | "exit" => no_args("quit", Self::Quit)?,
			other => return Err(CommandError::Unknown(other.to_string())),
		};
		Ok(Some(command))
	}
}
