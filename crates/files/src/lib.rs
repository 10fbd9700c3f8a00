//! File lifecycle coordination for the lyrics editor.
//!
//! The [`FileManager`] owns the current document slot and the recent-files
//! list. It reacts to renderer intents arriving over the bus, drives the host's
//! [`FileIoProvider`] and [`DialogProvider`], and republishes results to the
//! renderer. Hosts plug in by implementing the provider traits; the manager is
//! written once against them.

pub mod data;
pub mod error;
pub mod manager;
pub mod provider;
pub mod recent;
mod tasks;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use data::{CurrentFile, DialogResult, FileData};
pub use error::{FileError, Result};
pub use manager::{FileManager, NEW_FILE_PROMPT, OPEN_FILE_PROMPT};
pub use provider::{DialogProvider, FileIoProvider, RecentFilesStore};
pub use recent::{MAX_RECENT_FILES, RecentFiles};
