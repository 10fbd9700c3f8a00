//! Host adapters for the file manager.
//!
//! * [`desktop`]: local file system behind a native picker.
//! * [`browser`]: file-system-access handles, reused per document.
//! * [`mobile`]: native plugin bridge for files and confirmation dialogs.
//! * [`recent_store`]: recent-files persistence.
//! * [`config`]: `config.toml` loading.

pub mod browser;
pub mod config;
pub mod desktop;
pub mod mobile;
pub mod recent_store;

pub use browser::{BrowserFiles, FileHandle, FileSystemAccess, PickedFile};
pub use config::{ConfigError, QuillConfig};
pub use desktop::{DesktopFiles, FileFilter, FilePicker};
pub use mobile::{BridgeDialogs, MobileFiles, NativeBridge};
pub use recent_store::{JsonRecentFiles, MemoryRecentFiles};
