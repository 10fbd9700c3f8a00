//! Quill terminal host.
//!
//! Runs the file manager against the local file system, with a headless
//! renderer standing in for the editor UI and line commands standing in for
//! the host menus.

mod command;
mod console;
mod renderer;
mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use quill_bus::EventBus;
use quill_files::{FileManager, RecentFilesStore};
use quill_platform::{DesktopFiles, JsonRecentFiles, MemoryRecentFiles, QuillConfig};
use tracing::{info, warn};

use crate::command::Command;
use crate::console::{Console, TerminalDialogs, TerminalPicker};
use crate::renderer::HeadlessRenderer;
use crate::session::{Flow, Session, print_recent};

/// Quill command line arguments.
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Headless lyrics editor host")]
struct Args {
	/// File to open at startup
	#[arg(value_name = "FILE")]
	file: Option<PathBuf>,

	/// Configuration file [default: <config dir>/quill/config.toml]
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	let config = QuillConfig::load(args.config.as_deref()).context("failed to load configuration")?;

	setup_tracing(args.verbose, config.log.dir.as_deref());
	info!("starting quill");

	let console = Console::stdin();
	let bus = EventBus::new();
	let manager = FileManager::new(
		bus.platform(),
		Arc::new(DesktopFiles::new(TerminalPicker::new(console.clone()), &config.files)),
		Arc::new(TerminalDialogs::new(console.clone())),
		recent_store(&config),
	);
	manager.register();
	manager.add_on_file_changed_listener(|path, recent| {
		info!(path = ?path, recent = recent.len(), "file changed");
		println!("document: {}", path.unwrap_or("untitled"));
		print_recent(recent);
	});

	let renderer = HeadlessRenderer::attach(bus.renderer());
	renderer.ready();
	if let Some(file) = &args.file {
		renderer.open(Some(file.display().to_string()));
	}
	manager.settle().await;

	let session = Session::new(manager, renderer);
	println!("{}", command::HELP);
	while let Some(line) = console.read_line("> ").await {
		let command = match Command::parse(&line) {
			Ok(Some(command)) => command,
			Ok(None) => continue,
			Err(err) => {
				println!("{err}");
				continue;
			}
		};
		if session.execute(command).await == Flow::Quit {
			break;
		}
	}

	info!("quill exiting");
	Ok(())
}

fn recent_store(config: &QuillConfig) -> Arc<dyn RecentFilesStore> {
	match config.recent.resolved_path() {
		Some(path) => {
			info!(path = %path.display(), "recent files store");
			Arc::new(JsonRecentFiles::new(path))
		}
		None => {
			warn!("no data directory, recent files will not persist");
			Arc::new(MemoryRecentFiles::new())
		}
	}
}

fn setup_tracing(verbose: bool, config_dir: Option<&Path>) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("quill=debug,info")
			} else {
				EnvFilter::new("quill=info,warn")
			}
		})
	};

	// QUILL_LOG_DIR wins over the configured directory
	let log_dir = std::env::var_os("QUILL_LOG_DIR")
		.map(PathBuf::from)
		.or_else(|| config_dir.map(Path::to_path_buf));

	if let Some(log_dir) = log_dir
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("quill.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry()
				.with(filter())
				.with(file_layer)
				.init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}
