use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use quill_bus::channels::EditorText;
use quill_bus::{EventBus, RendererEndpoint};

use super::*;
use crate::error::FileError;
use crate::recent::MAX_RECENT_FILES;
use crate::testing::{RecordingRecentFiles, RendererEvent, RendererProbe, ScriptedDialogs, ScriptedFiles};

struct Fixture {
	bus: EventBus,
	manager: FileManager,
	files: Arc<ScriptedFiles>,
	dialogs: Arc<ScriptedDialogs>,
	recent: Arc<RecordingRecentFiles>,
	probe: RendererProbe,
	renderer: RendererEndpoint,
}

impl Fixture {
	fn new(files: ScriptedFiles) -> Self {
		Self::with(files, RecordingRecentFiles::default())
	}

	fn with(files: ScriptedFiles, recent: RecordingRecentFiles) -> Self {
		let bus = EventBus::new();
		let files = Arc::new(files);
		let dialogs = Arc::new(ScriptedDialogs::answering(DialogResult::Cancelled));
		let recent = Arc::new(recent);
		let manager = FileManager::new(bus.platform(), files.clone(), dialogs.clone(), recent.clone());
		manager.register();
		let renderer = bus.renderer();
		let probe = RendererProbe::attach(&renderer);
		Self {
			bus,
			manager,
			files,
			dialogs,
			recent,
			probe,
			renderer,
		}
	}

	fn reading_any() -> ScriptedFiles {
		let files = ScriptedFiles::new();
		files.on_read(|path| Ok(FileData::at_path(path, format!("contents of {path}"))));
		files
	}

	fn new_file_events(&self) -> usize {
		self.probe.count(|e| *e == RendererEvent::NewFileCreated)
	}

	fn editor_text_listeners(&self) -> usize {
		self.bus.platform().listener_count::<EditorText>()
	}
}

async fn spin() {
	for _ in 0..16 {
		tokio::task::yield_now().await;
	}
}

#[tokio::test]
async fn starts_untitled_and_empty() {
	let fx = Fixture::new(ScriptedFiles::new());
	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	assert_eq!(fx.manager.current_path(), None);
	assert!(fx.manager.recent_files().is_empty());
}

#[tokio::test]
async fn open_picks_file_and_remembers_it() {
	let fx = Fixture::new(ScriptedFiles::new().opening(FileData::at_path("/songs/a.txt", "verse one")));

	fx.manager.open_file(None).await;

	assert_eq!(fx.manager.current_file(), CurrentFile::Open("/songs/a.txt".into()));
	assert_eq!(
		fx.probe.opened(),
		vec![OpenedFile::ok(Some("/songs/a.txt".into()), "verse one")]
	);
	assert_eq!(fx.manager.recent_files(), vec!["/songs/a.txt".to_string()]);
	assert_eq!(fx.files.calls().opens, 1);
}

#[tokio::test]
async fn reopening_moves_path_to_front_without_duplicates() {
	let fx = Fixture::with(
		Fixture::reading_any(),
		RecordingRecentFiles::with_entries(&["/songs/a.txt", "/songs/b.txt"]),
	);

	fx.manager.open_file(Some("/songs/b.txt".into())).await;

	assert_eq!(
		fx.manager.recent_files(),
		vec!["/songs/b.txt".to_string(), "/songs/a.txt".to_string()]
	);
}

#[tokio::test]
async fn opened_path_goes_in_front_of_existing_entries() {
	let fx = Fixture::with(Fixture::reading_any(), RecordingRecentFiles::with_entries(&["1", "2", "3"]));

	fx.manager.open_file(Some("/path/test".into())).await;

	assert_eq!(
		fx.recent.writes(),
		vec![vec![
			"/path/test".to_string(),
			"1".to_string(),
			"2".to_string(),
			"3".to_string()
		]]
	);
}

#[tokio::test]
async fn recent_list_is_capped() {
	let fx = Fixture::new(Fixture::reading_any());

	for i in 0..MAX_RECENT_FILES + 2 {
		fx.manager.open_file(Some(format!("/songs/{i}.txt"))).await;
	}

	let recent = fx.manager.recent_files();
	assert_eq!(recent.len(), MAX_RECENT_FILES);
	assert_eq!(recent[0], format!("/songs/{}.txt", MAX_RECENT_FILES + 1));
	assert!(!recent.contains(&"/songs/0.txt".to_string()));
	assert!(!recent.contains(&"/songs/1.txt".to_string()));
}

#[tokio::test]
async fn cancelled_open_changes_nothing() {
	let fx = Fixture::new(ScriptedFiles::new());

	fx.manager.open_file(None).await;

	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	assert!(fx.probe.events().is_empty());
	assert!(fx.recent.writes().is_empty());
}

#[tokio::test]
async fn open_by_path_reads_without_picker() {
	let fx = Fixture::new(Fixture::reading_any());

	fx.manager.open_file(Some("/songs/chorus.txt".into())).await;

	let calls = fx.files.calls();
	assert_eq!(calls.opens, 0);
	assert_eq!(calls.reads, vec!["/songs/chorus.txt".to_string()]);
	assert_eq!(
		fx.probe.opened(),
		vec![OpenedFile::ok(
			Some("/songs/chorus.txt".into()),
			"contents of /songs/chorus.txt"
		)]
	);
}

#[tokio::test]
async fn read_result_without_path_falls_back_to_requested_path() {
	let files = ScriptedFiles::new();
	files.on_read(|_| Ok(FileData::unsaved("bridge.txt", "hum")));
	let fx = Fixture::new(files);

	fx.manager.open_file(Some("/songs/bridge.txt".into())).await;

	assert_eq!(fx.manager.current_path().as_deref(), Some("/songs/bridge.txt"));
	assert_eq!(fx.manager.recent_files(), vec!["/songs/bridge.txt".to_string()]);
}

#[tokio::test]
async fn picked_content_without_location_stays_untitled() {
	let fx = Fixture::new(ScriptedFiles::new().opening(FileData::unsaved("import.txt", "la")));

	fx.manager.open_file(None).await;

	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	assert_eq!(fx.probe.opened(), vec![OpenedFile::ok(None, "la")]);
	assert!(fx.recent.writes().is_empty());
}

#[tokio::test]
async fn read_failure_is_reported_on_file_opened() {
	let files = ScriptedFiles::new();
	files.on_read(|path| {
		Err(FileError::io(
			path,
			std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
		))
	});
	let fx = Fixture::new(files);

	fx.manager.open_file(Some("/songs/missing.txt".into())).await;

	let opened = fx.probe.opened();
	assert_eq!(opened.len(), 1);
	let error = opened[0].error.as_ref().map(PayloadError::message).unwrap_or_default();
	assert!(error.contains("/songs/missing.txt"), "unexpected error: {error}");
	assert_eq!(opened[0].path, None);
	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	assert!(fx.recent.writes().is_empty());
}

#[tokio::test]
async fn new_file_asks_renderer_first() {
	let fx = Fixture::new(ScriptedFiles::new());

	fx.manager.on_new_file();
	fx.renderer.send::<NewFileAttempt>(());
	fx.manager.settle().await;

	assert_eq!(
		fx.probe.events(),
		vec![RendererEvent::IsOkayForNewFile, RendererEvent::IsOkayForNewFile]
	);
}

#[tokio::test]
async fn okay_for_new_file_resets_without_dialog() {
	let fx = Fixture::new(Fixture::reading_any());
	fx.manager.open_file(Some("/songs/a.txt".into())).await;
	fx.probe.clear();

	fx.renderer.send::<OkayForNewFile>(());
	fx.manager.settle().await;

	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	assert_eq!(fx.new_file_events(), 1);
	assert!(fx.dialogs.prompts().is_empty());
	assert_eq!(fx.manager.recent_files(), vec!["/songs/a.txt".to_string()]);
}

#[tokio::test]
async fn declined_prompt_keeps_document() {
	let fx = Fixture::new(Fixture::reading_any());
	fx.manager.open_file(Some("/songs/a.txt".into())).await;
	fx.probe.clear();

	for answer in [DialogResult::No, DialogResult::Cancelled] {
		fx.dialogs.set_answer(answer);
		fx.renderer.send::<PromptSaveFileForNew>(());
		fx.manager.settle().await;
	}

	assert_eq!(fx.manager.current_path().as_deref(), Some("/songs/a.txt"));
	assert_eq!(fx.new_file_events(), 0);
	assert_eq!(fx.dialogs.prompts(), vec![NEW_FILE_PROMPT.to_string(); 2]);
}

#[tokio::test]
async fn confirmed_prompt_resets_once() {
	let fx = Fixture::new(Fixture::reading_any());
	fx.manager.open_file(Some("/songs/a.txt".into())).await;
	fx.probe.clear();
	fx.dialogs.set_answer(DialogResult::Yes);

	fx.renderer.send::<PromptSaveFileForNew>(());
	fx.manager.settle().await;

	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	assert_eq!(fx.probe.events(), vec![RendererEvent::NewFileCreated]);
}

#[tokio::test]
async fn confirmed_open_prompt_opens_requested_path() {
	let fx = Fixture::new(Fixture::reading_any());
	fx.dialogs.set_answer(DialogResult::Yes);

	fx.renderer.send::<PromptSaveFileForOpen>(Some("/songs/b.txt".to_string()).into());
	fx.manager.settle().await;

	assert_eq!(fx.dialogs.prompts(), vec![OPEN_FILE_PROMPT.to_string()]);
	assert_eq!(fx.manager.current_path().as_deref(), Some("/songs/b.txt"));
}

#[tokio::test]
async fn confirmed_open_of_dropped_file_uses_its_contents() {
	let fx = Fixture::with(ScriptedFiles::new(), RecordingRecentFiles::with_entries(&["1", "2", "3"]));
	fx.dialogs.set_answer(DialogResult::Yes);

	fx.renderer
		.send::<PromptSaveFileForOpen>(OpenRequest::dropped("whitetuxedo.txt", "This water"));
	fx.manager.settle().await;

	assert_eq!(fx.dialogs.prompts().len(), 1);
	assert_eq!(
		fx.probe.opened(),
		vec![OpenedFile::ok(Some("whitetuxedo.txt".into()), "This water")]
	);
	assert_eq!(
		fx.recent.get(),
		vec![
			"whitetuxedo.txt".to_string(),
			"1".to_string(),
			"2".to_string(),
			"3".to_string()
		]
	);
	let calls = fx.files.calls();
	assert!(calls.reads.is_empty());
	assert_eq!(calls.opens, 0);
}

#[tokio::test]
async fn declined_open_prompt_does_not_touch_provider() {
	let fx = Fixture::new(Fixture::reading_any());
	fx.dialogs.set_answer(DialogResult::No);

	fx.renderer.send::<PromptSaveFileForOpen>(OpenRequest::dropped("/songs/b.txt", "dropped"));
	fx.manager.settle().await;

	assert!(fx.files.calls().reads.is_empty());
	assert!(fx.probe.events().is_empty());
}

#[tokio::test]
async fn open_attempt_from_renderer_opens() {
	let fx = Fixture::new(ScriptedFiles::new().opening(FileData::at_path("/songs/a.txt", "words")));

	fx.renderer.send::<OpenFileAttempt>(None);
	fx.manager.settle().await;

	assert_eq!(fx.manager.current_path().as_deref(), Some("/songs/a.txt"));
}

#[tokio::test]
async fn menu_open_runs_in_background() {
	let fx = Fixture::new(Fixture::reading_any());

	fx.manager.request_open(Some("/songs/menu.txt".into()));
	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	fx.manager.settle().await;

	assert_eq!(fx.manager.current_path().as_deref(), Some("/songs/menu.txt"));
	assert_eq!(fx.files.calls().reads, vec!["/songs/menu.txt".to_string()]);
}

#[tokio::test]
async fn untitled_save_asks_for_destination() {
	let fx = Fixture::new(ScriptedFiles::new().saving_to("/songs/new.txt"));
	fx.probe.auto_reply("first draft");

	fx.manager.save_file(false).await;

	assert_eq!(fx.files.calls().saves, vec![("first draft".to_string(), None)]);
	assert_eq!(
		fx.probe.events(),
		vec![
			RendererEvent::RequestEditorText,
			RendererEvent::FileOpened(OpenedFile::ok(Some("/songs/new.txt".into()), "first draft")),
			RendererEvent::FileSaveEnded(SaveEnded {
				error: None,
				path: Some("/songs/new.txt".into()),
			}),
		]
	);
	assert_eq!(fx.manager.recent_files(), vec!["/songs/new.txt".to_string()]);
}

#[tokio::test]
async fn later_saves_target_the_new_path() {
	let fx = Fixture::new(ScriptedFiles::new().saving_to("/songs/new.txt"));
	fx.probe.auto_reply("draft");

	fx.manager.save_file(false).await;
	fx.manager.save_file(false).await;
	fx.manager.save_file(true).await;

	assert_eq!(
		fx.files.calls().saves,
		vec![
			("draft".to_string(), None),
			("draft".to_string(), Some("/songs/new.txt".to_string())),
			("draft".to_string(), None),
		]
	);
	assert_eq!(fx.recent.get(), vec!["/songs/new.txt".to_string()]);
}

#[tokio::test]
async fn cancelled_save_still_ends() {
	let fx = Fixture::new(ScriptedFiles::new());
	fx.probe.auto_reply("unsaved");

	fx.manager.save_file(false).await;

	assert!(fx.probe.opened().is_empty());
	assert_eq!(fx.probe.save_ends(), vec![SaveEnded::default()]);
	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	assert!(fx.recent.writes().is_empty());
}

#[tokio::test]
async fn save_failure_is_reported_on_save_ended() {
	let fx = Fixture::new(Fixture::reading_any());
	fx.manager.open_file(Some("/songs/a.txt".into())).await;
	fx.files.on_save(|_, _| Err(FileError::Bridge("disk full".into())));
	fx.probe.clear();
	fx.probe.auto_reply("text");

	fx.manager.save_file(false).await;

	let ended = fx.probe.save_ends();
	assert_eq!(ended.len(), 1);
	assert_eq!(
		ended[0].error.as_ref().map(PayloadError::message),
		Some("native bridge rejected the call: disk full")
	);
	assert_eq!(ended[0].path.as_deref(), Some("/songs/a.txt"));
	assert!(fx.probe.opened().is_empty());
}

#[tokio::test]
async fn save_attempt_with_text_skips_editor_request() {
	let fx = Fixture::new(ScriptedFiles::new().saving_to("/songs/sent.txt"));

	fx.renderer.send::<SaveFileAttempt>(SaveRequest::new("carried along"));
	fx.manager.settle().await;

	assert_eq!(fx.probe.count(|e| *e == RendererEvent::RequestEditorText), 0);
	assert_eq!(fx.files.calls().saves, vec![("carried along".to_string(), None)]);
	assert_eq!(fx.manager.current_path().as_deref(), Some("/songs/sent.txt"));

	fx.renderer.send::<SaveFileAttempt>(SaveRequest::new("again"));
	fx.renderer.send::<SaveFileAttempt>(SaveRequest::save_as("elsewhere"));
	fx.manager.settle().await;

	assert_eq!(
		fx.files.calls().saves[1..],
		[
			("again".to_string(), Some("/songs/sent.txt".to_string())),
			("elsewhere".to_string(), None),
		]
	);
}

#[tokio::test]
async fn reply_listener_is_removed_after_save() {
	let fx = Fixture::new(ScriptedFiles::new().saving_to("/songs/a.txt"));
	fx.probe.auto_reply("text");

	fx.manager.save_file(false).await;
	fx.manager.save_file(false).await;

	assert_eq!(fx.editor_text_listeners(), 0);
	assert_eq!(*fx.manager.inner.pending_reply.lock(), None);
}

#[tokio::test]
async fn concurrent_saves_run_one_at_a_time() {
	let fx = Fixture::new(ScriptedFiles::new().saving_to("/songs/a.txt"));

	fx.manager.request_save(false);
	fx.manager.request_save(false);
	spin().await;

	assert_eq!(fx.editor_text_listeners(), 1);
	assert_eq!(fx.probe.count(|e| *e == RendererEvent::RequestEditorText), 1);

	fx.renderer.send::<EditorText>("first".into());
	spin().await;

	assert_eq!(fx.editor_text_listeners(), 1);
	assert_eq!(fx.probe.count(|e| *e == RendererEvent::RequestEditorText), 2);

	fx.renderer.send::<EditorText>("second".into());
	fx.manager.settle().await;

	assert_eq!(
		fx.files.calls().saves,
		vec![
			("first".to_string(), None),
			("second".to_string(), Some("/songs/a.txt".to_string())),
		]
	);
	assert_eq!(fx.editor_text_listeners(), 0);
}

#[tokio::test]
async fn superseded_reply_ends_save_with_error() {
	let fx = Fixture::new(ScriptedFiles::new());

	fx.manager.request_save(false);
	spin().await;
	assert_eq!(fx.editor_text_listeners(), 1);

	let intruder = PendingReply::register(&fx.bus.platform(), &fx.manager.inner.pending_reply);
	fx.manager.settle().await;

	let ended = fx.probe.save_ends();
	assert_eq!(ended.len(), 1);
	assert_eq!(
		ended[0].error.as_ref().map(PayloadError::message),
		Some("editor text request was dropped")
	);
	assert!(fx.files.calls().saves.is_empty());

	drop(intruder);
	assert_eq!(fx.editor_text_listeners(), 0);
	assert_eq!(*fx.manager.inner.pending_reply.lock(), None);
}

#[tokio::test]
async fn finished_intents_are_not_retained() {
	let fx = Fixture::new(ScriptedFiles::new());

	for _ in 0..1000 {
		fx.renderer.send::<OpenFileAttempt>(None);
	}
	for _ in 0..10_000 {
		if fx.manager.inner.tasks.len() == 0 {
			break;
		}
		tokio::task::yield_now().await;
	}

	assert_eq!(fx.files.calls().opens, 1000);
	assert_eq!(fx.manager.inner.tasks.len(), 0);
}

#[tokio::test]
async fn abandoned_settle_leaves_save_running() {
	let fx = Fixture::new(ScriptedFiles::new().saving_to("/songs/a.txt"));

	fx.manager.request_save(false);
	tokio::select! {
		_ = fx.manager.settle() => panic!("save finished without editor text"),
		_ = spin() => {}
	}
	assert_eq!(fx.editor_text_listeners(), 1);

	fx.renderer.send::<EditorText>("words".into());
	fx.manager.settle().await;

	assert_eq!(fx.files.calls().saves, vec![("words".to_string(), None)]);
	assert_eq!(
		fx.probe.save_ends(),
		vec![SaveEnded {
			error: None,
			path: Some("/songs/a.txt".into()),
		}]
	);
}

#[tokio::test]
async fn ready_for_events_resets_document() {
	let fx = Fixture::new(Fixture::reading_any());
	fx.manager.open_file(Some("/songs/a.txt".into())).await;

	fx.renderer.send::<ReadyForEvents>(());
	fx.manager.settle().await;

	assert_eq!(fx.manager.current_file(), CurrentFile::NoFile);
	assert_eq!(fx.new_file_events(), 1);
}

#[tokio::test]
async fn file_changed_listeners_see_every_change() {
	let files = Fixture::reading_any();
	let fx = Fixture::new(files);
	fx.files.on_save(|_, path| Ok(path.map(str::to_string)));
	fx.probe.auto_reply("text");

	let calls = Arc::new(AtomicUsize::new(0));
	let seen = Arc::new(Mutex::new(Vec::new()));
	{
		let calls = Arc::clone(&calls);
		let seen = Arc::clone(&seen);
		fx.manager.add_on_file_changed_listener(move |path, recent| {
			calls.fetch_add(1, Ordering::SeqCst);
			seen.lock().push((path.map(str::to_string), recent.to_vec()));
		});
	}

	fx.manager.open_file(Some("/songs/a.txt".into())).await;
	fx.manager.save_file(false).await;
	fx.manager.save_file(false).await;
	assert_eq!(calls.load(Ordering::SeqCst), 3);

	fx.manager.reset_document().await;
	assert_eq!(calls.load(Ordering::SeqCst), 4);
	assert_eq!(
		seen.lock().last().cloned(),
		Some((None, vec!["/songs/a.txt".to_string()]))
	);
}

#[tokio::test]
async fn double_register_does_not_double_handle() {
	let fx = Fixture::new(ScriptedFiles::new());
	fx.manager.register();

	fx.renderer.send::<NewFileAttempt>(());

	assert_eq!(fx.probe.count(|e| *e == RendererEvent::IsOkayForNewFile), 1);
}

#[tokio::test]
async fn dropped_manager_ignores_intents() {
	let fx = Fixture::new(ScriptedFiles::new());
	let Fixture {
		manager, probe, renderer, ..
	} = fx;
	drop(manager);

	renderer.send::<NewFileAttempt>(());
	renderer.send::<OpenFileAttempt>(None);

	assert!(probe.events().is_empty());
}
