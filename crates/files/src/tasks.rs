//! Tracking for intent handlers spawned from bus listeners.

use std::future::Future;

use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

/// Tracker for work started by bus listeners, which cannot await.
///
/// Finished tasks leave the tracker on their own. The tracker stays closed so
/// [`IntentTasks::settle`] returns as soon as nothing is running.
#[derive(Debug)]
pub(crate) struct IntentTasks {
	tracker: TaskTracker,
}

impl Default for IntentTasks {
	fn default() -> Self {
		let tracker = TaskTracker::new();
		tracker.close();
		Self { tracker }
	}
}

impl IntentTasks {
	/// Spawns `fut` on the current runtime. Without a runtime the intent is
	/// dropped and logged.
	pub fn spawn<F>(&self, intent: &'static str, fut: F)
	where
		F: Future<Output = ()> + Send + 'static,
	{
		let Ok(handle) = Handle::try_current() else {
			tracing::error!(intent, "no async runtime, dropping intent");
			return;
		};
		tracing::trace!(intent, pending = self.tracker.len(), "file_manager.spawn");
		let task = handle.spawn(fut);
		self.tracker.spawn_on(
			async move {
				if let Err(err) = task.await
					&& err.is_panic()
				{
					tracing::error!(intent, error = %err, "file_manager intent panicked");
				}
			},
			&handle,
		);
	}

	/// Number of tasks still running.
	pub fn len(&self) -> usize {
		self.tracker.len()
	}

	/// Waits for every tracked task, including tasks spawned while waiting.
	///
	/// Dropping the returned future leaves running tasks untouched.
	pub async fn settle(&self) {
		self.tracker.wait().await;
	}
}
