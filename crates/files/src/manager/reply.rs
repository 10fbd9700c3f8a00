//! Single-outstanding editor text request.
//!
//! The bus has no correlation ids, so a reply is matched by being the first
//! [`EditorText`] delivered after the request. The listener deregisters itself
//! on first delivery and the guard deregisters it on drop, so neither a
//! consumed nor an abandoned request leaves a subscription behind.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use quill_bus::channels::EditorText;
use quill_bus::{ListenerId, PlatformEndpoint};
use tokio::sync::oneshot;

/// Slot holding the listener id of the request in flight, if any.
pub(super) type ReplySlot = Arc<Mutex<Option<ListenerId>>>;

pub(super) struct PendingReply {
	platform: PlatformEndpoint,
	slot: ReplySlot,
	id: ListenerId,
	rx: oneshot::Receiver<String>,
}

impl PendingReply {
	/// Registers the one-shot reply listener and claims `slot`.
	///
	/// Must run before the request is sent: delivery is synchronous and the
	/// renderer may answer from inside `send`. A listener still occupying the
	/// slot is superseded.
	pub fn register(platform: &PlatformEndpoint, slot: &ReplySlot) -> Self {
		let (tx, rx) = oneshot::channel();
		let tx = Mutex::new(Some(tx));
		let own_id: Arc<OnceLock<ListenerId>> = Arc::new(OnceLock::new());

		let id = {
			let endpoint = platform.clone();
			let own_id = Arc::clone(&own_id);
			platform.on::<EditorText>(move |text| {
				if let Some(id) = own_id.get() {
					endpoint.remove_listener::<EditorText>(*id);
				}
				match tx.lock().take() {
					Some(tx) => {
						let _ = tx.send(text.clone());
					}
					None => tracing::debug!("editor text reply already consumed"),
				}
			})
		};
		let _ = own_id.set(id);

		let stale = slot.lock().replace(id);
		if let Some(stale) = stale {
			tracing::warn!(%stale, %id, "superseding pending editor text request");
			platform.remove_listener::<EditorText>(stale);
		}

		Self {
			platform: platform.clone(),
			slot: Arc::clone(slot),
			id,
			rx,
		}
	}

	/// Waits for the reply. `None` when the listener was removed unanswered.
	pub async fn wait(mut self) -> Option<String> {
		(&mut self.rx).await.ok()
	}
}

impl Drop for PendingReply {
	fn drop(&mut self) {
		self.platform.remove_listener::<EditorText>(self.id);
		let mut slot = self.slot.lock();
		if *slot == Some(self.id) {
			*slot = None;
		}
	}
}
