//! Per-endpoint channel registry.
//!
//! Maps a channel name to its ordered listener list. Listeners are stored
//! type-erased; [`crate::Endpoint`] restores the payload type on delivery.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Type-erased listener invoked with a `&C::Payload` behind `dyn Any`.
pub(crate) type ErasedListener = Arc<dyn Fn(&(dyn Any + Send + Sync)) + Send + Sync>;

/// One-shot callback fired when a channel gains its first listener.
pub(crate) type ListenerAddedHook = Box<dyn FnOnce() + Send>;

/// Identity of one listener registration, returned by [`crate::Endpoint::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "listener#{}", self.0)
	}
}

struct Registration {
	id: ListenerId,
	listener: ErasedListener,
}

#[derive(Default)]
struct RegistryState {
	listeners: HashMap<&'static str, Vec<Registration>>,
	/// Channels that have ever had a listener registered.
	seen: HashSet<&'static str>,
	hooks: HashMap<&'static str, Vec<ListenerAddedHook>>,
}

/// Listener table for one side of the bus.
///
/// The lock is only held while the table is read or mutated, never while a
/// listener or hook runs, so listeners may freely call back into the bus.
pub struct ChannelRegistry {
	side: &'static str,
	next_id: AtomicU64,
	state: Mutex<RegistryState>,
}

impl fmt::Debug for ChannelRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		let mut channels: Vec<_> = state.listeners.iter().map(|(name, regs)| (*name, regs.len())).collect();
		channels.sort_unstable();
		f.debug_struct("ChannelRegistry")
			.field("side", &self.side)
			.field("channels", &channels)
			.finish()
	}
}

impl ChannelRegistry {
	/// Creates an empty registry for the named side.
	pub fn new(side: &'static str) -> Self {
		Self {
			side,
			next_id: AtomicU64::new(0),
			state: Mutex::new(RegistryState::default()),
		}
	}

	/// Side label this registry belongs to.
	pub fn side(&self) -> &'static str {
		self.side
	}

	/// Number of listeners currently registered on `channel`.
	pub fn listener_count(&self, channel: &str) -> usize {
		self.state.lock().listeners.get(channel).map_or(0, Vec::len)
	}

	/// Returns true once `channel` has had at least one listener registered.
	#[cfg(test)]
	pub(crate) fn has_seen(&self, channel: &str) -> bool {
		self.state.lock().seen.contains(channel)
	}

	/// Appends a listener and returns its id plus any hooks that must fire
	/// because this is the channel's first registration ever.
	pub(crate) fn add(&self, channel: &'static str, listener: ErasedListener) -> (ListenerId, Vec<ListenerAddedHook>) {
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		let mut state = self.state.lock();
		state.listeners.entry(channel).or_default().push(Registration { id, listener });
		let hooks = if state.seen.insert(channel) {
			state.hooks.remove(channel).unwrap_or_default()
		} else {
			Vec::new()
		};
		(id, hooks)
	}

	/// Removes the first registration matching `id`. Returns false when none.
	pub(crate) fn remove(&self, channel: &str, id: ListenerId) -> bool {
		let mut state = self.state.lock();
		let Some(regs) = state.listeners.get_mut(channel) else {
			return false;
		};
		let Some(pos) = regs.iter().position(|reg| reg.id == id) else {
			return false;
		};
		regs.remove(pos);
		if regs.is_empty() {
			state.listeners.remove(channel);
		}
		true
	}

	/// Copies the listener list in registration order.
	pub(crate) fn snapshot(&self, channel: &str) -> Vec<ErasedListener> {
		self.state
			.lock()
			.listeners
			.get(channel)
			.map(|regs| regs.iter().map(|reg| Arc::clone(&reg.listener)).collect())
			.unwrap_or_default()
	}

	/// Stores a listener-added hook. Hands it back when the channel already
	/// gained a listener, so the caller can fire it right away.
	pub(crate) fn add_hook(&self, channel: &'static str, hook: ListenerAddedHook) -> Option<ListenerAddedHook> {
		let mut state = self.state.lock();
		if state.seen.contains(channel) {
			return Some(hook);
		}
		state.hooks.entry(channel).or_default().push(hook);
		None
	}
}
