//! Bus endpoints.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::channel::{Channel, Platform, Renderer, Side};
use crate::registry::{ChannelRegistry, ErasedListener, ListenerId};

/// Owner of both registries. Constructed once per process and handed out as
/// endpoints.
#[derive(Debug)]
pub struct EventBus {
	platform: Arc<ChannelRegistry>,
	renderer: Arc<ChannelRegistry>,
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl EventBus {
	/// Creates a bus with empty registries on both sides.
	pub fn new() -> Self {
		Self {
			platform: Arc::new(ChannelRegistry::new(Platform::NAME)),
			renderer: Arc::new(ChannelRegistry::new(Renderer::NAME)),
		}
	}

	/// Returns the endpoint used by the host process.
	pub fn platform(&self) -> PlatformEndpoint {
		Endpoint::new(Arc::clone(&self.platform), Arc::clone(&self.renderer))
	}

	/// Returns the endpoint used by the UI layer.
	pub fn renderer(&self) -> RendererEndpoint {
		Endpoint::new(Arc::clone(&self.renderer), Arc::clone(&self.platform))
	}
}

/// Endpoint held by the platform: listens to renderer intents, sends results.
pub type PlatformEndpoint = Endpoint<Platform>;

/// Endpoint held by the renderer: listens to platform results, sends intents.
pub type RendererEndpoint = Endpoint<Renderer>;

/// One side of the bus.
///
/// `send` delivers to the peer's registry; `on` registers on this side's
/// registry. Cloning is cheap and every clone shares the same registries.
pub struct Endpoint<S: Side> {
	inbound: Arc<ChannelRegistry>,
	outbound: Arc<ChannelRegistry>,
	_side: PhantomData<fn() -> S>,
}

impl<S: Side> Clone for Endpoint<S> {
	fn clone(&self) -> Self {
		Self::new(Arc::clone(&self.inbound), Arc::clone(&self.outbound))
	}
}

impl<S: Side> fmt::Debug for Endpoint<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Endpoint")
			.field("side", &S::NAME)
			.field("inbound", &self.inbound)
			.finish_non_exhaustive()
	}
}

impl<S: Side> Endpoint<S> {
	fn new(inbound: Arc<ChannelRegistry>, outbound: Arc<ChannelRegistry>) -> Self {
		Self {
			inbound,
			outbound,
			_side: PhantomData,
		}
	}

	/// Delivers `payload` to every peer listener of `C`, in registration order.
	///
	/// Returns once every listener has been invoked. Work a listener defers to
	/// a task is not awaited. Nothing is buffered when no listener exists.
	pub fn send<C>(&self, payload: C::Payload)
	where
		C: Channel<Target = S::Peer>,
	{
		if let Some(err) = C::error(&payload) {
			error!(from = S::NAME, channel = C::NAME, error = %err, "bus payload carries error");
		}

		let listeners = self.outbound.snapshot(C::NAME);
		trace!(from = S::NAME, channel = C::NAME, listeners = listeners.len(), "bus.send");
		let payload: &(dyn Any + Send + Sync) = &payload;
		for listener in listeners {
			listener(payload);
		}
	}

	/// Registers a listener for `C` on this side.
	///
	/// The first registration ever for `C` fires any hooks the peer installed
	/// with [`Self::on_peer_listener_added`].
	pub fn on<C>(&self, listener: impl Fn(&C::Payload) + Send + Sync + 'static) -> ListenerId
	where
		C: Channel<Target = S>,
	{
		let erased: ErasedListener = Arc::new(move |payload: &(dyn Any + Send + Sync)| match payload.downcast_ref::<C::Payload>() {
			Some(payload) => listener(payload),
			None => error!(channel = C::NAME, "bus payload type mismatch"),
		});
		let (id, hooks) = self.inbound.add(C::NAME, erased);
		debug!(side = S::NAME, channel = C::NAME, %id, hooks = hooks.len(), "bus.on");
		for hook in hooks {
			hook();
		}
		id
	}

	/// Removes the registration `id` from `C`. Unknown ids are a no-op.
	pub fn remove_listener<C>(&self, id: ListenerId) -> bool
	where
		C: Channel<Target = S>,
	{
		let removed = self.inbound.remove(C::NAME, id);
		debug!(side = S::NAME, channel = C::NAME, %id, removed, "bus.remove_listener");
		removed
	}

	/// Runs `hook` the first time the peer registers a listener for `C`.
	///
	/// Used to push state lazily, once somebody is ready to receive it. Runs
	/// immediately when the peer already listened on `C` at some point.
	pub fn on_peer_listener_added<C>(&self, hook: impl FnOnce() + Send + 'static)
	where
		C: Channel<Target = S::Peer>,
	{
		if let Some(hook) = self.outbound.add_hook(C::NAME, Box::new(hook)) {
			debug!(side = S::NAME, channel = C::NAME, "bus.listener_added hook fired late");
			hook();
		}
	}

	/// Number of listeners currently registered for `C` on this side.
	pub fn listener_count<C>(&self) -> usize
	where
		C: Channel<Target = S>,
	{
		self.inbound.listener_count(C::NAME)
	}
}
