//! Channel and side abstractions binding wire names to payload types.

use std::error::Error as StdError;

/// One end of the bus.
pub trait Side: Send + Sync + 'static {
	/// The opposite end; `send` on this side delivers there.
	type Peer: Side;

	/// Side label used in logs.
	const NAME: &'static str;
}

/// Host side owning file system and native UI access.
#[derive(Debug)]
pub enum Platform {}

/// UI side that displays the document and issues user intents.
#[derive(Debug)]
pub enum Renderer {}

impl Side for Platform {
	type Peer = Renderer;
	const NAME: &'static str = "platform";
}

impl Side for Renderer {
	type Peer = Platform;
	const NAME: &'static str = "renderer";
}

/// A named one-way message type carried by the bus.
///
/// Implementors are zero-sized markers; the payload shape is the contract
/// between the two listeners on the channel.
pub trait Channel: 'static {
	/// Wire name of the channel.
	const NAME: &'static str;

	/// Side whose listeners receive this channel.
	type Target: Side;

	/// Payload delivered to every listener.
	type Payload: Send + Sync + 'static;

	/// Returns an error-like value carried inside `payload`, if any.
	///
	/// The bus logs it before delivery. Delivery itself is unaffected.
	fn error(payload: &Self::Payload) -> Option<&(dyn StdError + 'static)> {
		let _ = payload;
		None
	}
}

/// Declares zero-sized channel markers.
///
/// ```ignore
/// declare_channels! {
///     /// Docs.
///     NewFileCreated => "new-file-created", Renderer, ();
/// }
/// ```
#[macro_export]
macro_rules! declare_channels {
	($($(#[$meta:meta])* $name:ident => $wire:literal, $target:ty, $payload:ty;)+) => {
		$(
			$(#[$meta])*
			#[derive(Debug, Clone, Copy, PartialEq, Eq)]
			pub struct $name;

			impl $crate::Channel for $name {
				const NAME: &'static str = $wire;
				type Target = $target;
				type Payload = $payload;
			}
		)+
	};
}
