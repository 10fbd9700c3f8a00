//! Typed event delegate bus between the platform and the renderer.
//!
//! The bus connects two logical endpoints without either side knowing the
//! other's transport:
//! * [`PlatformEndpoint`]: held by the host process; receives renderer intents
//!   and publishes results to the renderer.
//! * [`RendererEndpoint`]: held by the UI layer; receives platform results and
//!   publishes user intents.
//!
//! ```text
//! RendererEndpoint::send::<C>() ──► platform registry ──► listeners registered via PlatformEndpoint::on::<C>()
//! PlatformEndpoint::send::<C>() ──► renderer registry ──► listeners registered via RendererEndpoint::on::<C>()
//! ```
//!
//! Each [`Channel`] fixes its wire name, payload type and target side, so a
//! send in the wrong direction or with the wrong payload does not compile.
//! Delivery is synchronous and fire-and-forget: nothing is buffered for
//! channels without listeners.

pub mod channel;
pub mod channels;
pub mod endpoint;
pub mod error;
pub mod registry;

pub use channel::{Channel, Platform, Renderer, Side};
pub use endpoint::{Endpoint, EventBus, PlatformEndpoint, RendererEndpoint};
pub use error::PayloadError;
pub use registry::{ChannelRegistry, ListenerId};
