//! Error values carried inside bus payloads.

use thiserror::Error;

/// Error surfaced to the renderer as part of a result payload.
///
/// Holds the rendered message only so payloads stay cloneable and free of
/// host-specific error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PayloadError {
	message: String,
}

impl PayloadError {
	/// Creates an error from a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}

	/// Captures the display form of any error.
	pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
		Self::new(error.to_string())
	}

	/// Returns the message.
	pub fn message(&self) -> &str {
		&self.message
	}
}
