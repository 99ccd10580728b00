/// Platform-specific code for talking to the desktop compositor.
pub mod platform;

/// Fixed-layout structures handed across the compositor boundary.
pub mod native;

/// Which compositor effects the running system can provide.
pub mod capability;

/// Public interface for applying compositor effects to windows.
mod effects;
pub use effects::*;

/// Accent color of the desktop, as reported by the compositor.
mod color;
pub use color::*;

/// Colorization change notifications.
mod events;
pub use events::*;

/// Glue between the host message loop and the effects controller.
mod bridge;
pub use bridge::*;

pub use capability::{Capabilities, OsVersion};
pub use platform::{Compositor, WindowHandle};

/// Errors types that may be triggered from compositor functions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// This error indicates that the given window type in the current system
	/// does not support compositor effects through this crate.
	#[error("feature is not supported for this window")]
	NotSupported,
	/// This error indicates that, while effects may be supported for the given
	/// window in the current system, they could not be enabled in the current
	/// environment.
	#[error("feature is not available for this window: {0}")]
	NotAvailable(String),
}
