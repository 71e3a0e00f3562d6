#![forbid(unsafe_code)]
//! Per-connection reactive render sessions.
//!
//! A session owns the committed tree for one live connection: it invokes the
//! external renderer, diffs the result against the committed tree with
//! `livediff-core`, reports diagnostics out-of-band, and emits either an
//! incremental patch update or a full-HTML replacement on the wire.

pub mod error;
pub mod registry;
pub mod renderer;
pub mod session;
pub mod wire;

pub use error::{Error, Result};
pub use registry::SessionRegistry;
#[cfg(feature = "html")]
pub use renderer::HtmlRenderer;
pub use renderer::{FnRenderer, Renderer, SequenceRenderer};
pub use session::{RenderSession, SessionConfig, SessionId};
pub use wire::{FullReason, Update};
