//! The session-boundary wire format.

use livediff_core::Patch;
use serde::{Deserialize, Serialize};

/// Why a cycle fell back to a full-HTML replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullReason {
    /// First mount: there is no committed tree to diff against.
    FirstRender,
    /// The patch list outgrew the serialized HTML; replacing is cheaper.
    PatchCompression,
    /// Diffing is disabled for this session.
    DiffDisabled,
}

/// One update message to the client, explicitly discriminated so the client
/// never has to guess which mode it is looking at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Update {
    /// Incremental: an ordered patch array. May be empty for a zero-change
    /// render — that is a valid update, not an error.
    Patches { version: u64, patches: Vec<Patch> },
    /// Full replacement: serialized HTML for the whole subtree.
    Full {
        version: u64,
        reason: FullReason,
        html: String,
    },
}

impl Update {
    pub fn version(&self) -> u64 {
        match self {
            Update::Patches { version, .. } | Update::Full { version, .. } => *version,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Update::Full { .. })
    }
}
