#![forbid(unsafe_code)]
//! Server-side virtual DOM core: tree model, keyed diffing, the patch
//! instruction set, and diff diagnostics. This crate stays renderer- and
//! transport-agnostic so any session host can drive it; the companion
//! session crate adds the per-connection lifecycle.

pub mod apply;
pub mod diagnostics;
pub mod diff;
pub mod error;
pub mod html;
pub mod key;
pub mod node;
#[cfg(feature = "html")]
pub mod parse;
pub mod patch;

pub use apply::{apply_patch, apply_patches};
pub use diagnostics::{
    analyze, Diagnostic, DiagnosticCode, DiagnosticsConfig, DiagnosticsSink, MemorySink, NullSink,
};
pub use diff::{diff, diff_at};
pub use error::{Error, Result};
pub use html::to_html;
pub use key::{
    extract_keys, group_is_keyed, scan_group, GroupScan, Key, KEY_ATTRIBUTE, LEGACY_KEY_ATTRIBUTE,
};
pub use node::{AttrList, Element, Node};
#[cfg(feature = "html")]
pub use parse::parse_html;
pub use patch::{NodePath, Patch};
