//! Non-fatal diff analysis.
//!
//! `analyze` is a pure, read-only pass over the new tree and the emitted
//! patch list; it never alters either. Each check is independently
//! toggleable, and findings are returned as data — hosts decide where they
//! go (logs, telemetry, a sink), always out-of-band from the patch stream.

use crate::key::scan_group;
use crate::node::Node;
use crate::patch::{NodePath, Patch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable warning codes, part of the observable surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiagnosticCode {
    MixedKeying,
    DuplicateKey,
    ZeroPatchRender,
    UnkeyedPerformance,
}

impl DiagnosticCode {
    pub fn as_code(&self) -> &'static str {
        match self {
            DiagnosticCode::MixedKeying => "DJE-051",
            DiagnosticCode::DuplicateKey => "DJE-052",
            DiagnosticCode::ZeroPatchRender => "DJE-053",
            DiagnosticCode::UnkeyedPerformance => "DJE-054",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// One structured warning about a legal but suspect diff situation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    /// Address of the sibling group (its parent element) the finding is about.
    pub group_path: NodePath,
    pub detail: String,
}

/// Per-check toggles and thresholds.
#[derive(Clone, Debug)]
pub struct DiagnosticsConfig {
    pub mixed_keying: bool,
    pub duplicate_key: bool,
    pub zero_patch_render: bool,
    pub unkeyed_performance: bool,
    /// Minimum unkeyed sibling-group size before churn is worth flagging.
    pub unkeyed_size_threshold: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            mixed_keying: true,
            duplicate_key: true,
            zero_patch_render: true,
            unkeyed_performance: true,
            unkeyed_size_threshold: 10,
        }
    }
}

/// Inspect a rendered tree and the patches a diff produced for it.
pub fn analyze(new: &Node, patches: &[Patch], config: &DiagnosticsConfig) -> Vec<Diagnostic> {
    let mut findings = Vec::new();

    if config.zero_patch_render && patches.is_empty() {
        findings.push(Diagnostic {
            code: DiagnosticCode::ZeroPatchRender,
            group_path: NodePath::root(),
            detail: "render produced no DOM changes; the modified state may sit outside \
                     the diffed subtree"
                .to_string(),
        });
    }

    walk(new, NodePath::root(), patches, config, &mut findings);
    findings
}

fn walk(
    node: &Node,
    path: NodePath,
    patches: &[Patch],
    config: &DiagnosticsConfig,
    findings: &mut Vec<Diagnostic>,
) {
    let Node::Element(element) = node else {
        return;
    };

    if !element.children.is_empty() {
        let scan = scan_group(&element.children);

        if config.duplicate_key {
            for key in &scan.duplicates {
                findings.push(Diagnostic {
                    code: DiagnosticCode::DuplicateKey,
                    group_path: path.clone(),
                    detail: format!(
                        "key {key:?} appears on more than one sibling; only the first \
                         occurrence is matched"
                    ),
                });
            }
        }

        if config.mixed_keying && scan.mixed {
            findings.push(Diagnostic {
                code: DiagnosticCode::MixedKeying,
                group_path: path.clone(),
                detail: format!(
                    "{} of {} siblings carry keys; unkeyed members fall back to \
                     positional matching",
                    scan.explicit_count,
                    element.children.len()
                ),
            });
        }

        if config.unkeyed_performance
            && scan.explicit_count == 0
            && element.children.len() >= config.unkeyed_size_threshold
        {
            let churn = patches_in_subtree(patches, &path);
            if churn > element.children.len() / 2 {
                findings.push(Diagnostic {
                    code: DiagnosticCode::UnkeyedPerformance,
                    group_path: path.clone(),
                    detail: format!(
                        "{churn} patches for an unkeyed group of {} children; keying the \
                         group would likely reduce this to a handful of moves",
                        element.children.len()
                    ),
                });
            }
        }
    }

    for (index, child) in element.children.iter().enumerate() {
        walk(child, path.child(index), patches, config, findings);
    }
}

/// Patches landing inside the given group's subtree.
///
/// Counted against the subtree rather than only the direct children: the
/// unkeyed shift cliff shows up as text rewrites one level below the group,
/// which is exactly the churn this check exists to surface.
fn patches_in_subtree(patches: &[Patch], group: &NodePath) -> usize {
    patches
        .iter()
        .filter(|patch| match patch {
            Patch::Replace { path, .. }
            | Patch::SetText { path, .. }
            | Patch::SetAttr { path, .. }
            | Patch::RemoveAttr { path, .. }
            | Patch::RemoveChild { path } => path.len() > group.len() && path.starts_with(group),
            Patch::InsertChild { parent, .. } | Patch::MoveChild { parent, .. } => {
                parent.starts_with(group)
            }
        })
        .count()
}

/// Destination for diagnostics once a host has logged them.
pub trait DiagnosticsSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Discards everything; the default for hosts that only want logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn report(&mut self, _diagnostic: &Diagnostic) {}
}

/// Collects diagnostics in memory; useful for tests and local telemetry.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<Diagnostic>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.records)
    }
}

impl DiagnosticsSink for MemorySink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.records.push(diagnostic.clone());
    }
}
