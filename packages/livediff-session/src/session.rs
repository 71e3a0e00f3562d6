//! The per-connection render session state machine.

use std::fmt;

use livediff_core::{
    analyze, diff, to_html, DiagnosticsConfig, DiagnosticsSink, Node, NullSink,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::renderer::Renderer;
use crate::wire::{FullReason, Update};

/// Unique identifier of a live connection's session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-session knobs, injected at construction.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Defensive bound checked on every rendered tree before diffing.
    pub max_depth: usize,
    /// When false, every cycle sends a full-HTML replacement.
    pub diff_enabled: bool,
    /// Above this many patches the session compares payload sizes and falls
    /// back to full HTML when the HTML is at least 30% smaller. `None`
    /// disables the fallback.
    pub patch_fallback_threshold: Option<usize>,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            diff_enabled: true,
            patch_fallback_threshold: Some(50),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Unmounted,
    Mounted,
    Disconnected,
}

/// One live connection's reactive state: the committed tree, the version
/// counter, and the renderer that owns the view state.
///
/// A session is logically single-threaded: one render-diff cycle at a time,
/// serialized by the caller (see `SessionRegistry`). The differ itself is
/// pure, so any number of sessions may run cycles in parallel.
pub struct RenderSession<R: Renderer, S: DiagnosticsSink = NullSink> {
    id: SessionId,
    renderer: R,
    sink: S,
    config: SessionConfig,
    state: State,
    committed: Option<Node>,
    version: u64,
}

impl<R: Renderer> RenderSession<R, NullSink> {
    /// A session with default config and no diagnostics sink.
    pub fn with_defaults(renderer: R) -> Self {
        Self::new(renderer, NullSink, SessionConfig::default())
    }
}

impl<R: Renderer, S: DiagnosticsSink> RenderSession<R, S> {
    pub fn new(renderer: R, sink: S, config: SessionConfig) -> Self {
        Self {
            id: SessionId::new(),
            renderer,
            sink,
            config,
            state: State::Unmounted,
            committed: None,
            version: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_mounted(&self) -> bool {
        self.state == State::Mounted
    }

    /// The tree the client is currently known to reflect.
    pub fn committed_tree(&self) -> Option<&Node> {
        self.committed.as_ref()
    }

    /// First render: no diff, the full document goes out.
    pub fn mount(&mut self) -> Result<Update> {
        match self.state {
            State::Unmounted => {}
            State::Mounted => return Err(Error::AlreadyMounted),
            State::Disconnected => return Err(Error::Disconnected),
        }

        let tree = self.renderer.render()?;
        tree.ensure_depth(self.config.max_depth)?;

        let html = to_html(&tree);
        self.committed = Some(tree);
        self.version = 1;
        self.state = State::Mounted;
        debug!(session = %self.id, "mounted");

        Ok(Update::Full {
            version: 1,
            reason: FullReason::FirstRender,
            html,
        })
    }

    /// One state-changing interaction: render, diff against the committed
    /// tree, report diagnostics, emit an update, commit.
    ///
    /// On any error the session is unchanged — the committed tree is only
    /// replaced after a successful diff.
    pub fn render_cycle(&mut self) -> Result<Update> {
        match self.state {
            State::Mounted => {}
            State::Unmounted => return Err(Error::NotMounted),
            State::Disconnected => return Err(Error::Disconnected),
        }

        let new_tree = self.renderer.render()?;
        new_tree.ensure_depth(self.config.max_depth)?;

        let Some(committed) = self.committed.as_ref() else {
            return Err(Error::NotMounted);
        };
        let version = self.version + 1;

        if !self.config.diff_enabled {
            let html = to_html(&new_tree);
            self.commit(new_tree, version);
            return Ok(Update::Full {
                version,
                reason: FullReason::DiffDisabled,
                html,
            });
        }

        let patches = diff(committed, &new_tree);

        for diagnostic in analyze(&new_tree, &patches, &self.config.diagnostics) {
            warn!(
                session = %self.id,
                code = diagnostic.code.as_code(),
                path = %diagnostic.group_path,
                "{}",
                diagnostic.detail
            );
            self.sink.report(&diagnostic);
        }

        if let Some(threshold) = self.config.patch_fallback_threshold {
            if patches.len() > threshold {
                let patch_payload = serde_json::to_string(&patches)?;
                let html = to_html(&new_tree);
                // send HTML when it is at least 30% smaller than the patches
                if html.len() * 10 < patch_payload.len() * 7 {
                    debug!(
                        session = %self.id,
                        patches = patches.len(),
                        patch_bytes = patch_payload.len(),
                        html_bytes = html.len(),
                        "patch volume fallback"
                    );
                    self.commit(new_tree, version);
                    return Ok(Update::Full {
                        version,
                        reason: FullReason::PatchCompression,
                        html,
                    });
                }
            }
        }

        debug!(session = %self.id, version, patches = patches.len(), "cycle");
        self.commit(new_tree, version);
        Ok(Update::Patches { version, patches })
    }

    /// Terminal: the committed tree is discarded and no further cycles run.
    pub fn disconnect(&mut self) {
        self.state = State::Disconnected;
        self.committed = None;
        debug!(session = %self.id, "disconnected");
    }

    fn commit(&mut self, tree: Node, version: u64) {
        self.committed = Some(tree);
        self.version = version;
    }
}
