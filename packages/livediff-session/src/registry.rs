//! Session registry: the per-session mutual-exclusion point.
//!
//! Each session sits behind its own mutex, so one session processes at most
//! one render-diff cycle at a time while distinct sessions diff in parallel
//! freely. A `live` flag per session lets a disconnect that races an
//! in-flight cycle discard the completed result instead of transmitting it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use livediff_core::DiagnosticsSink;

use crate::error::{Error, Result};
use crate::renderer::Renderer;
use crate::session::{RenderSession, SessionConfig, SessionId};
use crate::wire::Update;

struct SessionHandle<R: Renderer, S: DiagnosticsSink> {
    session: Arc<Mutex<RenderSession<R, S>>>,
    live: Arc<AtomicBool>,
}

impl<R: Renderer, S: DiagnosticsSink> Clone for SessionHandle<R, S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            live: Arc::clone(&self.live),
        }
    }
}

/// All live sessions for one host process.
pub struct SessionRegistry<R: Renderer, S: DiagnosticsSink> {
    sessions: Mutex<HashMap<SessionId, SessionHandle<R, S>>>,
}

impl<R: Renderer, S: DiagnosticsSink> Default for SessionRegistry<R, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Renderer, S: DiagnosticsSink> SessionRegistry<R, S> {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session for a new connection and run its mount render.
    /// A mount failure leaves nothing registered.
    pub fn connect(
        &self,
        renderer: R,
        sink: S,
        config: SessionConfig,
    ) -> Result<(SessionId, Update)> {
        let mut session = RenderSession::new(renderer, sink, config);
        let update = session.mount()?;
        let id = session.id();

        let handle = SessionHandle {
            session: Arc::new(Mutex::new(session)),
            live: Arc::new(AtomicBool::new(true)),
        };
        lock(&self.sessions).insert(id, handle);
        Ok((id, update))
    }

    /// Run one render-diff cycle for the given session.
    pub fn render_cycle(&self, id: SessionId) -> Result<Update> {
        let handle = self.handle(id).ok_or(Error::Disconnected)?;
        let update = lock(&handle.session).render_cycle()?;
        // A disconnect may have landed while the cycle ran; its result is
        // discarded rather than transmitted.
        if !handle.live.load(Ordering::SeqCst) {
            return Err(Error::Disconnected);
        }
        Ok(update)
    }

    /// Tear a session down. Returns false if it was already gone.
    pub fn disconnect(&self, id: SessionId) -> bool {
        let Some(handle) = lock(&self.sessions).remove(&id) else {
            return false;
        };
        handle.live.store(false, Ordering::SeqCst);
        lock(&handle.session).disconnect();
        true
    }

    pub fn contains(&self, id: SessionId) -> bool {
        lock(&self.sessions).contains_key(&id)
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.sessions).is_empty()
    }

    fn handle(&self, id: SessionId) -> Option<SessionHandle<R, S>> {
        lock(&self.sessions).get(&id).cloned()
    }
}

/// A panic while holding a session lock must not strand the connection, so
/// poisoning is recovered rather than propagated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
