//! # Session Registry
//!
//! Maps each holder to at most one [`ActiveSession`].
//!
//! ## Invariants Enforced
//!
//! - At most one session per holder (`begin()` refuses a second one)
//! - A registered session is never replaced in place; it can only be ended
//!   and a new one begun
//! - A holder whose session faulted stays fenced until its view is gone

use super::entities::{ActiveSession, HolderId, SessionId, SourceSlot, ViewHandle};
use super::errors::{SessionError, SessionResult};
use std::collections::HashMap;

/// Owned registry of open sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<HolderId, ActiveSession>,
    /// Faulted holders whose view is still on screen.
    fenced: HashMap<HolderId, ViewHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session for `holder`.
    ///
    /// # Errors
    /// - `AlreadyActive` if the holder already has one. Callers check with
    ///   [`lookup`](Self::lookup) first; this is the backstop.
    pub fn begin(
        &mut self,
        holder: HolderId,
        slot: SourceSlot,
        view: ViewHandle,
    ) -> SessionResult<SessionId> {
        if self.sessions.contains_key(&holder) || self.fenced.contains_key(&holder) {
            return Err(SessionError::AlreadyActive { holder });
        }
        let session = ActiveSession::new(holder, slot, view);
        let id = session.id();
        self.sessions.insert(holder, session);
        Ok(id)
    }

    pub fn lookup(&self, holder: &HolderId) -> Option<&ActiveSession> {
        self.sessions.get(holder)
    }

    pub fn contains(&self, holder: &HolderId) -> bool {
        self.sessions.contains_key(holder)
    }

    /// Removes the holder's session. Absent sessions are not an error.
    pub fn end(&mut self, holder: &HolderId) -> Option<ActiveSession> {
        self.sessions.remove(holder)
    }

    /// Ends the holder's session and fences the holder until the session's
    /// view is closed.
    pub fn fault(&mut self, holder: &HolderId) -> Option<ActiveSession> {
        let session = self.sessions.remove(holder)?;
        self.fenced.insert(*holder, session.view());
        Some(session)
    }

    /// View left open by a faulted session.
    pub fn fenced_view(&self, holder: &HolderId) -> Option<ViewHandle> {
        self.fenced.get(holder).copied()
    }

    pub fn is_fenced(&self, holder: &HolderId) -> bool {
        self.fenced.contains_key(holder)
    }

    /// Lifts the fence once the faulted view is gone.
    pub fn unfence(&mut self, holder: &HolderId) -> bool {
        self.fenced.remove(holder).is_some()
    }

    /// Visits every open session.
    pub fn for_each(&self, mut f: impl FnMut(&HolderId, &ActiveSession)) {
        for (holder, session) in &self.sessions {
            f(holder, session);
        }
    }

    /// Removes and returns every open session and lifts every fence.
    pub fn drain(&mut self) -> Vec<ActiveSession> {
        self.fenced.clear();
        self.sessions.drain().map(|(_, session)| session).collect()
    }

    pub fn holders(&self) -> Vec<HolderId> {
        self.sessions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
