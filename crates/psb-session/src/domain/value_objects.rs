//! Value objects describing what the service did.

use super::entities::{HolderId, SessionId, SourceSlot, ViewHandle};
use super::errors::IntegrityViolation;

/// Result of an open attempt that was not vetoed.
///
/// Everything except `Opened` is a precondition that did not hold; none of
/// them is an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened {
        session: SessionId,
        slot: SourceSlot,
        view: ViewHandle,
    },
    /// The holder already has a session.
    AlreadyActive,
    /// Not the open gesture.
    NotOpenGesture,
    /// Holder lacks the open permission.
    NotPermitted,
    /// Interaction not made with a hand.
    NoHand,
    /// Hand item is not a container item.
    NotContainer,
    /// Container item has no block state metadata yet.
    NoMetadata,
    /// Block state cannot hold contents.
    NotContentCapable,
    /// Embedded contents occupy slots past the configured capacity.
    Overfilled,
    /// The presenter could not show the view.
    PresentationFailed,
}

/// Result of a persistence pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Contents written back into the source item.
    Persisted { slot: SourceSlot, occupied: usize },
    /// No matching session; nothing to do.
    NoSession,
    /// Integrity fault; the session was terminated.
    Faulted(IntegrityViolation),
}

impl PersistOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted { .. })
    }
}

/// What shutdown did with each open session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Holders whose contents were written back before their view closed.
    pub persisted: Vec<HolderId>,
    /// Holders whose session faulted during the final write-back.
    pub faulted: Vec<HolderId>,
    /// Holders that were unreachable; their edits are lost.
    pub abandoned: Vec<HolderId>,
}

impl ShutdownReport {
    pub fn total(&self) -> usize {
        self.persisted.len() + self.faulted.len() + self.abandoned.len()
    }
}

/// Snapshot of the registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub active_sessions: usize,
    pub holders: Vec<HolderId>,
}
