//! Outgoing decisions and continuations.

use crate::domain::{HolderId, SessionId};
use serde::{Deserialize, Serialize};

/// Decision on the observed event.
#[must_use = "a vetoed event must not be applied by the host"]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Let the host apply the event.
    Allow,
    /// Suppress the event's effect.
    Veto,
}

impl Verdict {
    pub fn is_veto(self) -> bool {
        matches!(self, Self::Veto)
    }
}

/// Work to run once the current event's effects are committed.
///
/// One-shot and never cancelled; the service re-checks the registry when it
/// runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredTask {
    /// Write the view back into the source item of `session`.
    Persist { holder: HolderId, session: SessionId },
}

impl DeferredTask {
    pub fn holder(&self) -> HolderId {
        match self {
            Self::Persist { holder, .. } => *holder,
        }
    }
}
