//! Error types for the session subsystem.

use super::entities::{HolderId, SourceSlot};
use thiserror::Error;

/// Registry misuse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The holder already has an open session.
    #[error("holder {holder} already has an active session")]
    AlreadyActive { holder: HolderId },
}

/// A broken correspondence between the source item and the open view.
///
/// Always terminal for the session it is detected on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    /// The source slot no longer holds a container item.
    #[error("no container item in {slot}")]
    MissingContainerItem { slot: SourceSlot },

    /// The container item lost its block state metadata.
    #[error("container item in {slot} has no block state metadata")]
    MissingMetadata { slot: SourceSlot },

    /// The embedded block state cannot hold contents.
    #[error("container item in {slot} has no content-holding state")]
    NotContentCapable { slot: SourceSlot },

    /// The presenter no longer knows the session's view.
    #[error("view contents are no longer readable")]
    ViewUnavailable,
}

/// Result type for registry operations.
pub type SessionResult<T> = Result<T, SessionError>;
