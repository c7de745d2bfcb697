//! Events module for the session subsystem.
//!
//! - `incoming`: host events observed by the service
//! - `outgoing`: verdicts and deferred continuations produced by it

pub mod incoming;
pub mod outgoing;

pub use incoming::{
    ClickEvent, ClickType, DragEvent, DropItemEvent, HeldSlotChangeEvent, HostEvent,
    InteractAction, InteractEvent, SwapHandsEvent, ViewClosedEvent, OUTSIDE_RAW_SLOT,
};
pub use outgoing::{DeferredTask, Verdict};
