//! # Inbound Port - PortableContainerApi
//!
//! Entry points the host's event dispatch calls into. Every handler resolves
//! fully before returning; integrity faults are handled inside and never
//! surface as errors.
//!
//! | Method | Host event | Possible effect |
//! |--------|------------|-----------------|
//! | `on_interact` | interact | open session / veto |
//! | `on_drop_item` | item drop | veto + forced close |
//! | `on_view_closed` | view closed | persist + end session |
//! | `on_held_slot_change` | hotbar change | veto |
//! | `on_swap_hands` | hand swap | veto |
//! | `on_click` | window click | veto / schedule persist / fault |
//! | `on_drag` | window drag | veto / schedule persist / fault |

use crate::domain::{
    ActiveSession, HolderId, PersistOutcome, SessionStatus, ShutdownReport,
};
use crate::events::{
    ClickEvent, DeferredTask, DragEvent, DropItemEvent, HeldSlotChangeEvent, HostEvent,
    InteractEvent, SwapHandsEvent, ViewClosedEvent, Verdict,
};

/// Primary API of the session subsystem.
pub trait PortableContainerApi {
    /// Dispatches any host event to its handler.
    fn handle_event(&mut self, event: &HostEvent) -> Verdict {
        match event {
            HostEvent::Interact(e) => self.on_interact(e),
            HostEvent::DropItem(e) => self.on_drop_item(e),
            HostEvent::ViewClosed(e) => {
                self.on_view_closed(e);
                Verdict::Allow
            }
            HostEvent::HeldSlotChange(e) => self.on_held_slot_change(e),
            HostEvent::SwapHands(e) => self.on_swap_hands(e),
            HostEvent::Click(e) => self.on_click(e),
            HostEvent::Drag(e) => self.on_drag(e),
        }
    }

    /// Open attempt, or a blocked interaction while a session is open.
    fn on_interact(&mut self, event: &InteractEvent) -> Verdict;

    fn on_drop_item(&mut self, event: &DropItemEvent) -> Verdict;

    /// Final persistence and session teardown.
    fn on_view_closed(&mut self, event: &ViewClosedEvent) -> PersistOutcome;

    fn on_held_slot_change(&mut self, event: &HeldSlotChangeEvent) -> Verdict;

    fn on_swap_hands(&mut self, event: &SwapHandsEvent) -> Verdict;

    fn on_click(&mut self, event: &ClickEvent) -> Verdict;

    fn on_drag(&mut self, event: &DragEvent) -> Verdict;

    /// Runs a continuation previously handed to the scheduler.
    fn run_deferred(&mut self, task: DeferredTask) -> PersistOutcome;

    /// Writes the view back into the holder's source item.
    fn persist(&mut self, holder: &HolderId) -> PersistOutcome;

    /// Closes every session and clears the registry.
    fn shutdown(&mut self) -> ShutdownReport;

    fn session(&self, holder: &HolderId) -> Option<&ActiveSession>;

    fn status(&self) -> SessionStatus;
}
