//! Outbound (Driven) ports for the session subsystem.
//!
//! The host owns inventories, views, permissions and scheduling; the service
//! only reaches them through these traits.

use crate::domain::{Contents, HolderId, ItemStack, SourceSlot, ViewHandle};
use crate::events::DeferredTask;

/// Item classification supplied by the host's item taxonomy.
pub trait ItemTaxonomy: Send + Sync {
    /// Whether the item is a portable container item.
    fn is_container(&self, item: &ItemStack) -> bool;
}

/// Access to a holder's inventory and attributes.
pub trait HolderGateway: Send + Sync {
    /// Current item in the given hand. Always a fresh read.
    fn hand_item(&self, holder: &HolderId, slot: SourceSlot) -> Option<ItemStack>;

    /// Replaces the item in the given hand.
    fn set_hand_item(&self, holder: &HolderId, slot: SourceSlot, item: Option<ItemStack>);

    /// Item at an inventory index (hotbar is `0..9`).
    fn inventory_item(&self, holder: &HolderId, index: usize) -> Option<ItemStack>;

    fn has_permission(&self, holder: &HolderId, node: &str) -> bool;

    /// Whether the holder is still connected and can have its view closed.
    fn is_reachable(&self, holder: &HolderId) -> bool;
}

/// The host's view subsystem.
pub trait ViewPresenter: Send + Sync {
    /// Presents a new container view seeded with `seed`.
    ///
    /// # Returns
    /// - `Some(handle)`: the view is open
    /// - `None`: the view could not be presented
    fn open_view(&self, holder: &HolderId, seed: Contents, title: &str) -> Option<ViewHandle>;

    /// Forces the holder's view closed. The host delivers its own
    /// view-closed event afterwards.
    fn close_view(&self, holder: &HolderId);

    /// Current contents of a view, or `None` if the presenter no longer
    /// knows it.
    fn view_contents(&self, view: ViewHandle) -> Option<Contents>;
}

/// Scheduling of work after the current event's effects are committed.
pub trait DeferredScheduler: Send + Sync {
    /// Runs `task` once, after the current event, on the same event loop.
    fn schedule_after_current_tick(&self, task: DeferredTask);
}
