//! # Interaction Classification
//!
//! Decides, from the event alone, whether a click or drag can change the open
//! view's contents and whether it would move a container item.
//!
//! The rules over-trigger on purpose: a click whose effect depends on the
//! host's transfer rules (shift-click, double-click collect, unknown types)
//! counts as content-changing even when it starts in the holder's inventory.
//! A spurious persistence writes identical contents; a missed one loses edits.
//!
//! | Region touched | Click type | Class |
//! |----------------|------------|-------|
//! | outside window | any | passive |
//! | view | any | content-changing |
//! | holder inventory | shift, double-click, unknown | content-changing |
//! | holder inventory | other | passive |

use super::entities::ItemStack;
use crate::events::{ClickEvent, ClickType, DragEvent};

/// Part of the interaction surface a raw slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewRegion {
    /// The container view being edited.
    View,
    /// The holder's own inventory below it.
    HolderInventory,
    /// Outside the window (border clicks, drops to the world).
    Outside,
}

impl ViewRegion {
    pub fn of(raw_slot: i32, top_size: usize) -> Self {
        match usize::try_from(raw_slot) {
            Err(_) => Self::Outside,
            Ok(slot) if slot < top_size => Self::View,
            Ok(_) => Self::HolderInventory,
        }
    }
}

/// Whether an interaction can change the view's contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeClass {
    ContentChanging,
    Passive,
}

impl ChangeClass {
    pub fn is_content_changing(self) -> bool {
        matches!(self, Self::ContentChanging)
    }
}

pub fn classify_click(event: &ClickEvent) -> ChangeClass {
    match ViewRegion::of(event.raw_slot, event.top_size) {
        ViewRegion::Outside => ChangeClass::Passive,
        ViewRegion::View => ChangeClass::ContentChanging,
        ViewRegion::HolderInventory => match event.click {
            ClickType::ShiftLeft
            | ClickType::ShiftRight
            | ClickType::DoubleClick
            | ClickType::Unknown => ChangeClass::ContentChanging,
            _ => ChangeClass::Passive,
        },
    }
}

pub fn classify_drag(event: &DragEvent) -> ChangeClass {
    if event.new_items.keys().any(|slot| *slot < event.top_size) {
        ChangeClass::ContentChanging
    } else {
        ChangeClass::Passive
    }
}

/// Whether a click would move a container item.
///
/// `addressed` is the holder item the click swaps with when it is not in the
/// event itself: the hotbar item for `NumberKey`, the off-hand item for
/// `SwapOffhand`.
pub fn click_moves_container(
    event: &ClickEvent,
    addressed: Option<&ItemStack>,
    is_container: impl Fn(&ItemStack) -> bool,
) -> bool {
    event
        .current_item
        .iter()
        .chain(event.cursor.iter())
        .chain(addressed)
        .any(is_container)
}

/// Whether a drag would move a container item.
pub fn drag_moves_container(event: &DragEvent, is_container: impl Fn(&ItemStack) -> bool) -> bool {
    event
        .dragged
        .iter()
        .chain(event.new_items.values())
        .any(is_container)
}
