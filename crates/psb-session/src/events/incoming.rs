//! Incoming host events.
//!
//! Every event is observed before the host applies its effect. The service
//! answers with a [`Verdict`](super::outgoing::Verdict); the host only applies
//! the effect on `Allow`.

use crate::domain::{EquipmentSlot, HolderId, ItemStack};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw slot the host reports for clicks outside the window.
pub const OUTSIDE_RAW_SLOT: i32 = -999;

/// Every event the session service reacts to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Interact(InteractEvent),
    DropItem(DropItemEvent),
    ViewClosed(ViewClosedEvent),
    HeldSlotChange(HeldSlotChangeEvent),
    SwapHands(SwapHandsEvent),
    Click(ClickEvent),
    Drag(DragEvent),
}

impl HostEvent {
    /// Holder the event belongs to.
    pub fn holder(&self) -> HolderId {
        match self {
            Self::Interact(e) => e.holder,
            Self::DropItem(e) => e.holder,
            Self::ViewClosed(e) => e.holder,
            Self::HeldSlotChange(e) => e.holder,
            Self::SwapHands(e) => e.holder,
            Self::Click(e) => e.holder,
            Self::Drag(e) => e.holder,
        }
    }
}

/// What the holder did with the interact gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractAction {
    RightClickAir,
    RightClickBlock,
    LeftClickAir,
    LeftClickBlock,
    Physical,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractEvent {
    pub holder: HolderId,
    pub action: InteractAction,
    /// Hand used. `None` for physical interactions.
    pub hand: Option<EquipmentSlot>,
}

impl InteractEvent {
    /// The open gesture with the main hand.
    pub fn open_gesture(holder: HolderId) -> Self {
        Self {
            holder,
            action: InteractAction::RightClickAir,
            hand: Some(EquipmentSlot::Hand),
        }
    }
}

/// The holder is dropping an item into the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropItemEvent {
    pub holder: HolderId,
    pub item: ItemStack,
    #[serde(default)]
    pub cancelled: bool,
}

/// The holder's view was closed, by the holder or by a forced close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewClosedEvent {
    pub holder: HolderId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldSlotChangeEvent {
    pub holder: HolderId,
    pub previous: u8,
    pub new: u8,
    #[serde(default)]
    pub cancelled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapHandsEvent {
    pub holder: HolderId,
    #[serde(default)]
    pub cancelled: bool,
}

/// Kind of click performed inside an open view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickType {
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    Middle,
    /// Hotbar number key; see [`ClickEvent::hotbar_button`].
    NumberKey,
    DoubleClick,
    Drop,
    ControlDrop,
    /// Swap with the off hand from inside the window.
    SwapOffhand,
    WindowBorderLeft,
    WindowBorderRight,
    Unknown,
}

/// A click inside the holder's open view.
///
/// Raw slots `0..top_size` belong to the container view, the following ones
/// to the holder's own inventory; negative raw slots are outside the window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub holder: HolderId,
    pub click: ClickType,
    pub raw_slot: i32,
    pub top_size: usize,
    /// Item in the clicked slot.
    #[serde(default)]
    pub current_item: Option<ItemStack>,
    /// Item on the holder's cursor.
    #[serde(default)]
    pub cursor: Option<ItemStack>,
    /// Hotbar index for `NumberKey` clicks.
    #[serde(default)]
    pub hotbar_button: Option<u8>,
    #[serde(default)]
    pub cancelled: bool,
}

impl ClickEvent {
    pub fn new(holder: HolderId, click: ClickType, raw_slot: i32, top_size: usize) -> Self {
        Self {
            holder,
            click,
            raw_slot,
            top_size,
            current_item: None,
            cursor: None,
            hotbar_button: None,
            cancelled: false,
        }
    }

    #[must_use]
    pub fn with_current_item(mut self, item: ItemStack) -> Self {
        self.current_item = Some(item);
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, item: ItemStack) -> Self {
        self.cursor = Some(item);
        self
    }

    #[must_use]
    pub fn with_hotbar_button(mut self, button: u8) -> Self {
        self.hotbar_button = Some(button);
        self
    }
}

/// A drag spreading the cursor item over several slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEvent {
    pub holder: HolderId,
    pub top_size: usize,
    /// Item on the cursor when the drag started.
    #[serde(default)]
    pub dragged: Option<ItemStack>,
    /// Items the drag places, keyed by raw slot.
    pub new_items: BTreeMap<usize, ItemStack>,
    /// Cursor after the drag.
    #[serde(default)]
    pub remaining_cursor: Option<ItemStack>,
    #[serde(default)]
    pub cancelled: bool,
}
