//! # In-Memory Host
//!
//! A single-process stand-in for the host runtime: holders with inventories,
//! presented views and a list of items dropped into the world.
//!
//! ## Raw Slot Layout
//!
//! | Raw slot | Region |
//! |----------|--------|
//! | `0..top_size` | open view |
//! | `top_size..top_size + 27` | inventory `9..36` |
//! | `top_size + 27..top_size + 36` | hotbar, inventory `0..9` |
//! | negative | outside the window |
//!
//! Forced closes are not applied immediately. `close_view` enqueues a
//! `ViewClosed` event on the loop, so the service persists from the view
//! before the host tears it down.

use super::HostWorld;
use crate::event_loop::LoopSender;
use parking_lot::RwLock;
use psb_session::domain::{Contents, HolderId, ItemStack, SourceSlot, ViewHandle};
use psb_session::events::{
    ClickEvent, ClickType, DragEvent, DropItemEvent, HostEvent, ViewClosedEvent,
};
use psb_session::ports::{HolderGateway, ViewPresenter};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Slots in a holder's inventory.
pub const INVENTORY_SIZE: usize = 36;
/// Slots in the hotbar, the first part of the inventory.
pub const HOTBAR_SIZE: usize = 9;
/// Inventory slots above the hotbar.
const STORAGE_SIZE: usize = INVENTORY_SIZE - HOTBAR_SIZE;

/// Snapshot of one holder.
#[derive(Clone, Debug, PartialEq)]
pub struct HolderState {
    pub inventory: Vec<Option<ItemStack>>,
    pub off_hand: Option<ItemStack>,
    /// Selected hotbar index; the main hand.
    pub selected: usize,
    pub cursor: Option<ItemStack>,
    pub permissions: HashSet<String>,
    pub online: bool,
    pub view: Option<ViewHandle>,
}

impl HolderState {
    fn new() -> Self {
        Self {
            inventory: vec![None; INVENTORY_SIZE],
            off_hand: None,
            selected: 0,
            cursor: None,
            permissions: HashSet::new(),
            online: true,
            view: None,
        }
    }

    fn hand_mut(&mut self, slot: SourceSlot) -> &mut Option<ItemStack> {
        match slot {
            SourceSlot::Primary => &mut self.inventory[self.selected],
            SourceSlot::Secondary => &mut self.off_hand,
        }
    }

    fn hand(&self, slot: SourceSlot) -> Option<&ItemStack> {
        match slot {
            SourceSlot::Primary => self.inventory[self.selected].as_ref(),
            SourceSlot::Secondary => self.off_hand.as_ref(),
        }
    }

    fn stash(&mut self, item: ItemStack) -> Option<ItemStack> {
        match self.inventory.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(item);
                None
            }
            None => Some(item),
        }
    }
}

/// A view as the host presents it.
#[derive(Clone, Debug, PartialEq)]
pub struct HostView {
    pub holder: HolderId,
    pub title: String,
    pub contents: Contents,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    View(usize),
    Inventory(usize),
}

impl Slot {
    fn resolve(raw_slot: usize, top_size: usize) -> Option<Self> {
        if raw_slot < top_size {
            return Some(Self::View(raw_slot));
        }
        let bottom = raw_slot - top_size;
        if bottom < STORAGE_SIZE {
            Some(Self::Inventory(HOTBAR_SIZE + bottom))
        } else if bottom < INVENTORY_SIZE {
            Some(Self::Inventory(bottom - STORAGE_SIZE))
        } else {
            None
        }
    }
}

#[derive(Default)]
struct World {
    holders: HashMap<HolderId, HolderState>,
    views: HashMap<ViewHandle, HostView>,
    next_view: u64,
    drops: Vec<(HolderId, ItemStack)>,
}

impl World {
    fn slot_mut(&mut self, holder: &HolderId, slot: Slot) -> Option<&mut Option<ItemStack>> {
        match slot {
            Slot::View(index) => {
                let view = self.holders.get(holder)?.view?;
                self.views.get_mut(&view)?.contents.slot_mut(index)
            }
            Slot::Inventory(index) => self.holders.get_mut(holder)?.inventory.get_mut(index),
        }
    }

    fn take(&mut self, holder: &HolderId, slot: Slot) -> Option<ItemStack> {
        self.slot_mut(holder, slot)?.take()
    }

    /// Puts `item` into `slot`, returning what was there. When the slot does
    /// not exist the item comes back unchanged.
    fn put(&mut self, holder: &HolderId, slot: Slot, item: Option<ItemStack>) -> Option<ItemStack> {
        match self.slot_mut(holder, slot) {
            Some(target) => std::mem::replace(target, item),
            None => item,
        }
    }

    fn drop_into_world(&mut self, holder: HolderId, item: Option<ItemStack>) {
        if let Some(item) = item {
            self.drops.push((holder, item));
        }
    }

    fn swap(&mut self, holder: &HolderId, a: Slot, b: Slot) {
        let first = self.take(holder, a);
        let second = self.put(holder, b, first);
        let rest = self.put(holder, a, second);
        self.drop_into_world(*holder, rest);
    }

    fn first_empty(&self, holder: &HolderId, view_side: bool) -> Option<Slot> {
        let state = self.holders.get(holder)?;
        if view_side {
            let view = self.views.get(&state.view?)?;
            view.contents.first_empty().map(Slot::View)
        } else {
            state
                .inventory
                .iter()
                .position(Option::is_none)
                .map(Slot::Inventory)
        }
    }

    fn apply_click(&mut self, event: &ClickEvent) {
        let holder = event.holder;
        let Some(slot) = usize::try_from(event.raw_slot)
            .ok()
            .and_then(|raw| Slot::resolve(raw, event.top_size))
        else {
            if matches!(event.click, ClickType::Left | ClickType::Right) {
                let cursor = self.holders.get_mut(&holder).and_then(|h| h.cursor.take());
                self.drop_into_world(holder, cursor);
            }
            return;
        };

        match event.click {
            ClickType::Left | ClickType::Right => {
                let Some(state) = self.holders.get_mut(&holder) else {
                    return;
                };
                let cursor = state.cursor.take();
                let previous = self.put(&holder, slot, cursor);
                if let Some(state) = self.holders.get_mut(&holder) {
                    state.cursor = previous;
                }
            }
            ClickType::ShiftLeft | ClickType::ShiftRight => {
                let to_view = matches!(slot, Slot::Inventory(_));
                if let Some(target) = self.first_empty(&holder, to_view) {
                    let item = self.take(&holder, slot);
                    let rest = self.put(&holder, target, item);
                    self.drop_into_world(holder, rest);
                }
            }
            ClickType::NumberKey => {
                if let Some(button) = event.hotbar_button.map(usize::from) {
                    if button < HOTBAR_SIZE {
                        self.swap(&holder, slot, Slot::Inventory(button));
                    }
                }
            }
            ClickType::SwapOffhand => {
                let item = self.take(&holder, slot);
                let Some(state) = self.holders.get_mut(&holder) else {
                    return;
                };
                let off_hand = std::mem::replace(&mut state.off_hand, item);
                let rest = self.put(&holder, slot, off_hand);
                self.drop_into_world(holder, rest);
            }
            ClickType::Drop | ClickType::ControlDrop => {
                let item = self.take(&holder, slot);
                self.drop_into_world(holder, item);
            }
            ClickType::Middle
            | ClickType::DoubleClick
            | ClickType::WindowBorderLeft
            | ClickType::WindowBorderRight
            | ClickType::Unknown => {}
        }
    }

    fn apply_drag(&mut self, event: &DragEvent) {
        let holder = event.holder;
        for (raw, item) in &event.new_items {
            if let Some(slot) = Slot::resolve(*raw, event.top_size) {
                let replaced = self.put(&holder, slot, Some(item.clone()));
                if replaced.is_some() {
                    debug!("[psb-host] Drag replaced an occupied slot of {}", holder);
                }
            }
        }
        if let Some(state) = self.holders.get_mut(&holder) {
            state.cursor = event.remaining_cursor.clone();
        }
    }

    fn apply_drop(&mut self, event: &DropItemEvent) {
        let item = self
            .holders
            .get_mut(&event.holder)
            .and_then(|state| state.hand_mut(SourceSlot::Primary).take());
        self.drop_into_world(event.holder, item);
    }

    fn apply_close(&mut self, event: &ViewClosedEvent) {
        let Some(state) = self.holders.get_mut(&event.holder) else {
            return;
        };
        let Some(view) = state.view.take() else {
            return;
        };
        let leftover = state.cursor.take().and_then(|item| state.stash(item));
        self.views.remove(&view);
        self.drop_into_world(event.holder, leftover);
    }
}

/// In-memory host implementing the holder and view ports.
pub struct InMemoryHost {
    world: RwLock<World>,
    outbox: LoopSender,
}

impl InMemoryHost {
    pub fn new(outbox: LoopSender) -> Self {
        Self {
            world: RwLock::new(World::default()),
            outbox,
        }
    }

    /// Adds an online holder with an empty inventory.
    pub fn join(&self, holder: HolderId) {
        self.world
            .write()
            .holders
            .entry(holder)
            .or_insert_with(HolderState::new);
    }

    pub fn grant(&self, holder: HolderId, node: impl Into<String>) {
        if let Some(state) = self.world.write().holders.get_mut(&holder) {
            state.permissions.insert(node.into());
        }
    }

    pub fn set_online(&self, holder: HolderId, online: bool) {
        if let Some(state) = self.world.write().holders.get_mut(&holder) {
            state.online = online;
        }
    }

    pub fn set_inventory_item(&self, holder: HolderId, index: usize, item: Option<ItemStack>) {
        let mut world = self.world.write();
        if let Some(slot) = world
            .holders
            .get_mut(&holder)
            .and_then(|state| state.inventory.get_mut(index))
        {
            *slot = item;
        }
    }

    pub fn set_cursor(&self, holder: HolderId, item: Option<ItemStack>) {
        if let Some(state) = self.world.write().holders.get_mut(&holder) {
            state.cursor = item;
        }
    }

    pub fn select(&self, holder: HolderId, index: usize) {
        if index >= HOTBAR_SIZE {
            return;
        }
        if let Some(state) = self.world.write().holders.get_mut(&holder) {
            state.selected = index;
        }
    }

    pub fn holder(&self, holder: HolderId) -> Option<HolderState> {
        self.world.read().holders.get(&holder).cloned()
    }

    /// View currently presented to the holder.
    pub fn view_of(&self, holder: HolderId) -> Option<ViewHandle> {
        self.world.read().holders.get(&holder)?.view
    }

    pub fn view(&self, view: ViewHandle) -> Option<HostView> {
        self.world.read().views.get(&view).cloned()
    }

    /// Edits a view directly, bypassing the event stream.
    pub fn edit_view(&self, view: ViewHandle, index: usize, item: Option<ItemStack>) {
        if let Some(v) = self.world.write().views.get_mut(&view) {
            v.contents.set(index, item);
        }
    }

    pub fn world_drops(&self) -> Vec<(HolderId, ItemStack)> {
        self.world.read().drops.clone()
    }

    /// Number of stacks matching `predicate` anywhere in the world:
    /// inventories, hands, cursors, open views and drops. Contents embedded
    /// inside items are not searched.
    pub fn count_stacks(&self, predicate: impl Fn(&ItemStack) -> bool) -> usize {
        let world = self.world.read();
        let held = world.holders.values().flat_map(|state| {
            state
                .inventory
                .iter()
                .flatten()
                .chain(state.off_hand.iter())
                .chain(state.cursor.iter())
        });
        let viewed = world.views.values().flat_map(|view| view.contents.entries());
        let dropped = world.drops.iter().map(|(_, item)| item);
        let count = held
            .chain(viewed)
            .chain(dropped)
            .filter(|&item| predicate(item))
            .count();
        count
    }
}

impl HostWorld for InMemoryHost {
    fn apply(&self, event: &HostEvent) {
        let mut world = self.world.write();
        match event {
            HostEvent::Interact(_) => {}
            HostEvent::DropItem(e) => world.apply_drop(e),
            HostEvent::ViewClosed(e) => world.apply_close(e),
            HostEvent::HeldSlotChange(e) => {
                let index = usize::from(e.new);
                if let (Some(state), true) = (world.holders.get_mut(&e.holder), index < HOTBAR_SIZE)
                {
                    state.selected = index;
                }
            }
            HostEvent::SwapHands(e) => {
                if let Some(state) = world.holders.get_mut(&e.holder) {
                    let selected = state.selected;
                    std::mem::swap(&mut state.inventory[selected], &mut state.off_hand);
                }
            }
            HostEvent::Click(e) => world.apply_click(e),
            HostEvent::Drag(e) => world.apply_drag(e),
        }
    }
}

impl HolderGateway for InMemoryHost {
    fn hand_item(&self, holder: &HolderId, slot: SourceSlot) -> Option<ItemStack> {
        self.world.read().holders.get(holder)?.hand(slot).cloned()
    }

    fn set_hand_item(&self, holder: &HolderId, slot: SourceSlot, item: Option<ItemStack>) {
        if let Some(state) = self.world.write().holders.get_mut(holder) {
            *state.hand_mut(slot) = item;
        }
    }

    fn inventory_item(&self, holder: &HolderId, index: usize) -> Option<ItemStack> {
        self.world
            .read()
            .holders
            .get(holder)?
            .inventory
            .get(index)?
            .clone()
    }

    fn has_permission(&self, holder: &HolderId, node: &str) -> bool {
        self.world
            .read()
            .holders
            .get(holder)
            .is_some_and(|state| state.permissions.contains(node))
    }

    fn is_reachable(&self, holder: &HolderId) -> bool {
        self.world
            .read()
            .holders
            .get(holder)
            .is_some_and(|state| state.online)
    }
}

impl ViewPresenter for InMemoryHost {
    fn open_view(&self, holder: &HolderId, seed: Contents, title: &str) -> Option<ViewHandle> {
        let mut world = self.world.write();
        if !world.holders.get(holder).is_some_and(|state| state.online) {
            return None;
        }
        world.next_view += 1;
        let handle = ViewHandle(world.next_view);
        world.views.insert(
            handle,
            HostView {
                holder: *holder,
                title: title.to_string(),
                contents: seed,
            },
        );
        let replaced = world
            .holders
            .get_mut(holder)
            .and_then(|state| state.view.replace(handle));
        if let Some(old) = replaced {
            world.views.remove(&old);
        }
        Some(handle)
    }

    fn close_view(&self, holder: &HolderId) {
        if self.view_of(*holder).is_some() {
            self.outbox
                .host_event(HostEvent::ViewClosed(ViewClosedEvent { holder: *holder }));
        }
    }

    fn view_contents(&self, view: ViewHandle) -> Option<Contents> {
        self.world
            .read()
            .views
            .get(&view)
            .map(|v| v.contents.clone())
    }
}
