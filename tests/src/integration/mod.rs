//! # Integration Harness
//!
//! One holder, one event loop, one in-memory host. Every `send` drains the
//! loop, so deferred persists and forced closes have landed when it returns.

pub mod properties;
pub mod replay;

use psb_runtime::host::memory::HostView;
use psb_runtime::{InMemoryHost, SessionEventLoop, ShulkerTaxonomy};
use psb_session::domain::{Contents, HolderId, ItemMeta, ItemStack, SourceSlot};
use psb_session::events::{ClickEvent, HostEvent, InteractEvent, ViewClosedEvent};
use psb_session::ports::HolderGateway;
use psb_session::SessionConfig;
use std::sync::Arc;

/// Size of the container view.
pub const TOP: usize = 27;
/// Raw slot of the first inventory slot below the view.
pub const FIRST_INVENTORY_RAW: i32 = TOP as i32;

pub type Loop = SessionEventLoop<ShulkerTaxonomy, InMemoryHost>;

pub struct Harness {
    pub event_loop: Loop,
    pub host: Arc<InMemoryHost>,
    pub holder: HolderId,
}

impl Harness {
    /// A permitted holder with `item` in the selected hotbar slot.
    pub fn with_item(item: ItemStack) -> Self {
        let config = SessionConfig::default();
        let permission = config.open_permission.clone();
        let (event_loop, host) = SessionEventLoop::in_memory(config);
        let holder = HolderId::new_random();
        host.join(holder);
        host.grant(holder, permission);
        host.set_inventory_item(holder, 0, Some(item));
        Self {
            event_loop,
            host,
            holder,
        }
    }

    /// Adds another permitted holder to the same world.
    pub fn add_holder(&self, item: ItemStack) -> HolderId {
        let holder = HolderId::new_random();
        self.host.join(holder);
        self.host
            .grant(holder, self.event_loop.service().config().open_permission.clone());
        self.host.set_inventory_item(holder, 0, Some(item));
        holder
    }

    /// Submits an event and drains the loop.
    pub fn send(&mut self, event: HostEvent) {
        self.event_loop.submit(event);
        self.event_loop.run_until_idle();
    }

    pub fn open(&mut self) {
        self.open_for(self.holder);
    }

    pub fn open_for(&mut self, holder: HolderId) {
        self.send(HostEvent::Interact(InteractEvent::open_gesture(holder)));
    }

    /// The holder closes the view.
    pub fn close(&mut self) {
        self.send(HostEvent::ViewClosed(ViewClosedEvent {
            holder: self.holder,
        }));
    }

    pub fn click(&mut self, click: ClickEvent) {
        self.send(HostEvent::Click(click));
    }

    pub fn view(&self) -> Option<HostView> {
        self.host.view(self.host.view_of(self.holder)?)
    }

    pub fn main_hand(&self) -> Option<ItemStack> {
        self.host.hand_item(&self.holder, SourceSlot::Primary)
    }

    /// Contents embedded in the main hand item.
    pub fn stored(&self) -> Option<Contents> {
        embedded(&self.main_hand()?)
    }

    pub fn shulkers_in_world(&self) -> usize {
        self.host.count_stacks(is_shulker)
    }
}

pub fn shulker(entries: Vec<ItemStack>) -> ItemStack {
    ItemStack::new("minecraft:shulker_box", 1)
        .with_meta(ItemMeta::container(Contents::with_entries(TOP, entries)))
}

pub fn named_shulker(name: &str, entries: Vec<ItemStack>) -> ItemStack {
    ItemStack::new("minecraft:lime_shulker_box", 1)
        .with_meta(ItemMeta::container(Contents::with_entries(TOP, entries)).named(name))
}

pub fn item(kind: &str, amount: u8) -> ItemStack {
    ItemStack::new(format!("minecraft:{kind}"), amount)
}

pub fn is_shulker(item: &ItemStack) -> bool {
    item.kind.as_str().ends_with("shulker_box")
}

pub fn embedded(item: &ItemStack) -> Option<Contents> {
    item.block_state()?.contents().cloned()
}
