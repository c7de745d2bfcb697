//! Event journals: a recorded world setup plus the host events to replay.
//!
//! ```json
//! {
//!   "holders": [
//!     { "id": "…", "permissions": ["portableshulkerbox.open"],
//!       "inventory": { "0": { "kind": "minecraft:shulker_box", "amount": 1 } } }
//!   ],
//!   "events": [
//!     { "type": "interact", "holder": "…", "action": "right_click_air", "hand": "Hand" }
//!   ]
//! }
//! ```

use crate::host::InMemoryHost;
use psb_session::domain::{HolderId, ItemStack, SourceSlot};
use psb_session::events::HostEvent;
use psb_session::ports::HolderGateway;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Starting state of one holder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HolderSetup {
    pub id: HolderId,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Inventory items keyed by index.
    #[serde(default)]
    pub inventory: BTreeMap<usize, ItemStack>,
    #[serde(default)]
    pub off_hand: Option<ItemStack>,
    #[serde(default)]
    pub selected: usize,
    #[serde(default = "default_online")]
    pub online: bool,
}

fn default_online() -> bool {
    true
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default)]
    pub holders: Vec<HolderSetup>,
    #[serde(default)]
    pub events: Vec<HostEvent>,
}

impl Journal {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Creates every holder of the journal on `host`.
    pub fn install(&self, host: &InMemoryHost) {
        for setup in &self.holders {
            host.join(setup.id);
            for node in &setup.permissions {
                host.grant(setup.id, node.clone());
            }
            for (index, item) in &setup.inventory {
                host.set_inventory_item(setup.id, *index, Some(item.clone()));
            }
            if setup.off_hand.is_some() {
                host.set_hand_item(&setup.id, SourceSlot::Secondary, setup.off_hand.clone());
            }
            host.select(setup.id, setup.selected);
            host.set_online(setup.id, setup.online);
        }
    }
}
