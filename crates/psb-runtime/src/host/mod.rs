//! Host side of the runtime.
//!
//! - `memory`: an in-memory host implementing every outbound port
//! - `taxonomy`: shulker box item classification

pub mod memory;
pub mod taxonomy;

pub use memory::{InMemoryHost, HOTBAR_SIZE, INVENTORY_SIZE};
pub use taxonomy::{ShulkerTaxonomy, SHULKER_BOX_KINDS};

use psb_session::HostEvent;

/// Applies the effect of an event the service allowed.
///
/// The event loop calls this only after the service answered `Allow`, so a
/// vetoed event never reaches the world.
pub trait HostWorld: Send + Sync {
    fn apply(&self, event: &HostEvent);
}
