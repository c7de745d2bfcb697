//! Configuration for the session subsystem

use crate::domain::DEFAULT_CONTAINER_CAPACITY;
use serde::{Deserialize, Serialize};

/// Session configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// View title when the item has no display name
    pub default_title: String,
    /// Permission node required for the open gesture
    pub open_permission: String,
    /// Number of entries a container holds
    pub container_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_title: "Shulker Box".to_string(),
            open_permission: "portableshulkerbox.open".to_string(),
            container_capacity: DEFAULT_CONTAINER_CAPACITY,
        }
    }
}
