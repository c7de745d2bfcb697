//! Core domain entities for portable container sessions.
//!
//! Item stacks are plain values with structural equality. The service never
//! holds on to an item between observations; it re-reads the source slot
//! through the holder gateway every time it needs one.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default number of entries a portable container holds.
pub const DEFAULT_CONTAINER_CAPACITY: usize = 27;

/// Stable identity of a holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HolderId(pub Uuid);

impl HolderId {
    /// Creates a random holder id.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one open session. A holder gets a fresh id on every open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Equipment slot reported by the host on an interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Hand,
    OffHand,
    Head,
    Chest,
    Legs,
    Feet,
}

/// Which of the holder's two hands holds the container being edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceSlot {
    /// Main hand.
    Primary,
    /// Off hand.
    Secondary,
}

impl SourceSlot {
    /// Maps a host equipment slot to a source slot. Armor slots have no hand
    /// to edit from.
    pub fn from_equipment(slot: Option<EquipmentSlot>) -> Option<Self> {
        match slot? {
            EquipmentSlot::Hand => Some(Self::Primary),
            EquipmentSlot::OffHand => Some(Self::Secondary),
            _ => None,
        }
    }
}

impl fmt::Display for SourceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("main hand"),
            Self::Secondary => f.write_str("off hand"),
        }
    }
}

/// Namespaced item kind, e.g. `minecraft:red_shulker_box`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKind(pub String);

impl ItemKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An item stack value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub amount: u8,
    #[serde(default)]
    pub meta: Option<ItemMeta>,
}

impl ItemStack {
    /// Creates a stack with no metadata.
    pub fn new(kind: impl Into<String>, amount: u8) -> Self {
        Self {
            kind: ItemKind::new(kind),
            amount,
            meta: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: ItemMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Display name, if the metadata carries one.
    pub fn display_name(&self) -> Option<&str> {
        self.meta.as_ref()?.display_name.as_deref()
    }

    /// Embedded block state, if any.
    pub fn block_state(&self) -> Option<&BlockState> {
        match &self.meta.as_ref()?.kind {
            MetaKind::BlockState(state) => Some(state),
            MetaKind::Plain => None,
        }
    }

    /// Mutable access to the embedded contents, if the item carries a
    /// container state.
    pub fn container_contents_mut(&mut self) -> Option<&mut Contents> {
        match &mut self.meta.as_mut()?.kind {
            MetaKind::BlockState(BlockState::Container(state)) => Some(&mut state.contents),
            _ => None,
        }
    }
}

/// Item metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub kind: MetaKind,
}

impl ItemMeta {
    /// Metadata embedding a container state with the given contents.
    pub fn container(contents: Contents) -> Self {
        Self {
            display_name: None,
            kind: MetaKind::BlockState(BlockState::Container(ContainerState { contents })),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Shape of the metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaKind {
    /// No embedded block data.
    #[default]
    Plain,
    /// Embedded block state.
    BlockState(BlockState),
}

/// Block state embedded in an item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    /// Holds contents.
    Container(ContainerState),
    /// Block state without an inventory.
    Inert,
}

impl BlockState {
    pub fn contents(&self) -> Option<&Contents> {
        match self {
            Self::Container(state) => Some(&state.contents),
            Self::Inert => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerState {
    pub contents: Contents,
}

/// Ordered, fixed-capacity list of optional entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contents(Vec<Option<ItemStack>>);

impl Contents {
    /// All-empty contents of the given capacity.
    pub fn empty(capacity: usize) -> Self {
        Self(vec![None; capacity])
    }

    pub fn from_slots(slots: Vec<Option<ItemStack>>) -> Self {
        Self(slots)
    }

    /// Contents of `capacity` slots with `entries` filling the first slots.
    pub fn with_entries(capacity: usize, entries: impl IntoIterator<Item = ItemStack>) -> Self {
        let mut contents = Self::empty(capacity);
        for (slot, entry) in contents.0.iter_mut().zip(entries) {
            *slot = Some(entry);
        }
        contents
    }

    pub fn capacity(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.0.get(index)?.as_ref()
    }

    /// Replaces the entry at `index`, returning the previous one. Out of range
    /// indices leave the contents untouched.
    pub fn set(&mut self, index: usize, item: Option<ItemStack>) -> Option<ItemStack> {
        match self.0.get_mut(index) {
            Some(slot) => std::mem::replace(slot, item),
            None => item,
        }
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Option<ItemStack>> {
        self.0.get_mut(index)
    }

    /// Index of the first empty slot.
    pub fn first_empty(&self) -> Option<usize> {
        self.0.iter().position(Option::is_none)
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ItemStack> {
        self.0.iter().flatten()
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.0
    }

    /// Whether every occupied slot lies below `capacity`.
    pub fn fits(&self, capacity: usize) -> bool {
        self.0.iter().skip(capacity).all(Option::is_none)
    }

    /// Pads with empty slots to `capacity` and drops empty slots past it.
    /// Occupied slots are never dropped, so overfilled contents keep their
    /// length.
    #[must_use]
    pub fn normalized(mut self, capacity: usize) -> Self {
        let used = self
            .0
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1);
        self.0.resize(capacity.max(used), None);
        self
    }
}

/// Handle of a live view presented to a holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewHandle(pub u64);

/// An open editing session.
///
/// `view` is fixed for the lifetime of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSession {
    id: SessionId,
    holder: HolderId,
    slot: SourceSlot,
    view: ViewHandle,
}

impl ActiveSession {
    pub(crate) fn new(holder: HolderId, slot: SourceSlot, view: ViewHandle) -> Self {
        Self {
            id: SessionId::new_random(),
            holder,
            slot,
            view,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn holder(&self) -> HolderId {
        self.holder
    }

    pub fn slot(&self) -> SourceSlot {
        self.slot
    }

    pub fn view(&self) -> ViewHandle {
        self.view
    }
}
