//! Shulker box item taxonomy.

use psb_session::ports::ItemTaxonomy;
use psb_session::ItemStack;

/// Every shulker box item kind: the undyed one and the sixteen colours.
pub const SHULKER_BOX_KINDS: [&str; 17] = [
    "minecraft:shulker_box",
    "minecraft:white_shulker_box",
    "minecraft:orange_shulker_box",
    "minecraft:magenta_shulker_box",
    "minecraft:light_blue_shulker_box",
    "minecraft:yellow_shulker_box",
    "minecraft:lime_shulker_box",
    "minecraft:pink_shulker_box",
    "minecraft:gray_shulker_box",
    "minecraft:light_gray_shulker_box",
    "minecraft:cyan_shulker_box",
    "minecraft:purple_shulker_box",
    "minecraft:blue_shulker_box",
    "minecraft:brown_shulker_box",
    "minecraft:green_shulker_box",
    "minecraft:red_shulker_box",
    "minecraft:black_shulker_box",
];

#[derive(Clone, Copy, Debug, Default)]
pub struct ShulkerTaxonomy;

impl ItemTaxonomy for ShulkerTaxonomy {
    fn is_container(&self, item: &ItemStack) -> bool {
        SHULKER_BOX_KINDS.contains(&item.kind.as_str())
    }
}
