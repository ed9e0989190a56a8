pub mod inventory;
pub mod map_data;
pub mod player;
pub mod world;

pub use inventory::{Inventory, InventorySlot, ItemStack, VANILLA_NAMESPACE};
pub use map_data::{Dimension, MapDataStore, MapId, MapOrigin, MapRecord, MapStore, MAP_SIZE};
pub use player::{Player, PlayerId, HOTBAR_SIZE, PLAYER_INVENTORY_SIZE};
pub use world::World;

use crate::error::{Error, Result};

/// Byte fields that are unsigned in the game but stored as signed tags
pub(crate) fn unsigned_byte(key: &'static str, value: i8) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::OutOfRange { key, value: value.into() })
}
