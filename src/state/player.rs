use crate::state::inventory::{Inventory, ItemStack};

/// Player identifier
pub type PlayerId = u64;

/// Hotbar slots plus main inventory
pub const PLAYER_INVENTORY_SIZE: usize = 36;
pub const HOTBAR_SIZE: usize = 9;

/// Player state
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub inventory: Inventory,
    /// Selected hotbar slot
    pub selected_slot: usize,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            inventory: Inventory::new(PLAYER_INVENTORY_SIZE),
            selected_slot: 0,
        }
    }

    /// The item in the main hand, `None` when the hand is empty
    pub fn carried_item(&self) -> Option<&ItemStack> {
        self.inventory.get(self.selected_slot)
    }

    /// Put a stack into the selected slot
    pub fn set_carried_item(&mut self, stack: Option<ItemStack>) {
        self.inventory.set(self.selected_slot, stack);
    }

    pub fn select_slot(&mut self, slot: usize) {
        if slot < HOTBAR_SIZE {
            self.selected_slot = slot;
        }
    }
}
