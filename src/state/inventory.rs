use mapinfo_nbt::{CompoundTag, Tag};

use crate::error::Result;
use crate::state::unsigned_byte;

/// Namespace stripped from item names to form the raw name id
pub const VANILLA_NAMESPACE: &str = "minecraft:";

/// One item instance as held in an inventory slot
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    /// Full item name, e.g. `minecraft:filled_map`
    pub name: String,
    /// Auxiliary ("damage") value. Empty maps carry their provisional id here.
    pub aux_value: i16,
    pub count: u8,
    /// Attached tag payload, if any
    pub user_data: Option<CompoundTag>,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, count: u8) -> Self {
        Self {
            name: name.into(),
            aux_value: 0,
            count,
            user_data: None,
        }
    }

    pub fn with_aux(mut self, aux_value: i16) -> Self {
        self.aux_value = aux_value;
        self
    }

    pub fn with_user_data(mut self, user_data: CompoundTag) -> Self {
        self.user_data = Some(user_data);
        self
    }

    /// Name without the vanilla namespace. Other namespaces are kept so a
    /// modded `foo:map` never passes for a vanilla map.
    pub fn raw_name_id(&self) -> &str {
        self.name.strip_prefix(VANILLA_NAMESPACE).unwrap_or(&self.name)
    }

    /// A null stack stands for "nothing held"
    pub fn is_null(&self) -> bool {
        self.count == 0 || matches!(self.raw_name_id(), "" | "air")
    }

    /// Build from the persisted item layout: `Name`, `Damage`, `Count`, `tag`
    pub fn from_compound(compound: &CompoundTag) -> Result<Self> {
        let name = compound.get_as::<&str>("Name")?.to_owned();
        let aux_value = compound.get_opt::<i16>("Damage")?.unwrap_or(0);
        let count = unsigned_byte("Count", compound.get_opt::<i8>("Count")?.unwrap_or(1))?;
        let user_data = compound.get_opt::<&CompoundTag>("tag")?.cloned();
        Ok(Self {
            name,
            aux_value,
            count,
            user_data,
        })
    }

    pub fn to_compound(&self) -> CompoundTag {
        let mut compound = CompoundTag::new()
            .with("Name", self.name.as_str())
            .with("Damage", self.aux_value)
            .with("Count", Tag::Byte(self.count as i8));
        if let Some(tag) = &self.user_data {
            compound.insert("tag", tag.clone());
        }
        compound
    }
}

/// Inventory slot (either empty or contains a stack)
pub type InventorySlot = Option<ItemStack>;

/// A fixed-size container of item slots
#[derive(Debug, Clone)]
pub struct Inventory {
    pub slots: Vec<InventorySlot>,
}

impl Inventory {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Stack in `slot`, treating null stacks as empty
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots
            .get(slot)
            .and_then(|s| s.as_ref())
            .filter(|s| !s.is_null())
    }

    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        if slot < self.slots.len() {
            self.slots[slot] = stack;
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..self.slots.len()).all(|i| self.get(i).is_none())
    }

    /// Find first slot holding an item with this raw name id
    pub fn find_item(&self, raw_name_id: &str) -> Option<usize> {
        (0..self.slots.len()).find(|&i| self.get(i).is_some_and(|s| s.raw_name_id() == raw_name_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_raw_name_id() {
        assert_eq!(ItemStack::new("minecraft:filled_map", 1).raw_name_id(), "filled_map");
        assert_eq!(ItemStack::new("map", 1).raw_name_id(), "map");
        assert_eq!(ItemStack::new("foo:map", 1).raw_name_id(), "foo:map");
    }

    #[test]
    fn test_null_stacks() {
        assert!(ItemStack::new("minecraft:air", 1).is_null());
        assert!(ItemStack::new("", 1).is_null());
        assert!(ItemStack::new("minecraft:map", 0).is_null());
        assert!(!ItemStack::new("minecraft:map", 1).is_null());
    }

    #[test]
    fn test_from_compound() {
        let compound = CompoundTag::new()
            .with("Name", "minecraft:filled_map")
            .with("Damage", 6i16)
            .with("Count", 1i8)
            .with("tag", CompoundTag::new().with("map_uuid", 42i64));
        let item = ItemStack::from_compound(&compound).unwrap();
        assert_eq!(item.raw_name_id(), "filled_map");
        assert_eq!(item.aux_value, 6);
        assert_eq!(item.count, 1);
        assert_eq!(item.user_data.unwrap().get_as::<i64>("map_uuid"), Ok(42));
    }

    #[test]
    fn test_from_compound_defaults_and_errors() {
        let item = ItemStack::from_compound(&CompoundTag::new().with("Name", "minecraft:map")).unwrap();
        assert_eq!(item.aux_value, 0);
        assert_eq!(item.count, 1);
        assert!(item.user_data.is_none());

        assert!(matches!(ItemStack::from_compound(&CompoundTag::new()), Err(Error::Tag(_))));
        let bad = CompoundTag::new().with("Name", "minecraft:map").with("Damage", 1i32);
        assert!(matches!(ItemStack::from_compound(&bad), Err(Error::Tag(_))));
        let negative = CompoundTag::new().with("Name", "minecraft:map").with("Count", -1i8);
        assert!(matches!(
            ItemStack::from_compound(&negative),
            Err(Error::OutOfRange { key: "Count", value: -1 })
        ));
    }

    #[test]
    fn test_compound_roundtrip() {
        let item = ItemStack::new("minecraft:filled_map", 1)
            .with_aux(3)
            .with_user_data(CompoundTag::new().with("map_uuid", -7i64));
        assert_eq!(ItemStack::from_compound(&item.to_compound()).unwrap(), item);
    }

    #[test]
    fn test_inventory_operations() {
        let mut inv = Inventory::new(9);
        assert!(inv.is_empty());

        inv.set(2, Some(ItemStack::new("minecraft:filled_map", 1)));
        inv.set(4, Some(ItemStack::new("minecraft:air", 1)));
        assert!(!inv.is_empty());
        assert_eq!(inv.find_item("filled_map"), Some(2));
        assert_eq!(inv.find_item("map"), None);
        assert!(inv.get(4).is_none());

        inv.set(99, Some(ItemStack::new("minecraft:map", 1)));
        assert_eq!(inv.size(), 9);
    }
}
