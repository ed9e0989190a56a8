use mapinfo_nbt::{CompoundTag, SnbtStyle, TagError};
use tracing::debug;

use super::result::{DecodeError, DecodedMapInfo, MapInfo, RawDump};
use crate::state::inventory::ItemStack;
use crate::state::map_data::{MapId, MapStore};

pub const EMPTY_MAP_ID: &str = "map";
pub const FILLED_MAP_ID: &str = "filled_map";

pub const MAP_UUID_KEY: &str = "map_uuid";
pub const MAP_IS_SCALING_KEY: &str = "map_is_scaling";
pub const MAP_NAME_INDEX_KEY: &str = "map_name_index";

/// Stored name index meaning "no name"
pub const NAME_INDEX_NONE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    NotAMap,
    EmptyMap,
    FilledMap,
}

/// Classify by raw name id alone
pub fn classify_item(item: &ItemStack) -> ItemKind {
    match item.raw_name_id() {
        EMPTY_MAP_ID => ItemKind::EmptyMap,
        FILLED_MAP_ID => ItemKind::FilledMap,
        _ => ItemKind::NotAMap,
    }
}

/// Map fields carried in a filled map's tag payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapTagFields {
    pub map_id: Option<MapId>,
    pub is_scaling: bool,
    pub name_index: Option<i32>,
}

impl MapTagFields {
    /// Read the map fields. Only the id matters for resolution; the other
    /// two fall back to `false` / `None` when absent or of the wrong kind.
    pub fn read(user_data: Option<&CompoundTag>) -> Self {
        let Some(tag) = user_data else {
            return Self::default();
        };

        let map_id = optional(tag.get_as::<i64>(MAP_UUID_KEY))
            .map(MapId)
            .filter(|id| id.is_valid());
        let is_scaling = optional(tag.get_as::<bool>(MAP_IS_SCALING_KEY)).unwrap_or(false);
        // Absent and an explicit -1 both mean "no name index"
        let name_index = optional(tag.get_as::<i32>(MAP_NAME_INDEX_KEY))
            .filter(|&i| i != NAME_INDEX_NONE);

        Self {
            map_id,
            is_scaling,
            name_index,
        }
    }
}

fn optional<T>(result: Result<T, TagError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e @ TagError::WrongType { .. }) => {
            debug!(error = %e, "ignoring map tag of unexpected kind");
            None
        }
        Err(TagError::NotFound { .. }) => None,
    }
}

fn require_map(item: &ItemStack) -> Result<ItemKind, DecodeError> {
    match classify_item(item) {
        ItemKind::NotAMap => Err(DecodeError::WrongItemKind {
            name: item.raw_name_id().to_owned(),
        }),
        kind => Ok(kind),
    }
}

/// Decode a held map into its metadata.
///
/// Empty maps never touch `store`. For filled maps a missing record is
/// reported as [`DecodeError::RecordNotFound`], which callers should
/// present as retryable.
pub fn decode<S: MapStore + ?Sized>(item: &ItemStack, store: &S) -> Result<MapInfo, DecodeError> {
    if require_map(item)? == ItemKind::EmptyMap {
        return Ok(MapInfo::Empty {
            potential_id: item.aux_value as i64,
        });
    }

    let fields = MapTagFields::read(item.user_data.as_ref());
    let id = fields.map_id.ok_or(DecodeError::MissingIdentifier)?;
    let record = store
        .map_saved_data(id)
        .ok_or(DecodeError::RecordNotFound { id })?;

    debug!(id = id.0, scale = record.scale, "resolved map record");

    Ok(MapInfo::Filled(DecodedMapInfo {
        id,
        scale: record.scale,
        locked: record.locked,
        origin: record.origin,
        is_scaling: fields.is_scaling,
        name_index: fields.name_index,
    }))
}

/// Render the item's raw tag payload as SNBT
pub fn dump_raw(item: &ItemStack, style: SnbtStyle) -> Result<RawDump, DecodeError> {
    require_map(item)?;
    Ok(match &item.user_data {
        Some(tag) => RawDump::Snbt(mapinfo_nbt::to_snbt(tag, style)),
        None => RawDump::NoData,
    })
}
