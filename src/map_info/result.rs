use serde::Serialize;

use crate::state::map_data::{MapId, MapOrigin};

/// Decoded view of a filled map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedMapInfo {
    pub id: MapId,
    pub scale: u8,
    pub locked: bool,
    pub origin: MapOrigin,
    /// From the item's tag payload, not the persisted record
    pub is_scaling: bool,
    /// `None` when the tag is absent or holds the -1 sentinel
    pub name_index: Option<i32>,
}

/// Outcome of a successful decode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapInfo {
    /// Blank map: nothing persisted yet, only the provisional id
    Empty { potential_id: i64 },
    Filled(DecodedMapInfo),
}

impl MapInfo {
    pub fn has_data(&self) -> bool {
        matches!(self, Self::Filled(_))
    }
}

/// Outcome of a successful raw dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "snbt", rename_all = "snake_case")]
pub enum RawDump {
    Snbt(String),
    /// The item carries no tag payload. Reported, not an error.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("held item is not a map: {name}")]
    WrongItemKind { name: String },

    #[error("map item has no map_uuid tag")]
    MissingIdentifier,

    #[error("no saved data for map {id}")]
    RecordNotFound { id: MapId },
}
