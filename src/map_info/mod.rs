//! Map item inspection
//!
//! Joins a held map item to the persisted record it refers to:
//!
//! ```text
//! item ──classify──► NotAMap ──► WrongItemKind
//!                  ├► EmptyMap ─► MapInfo::Empty (aux value as potential id, no lookup)
//!                  └► FilledMap ─► read tag fields ─► MapStore lookup ─► MapInfo::Filled
//! ```

mod resolver;
mod result;

pub use resolver::{
    classify_item, decode, dump_raw, ItemKind, MapTagFields, EMPTY_MAP_ID, FILLED_MAP_ID,
    MAP_IS_SCALING_KEY, MAP_NAME_INDEX_KEY, MAP_UUID_KEY, NAME_INDEX_NONE,
};
pub use result::{DecodeError, DecodedMapInfo, MapInfo, RawDump};
