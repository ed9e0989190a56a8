//! Map Info
//!
//! Inspects a player's held map item: decodes the map fields stored in the
//! item's tag payload, resolves them against the world's persisted map
//! records, and renders the result for the `/mapinfo` command.

pub mod client;
pub mod config;
pub mod error;
pub mod map_info;
pub mod plugin;
pub mod state;
pub use mapinfo_nbt as nbt;

pub use error::{Error, Result};
pub use config::Config;
pub use map_info::{
    classify_item, decode, dump_raw, DecodeError, DecodedMapInfo, ItemKind, MapInfo, RawDump,
};
pub use state::{
    ItemStack, MapDataStore, MapId, MapOrigin, MapRecord, MapStore, Player, PlayerId, World,
};
pub use client::{CommandError, CommandOrigin, CommandResult, MapInfoCommand, OutputStyle};
pub use plugin::{CommandRegistrar, MapInfoPlugin, PluginState};
