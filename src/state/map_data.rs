//! Persisted map records and the store they are looked up in
//!
//! A map record is written by the world the first time a filled map is
//! used. Each record is a compound of the form:
//!
//! ```text
//! mapId: long           parentMapId: long (-1 = none)
//! dimension: byte       scale: byte
//! xCenter: int          zCenter: int
//! mapLocked: byte       fullyExplored: byte
//! unlimitedTracking: byte
//! width: short          height: short
//! colors: byte[]        decorations: list   (not retained)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use mapinfo_nbt::{CompoundTag, Flavor};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::state::unsigned_byte;

/// Identifier of a persisted map record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MapId(pub i64);

impl MapId {
    /// The "no map" value used on the wire
    pub const INVALID: MapId = MapId(-1);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MapId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// Block coordinates of a map's centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct MapOrigin {
    pub x: i32,
    pub z: i32,
}

impl MapOrigin {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for MapOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
    Other(u8),
}

impl Dimension {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Overworld,
            1 => Self::Nether,
            2 => Self::End,
            v => Self::Other(v),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Overworld => 0,
            Self::Nether => 1,
            Self::End => 2,
            Self::Other(v) => v,
        }
    }
}

/// Map pixel grid edge length
pub const MAP_SIZE: i16 = 128;

/// Persisted metadata of one rendered map
#[derive(Debug, Clone, PartialEq)]
pub struct MapRecord {
    pub id: MapId,
    pub parent_id: Option<MapId>,
    pub dimension: Dimension,
    /// Zoom level, 0 (1:1) to 4 (1:16)
    pub scale: u8,
    pub origin: MapOrigin,
    pub locked: bool,
    pub fully_explored: bool,
    pub unlimited_tracking: bool,
    pub width: i16,
    pub height: i16,
}

impl MapRecord {
    pub fn new(id: MapId, scale: u8, origin: MapOrigin) -> Self {
        Self {
            id,
            parent_id: None,
            dimension: Dimension::Overworld,
            scale,
            origin,
            locked: false,
            fully_explored: false,
            unlimited_tracking: false,
            width: MAP_SIZE,
            height: MAP_SIZE,
        }
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Parse a persisted map compound. `mapId`, `scale` and the centre are
    /// required; everything else falls back to the defaults of a fresh map.
    pub fn from_compound(compound: &CompoundTag) -> Result<Self> {
        let id = MapId(compound.get_as::<i64>("mapId")?);
        let scale = unsigned_byte("scale", compound.get_as::<i8>("scale")?)?;
        let origin = MapOrigin {
            x: compound.get_as::<i32>("xCenter")?,
            z: compound.get_as::<i32>("zCenter")?,
        };
        let parent_id = compound
            .get_opt::<i64>("parentMapId")?
            .map(MapId)
            .filter(|p| p.is_valid());
        let dimension = match compound.get_opt::<i8>("dimension")? {
            Some(d) => Dimension::from_u8(unsigned_byte("dimension", d)?),
            None => Dimension::Overworld,
        };

        Ok(Self {
            id,
            parent_id,
            dimension,
            scale,
            origin,
            locked: compound.get_opt::<bool>("mapLocked")?.unwrap_or(false),
            fully_explored: compound.get_opt::<bool>("fullyExplored")?.unwrap_or(false),
            unlimited_tracking: compound.get_opt::<bool>("unlimitedTracking")?.unwrap_or(false),
            width: compound.get_opt::<i16>("width")?.unwrap_or(MAP_SIZE),
            height: compound.get_opt::<i16>("height")?.unwrap_or(MAP_SIZE),
        })
    }

    pub fn to_compound(&self) -> CompoundTag {
        CompoundTag::new()
            .with("mapId", self.id.0)
            .with("parentMapId", self.parent_id.unwrap_or(MapId::INVALID).0)
            .with("dimension", self.dimension.to_u8() as i8)
            .with("scale", self.scale as i8)
            .with("xCenter", self.origin.x)
            .with("zCenter", self.origin.z)
            .with("mapLocked", self.locked)
            .with("fullyExplored", self.fully_explored)
            .with("unlimitedTracking", self.unlimited_tracking)
            .with("width", self.width)
            .with("height", self.height)
    }
}

/// World-scoped lookup of map records.
///
/// `None` does not prove the map does not exist: a map created moments ago
/// may not have been committed yet.
pub trait MapStore {
    fn map_saved_data(&self, id: MapId) -> Option<&MapRecord>;
}

/// In-memory map record store
#[derive(Debug, Clone, Default)]
pub struct MapDataStore {
    records: HashMap<MapId, MapRecord, ahash::RandomState>,
}

impl MapDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or replace, returning the previous record for that id
    pub fn insert(&mut self, record: MapRecord) -> Option<MapRecord> {
        self.records.insert(record.id, record)
    }

    pub fn remove(&mut self, id: MapId) -> Option<MapRecord> {
        self.records.remove(&id)
    }

    pub fn ids(&self) -> Vec<MapId> {
        let mut ids: Vec<_> = self.records.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Load every `map_<id>.{nbt,dat,snbt}` file in `dir`.
    ///
    /// Binary files are decoded with `flavor` (gzip is detected). Files that
    /// fail to parse or nest deeper than `max_depth` are skipped with a
    /// warning; an unreadable directory is an error.
    pub fn load_dir(dir: &Path, flavor: Flavor, max_depth: usize) -> Result<Self> {
        let mut store = Self::new();
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();

        for path in entries {
            let Some(file_id) = map_file_id(&path) else {
                continue;
            };
            match load_record(&path, flavor, max_depth) {
                Ok(record) => {
                    if record.id.0 != file_id {
                        warn!(
                            path = %path.display(),
                            file_id,
                            record_id = record.id.0,
                            "map file name disagrees with mapId, using mapId"
                        );
                    }
                    debug!(id = record.id.0, scale = record.scale, "loaded map record");
                    store.insert(record);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable map file"),
            }
        }
        Ok(store)
    }
}

impl MapStore for MapDataStore {
    fn map_saved_data(&self, id: MapId) -> Option<&MapRecord> {
        self.records.get(&id)
    }
}

/// `map_-12.nbt` -> `Some(-12)`
fn map_file_id(path: &Path) -> Option<i64> {
    let ext = path.extension()?.to_str()?;
    if !matches!(ext, "nbt" | "dat" | "snbt") {
        return None;
    }
    path.file_stem()?.to_str()?.strip_prefix("map_")?.parse().ok()
}

fn load_record(path: &Path, flavor: Flavor, max_depth: usize) -> Result<MapRecord> {
    let compound = if path.extension().is_some_and(|e| e == "snbt") {
        mapinfo_nbt::from_snbt_with_depth(&std::fs::read_to_string(path)?, max_depth)?
    } else {
        mapinfo_nbt::read_root_with_depth(&std::fs::read(path)?, flavor, max_depth)?.compound
    };
    MapRecord::from_compound(&compound)
}
