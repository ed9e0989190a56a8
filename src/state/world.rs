use std::collections::HashMap;

use crate::state::map_data::{MapDataStore, MapId, MapRecord, MapStore};
use crate::state::player::{Player, PlayerId};

/// The world as seen by a command: its players and persisted maps
#[derive(Debug, Clone, Default)]
pub struct World {
    /// All players
    pub players: HashMap<PlayerId, Player>,

    /// Persisted map records
    pub maps: MapDataStore,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maps(maps: MapDataStore) -> Self {
        Self {
            players: HashMap::new(),
            maps,
        }
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Add a new player
    pub fn add_player(&mut self, id: PlayerId, name: String) -> &mut Player {
        self.players.entry(id).or_insert_with(|| Player::new(id, name))
    }
}

impl MapStore for World {
    fn map_saved_data(&self, id: MapId) -> Option<&MapRecord> {
        self.maps.map_saved_data(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::map_data::MapOrigin;

    #[test]
    fn test_player_management() {
        let mut world = World::new();
        world.add_player(1, "Player1".into());
        world.add_player(2, "Player2".into());
        // Re-adding keeps the existing player
        world.add_player(1, "Renamed".into());

        assert_eq!(world.players.len(), 2);
        assert_eq!(world.get_player(1).unwrap().name, "Player1");
        assert_eq!(world.get_player(2).unwrap().name, "Player2");
        assert!(world.get_player(3).is_none());
    }

    #[test]
    fn test_world_is_a_map_store() {
        let mut maps = MapDataStore::new();
        maps.insert(MapRecord::new(MapId(5), 1, MapOrigin::new(64, 64)));
        let world = World::with_maps(maps);

        assert_eq!(world.map_saved_data(MapId(5)).unwrap().scale, 1);
        assert!(world.map_saved_data(MapId(6)).is_none());
    }
}
