use mapinfo_nbt::SnbtStyle;
use tracing::debug;

use crate::client::format::{format_error, format_map_info, format_raw_dump, strip_markup};
use crate::client::output::CommandResult;
use crate::map_info::{self, DecodeError, MapInfo, RawDump};
use crate::state::{ItemStack, PlayerId, World};

/// Who invoked a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    Player(PlayerId),
    /// Server console
    Server,
    CommandBlock,
}

/// `/mapinfo` subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapInfoCommand {
    /// Decoded metadata of the held map
    Get,
    /// Raw tag payload of the held map
    Snbt,
}

impl MapInfoCommand {
    pub const ALL: [MapInfoCommand; 2] = [Self::Get, Self::Snbt];

    pub fn name(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Snbt => "snbt",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("command origin is not a player")]
    NotAPlayer,

    #[error("player is not holding anything")]
    EmptyHand,

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Successful command payload, before formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Info(MapInfo),
    Raw(RawDump),
}

/// How results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputStyle {
    /// Keep `§` formatting codes
    pub markup: bool,
    pub snbt: SnbtStyle,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            markup: true,
            snbt: SnbtStyle::default(),
        }
    }
}

/// The invoking player's held item
fn held_item(origin: CommandOrigin, world: &World) -> Result<&ItemStack, CommandError> {
    let CommandOrigin::Player(id) = origin else {
        return Err(CommandError::NotAPlayer);
    };
    let player = world.get_player(id).ok_or(CommandError::NotAPlayer)?;
    player.carried_item().ok_or(CommandError::EmptyHand)
}

/// Run a subcommand without formatting
pub fn run(
    command: MapInfoCommand,
    origin: CommandOrigin,
    world: &World,
    snbt: SnbtStyle,
) -> Result<CommandOutcome, CommandError> {
    let item = held_item(origin, world)?;
    debug!(command = command.name(), item = %item.name, "running map command");
    Ok(match command {
        MapInfoCommand::Get => CommandOutcome::Info(map_info::decode(item, world)?),
        MapInfoCommand::Snbt => CommandOutcome::Raw(map_info::dump_raw(item, snbt)?),
    })
}

/// Run a subcommand and render its result for the output channel
pub fn execute(
    command: MapInfoCommand,
    origin: CommandOrigin,
    world: &World,
    style: OutputStyle,
) -> CommandResult {
    let render = |text: String| if style.markup { text } else { strip_markup(&text) };

    match run(command, origin, world, style.snbt) {
        Ok(CommandOutcome::Info(info)) => {
            let data = serde_json::to_value(&info).unwrap_or_default();
            CommandResult::ok(render(format_map_info(&info)), data)
        }
        Ok(CommandOutcome::Raw(dump)) => {
            let data = serde_json::to_value(&dump).unwrap_or_default();
            CommandResult::ok(format_raw_dump(&dump, style.markup), data)
        }
        Err(e) => {
            debug!(command = command.name(), error = %e, "map command failed");
            CommandResult::err(render(format_error(&e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use mapinfo_nbt::CompoundTag;

    use super::*;
    use crate::state::{MapDataStore, MapId, MapOrigin, MapRecord};

    fn world_with(item: Option<ItemStack>) -> World {
        let mut maps = MapDataStore::new();
        maps.insert(MapRecord::new(MapId(42), 2, MapOrigin::new(100, -50)).locked(true));
        let mut world = World::with_maps(maps);
        world.add_player(1, "Alex".into()).set_carried_item(item);
        world
    }

    fn filled(id: i64) -> ItemStack {
        ItemStack::new("minecraft:filled_map", 1)
            .with_user_data(CompoundTag::new().with("map_uuid", id).with("map_is_scaling", 1i8))
    }

    #[test]
    fn test_subcommand_names() {
        assert_eq!(MapInfoCommand::from_name("get"), Some(MapInfoCommand::Get));
        assert_eq!(MapInfoCommand::from_name("snbt"), Some(MapInfoCommand::Snbt));
        assert_eq!(MapInfoCommand::from_name("GET"), None);
    }

    #[test]
    fn test_non_player_rejected() {
        let world = world_with(Some(filled(42)));
        for origin in [CommandOrigin::Server, CommandOrigin::CommandBlock, CommandOrigin::Player(99)] {
            for command in MapInfoCommand::ALL {
                assert_eq!(
                    run(command, origin, &world, SnbtStyle::default()),
                    Err(CommandError::NotAPlayer)
                );
            }
        }
    }

    #[test]
    fn test_empty_hand() {
        let world = world_with(None);
        for command in MapInfoCommand::ALL {
            assert_eq!(
                run(command, CommandOrigin::Player(1), &world, SnbtStyle::default()),
                Err(CommandError::EmptyHand)
            );
        }
    }

    #[test]
    fn test_get_success() {
        let world = world_with(Some(filled(42)));
        let result = execute(MapInfoCommand::Get, CommandOrigin::Player(1), &world, OutputStyle::default());
        assert!(result.success);
        assert!(result.message.contains("§6Map ID: §f42"));
        assert!(result.message.contains("§6Scaling: §cYes"));
        let data = result.data.unwrap();
        assert_eq!(data["kind"], "filled");
        assert_eq!(data["id"], 42);
        assert_eq!(data["origin"]["z"], -50);
        assert!(data["name_index"].is_null());
    }

    #[test]
    fn test_get_record_not_found() {
        let world = world_with(Some(filled(7)));
        let result = execute(
            MapInfoCommand::Get,
            CommandOrigin::Player(1),
            &world,
            OutputStyle { markup: false, ..OutputStyle::default() },
        );
        assert!(!result.success);
        assert!(result.message.contains("map ID: 7"));
        assert!(!result.message.contains('§'));
        assert!(result.data.is_none());
    }

    #[test]
    fn test_snbt_success_and_no_data() {
        let world = world_with(Some(filled(42)));
        let style = OutputStyle { markup: true, snbt: SnbtStyle::COMPACT };
        let result = execute(MapInfoCommand::Snbt, CommandOrigin::Player(1), &world, style);
        assert!(result.success);
        assert_eq!(result.message, "§eMap SNBT Data:\n{map_is_scaling:1b,map_uuid:42L}");

        let world = world_with(Some(ItemStack::new("minecraft:filled_map", 1)));
        let result = execute(MapInfoCommand::Snbt, CommandOrigin::Player(1), &world, style);
        assert!(result.success);
        assert_eq!(result.data.unwrap()["kind"], "no_data");
    }

    #[test]
    fn test_plain_snbt_keeps_tag_strings() {
        let item = ItemStack::new("minecraft:filled_map", 1).with_user_data(
            CompoundTag::new().with("map_uuid", 42i64).with("label", "§6Treasure"),
        );
        let world = world_with(Some(item));
        let style = OutputStyle { markup: false, snbt: SnbtStyle::COMPACT };
        let result = execute(MapInfoCommand::Snbt, CommandOrigin::Player(1), &world, style);
        assert!(result.success);
        assert_eq!(result.message, "Map SNBT Data:\n{label:\"§6Treasure\",map_uuid:42L}");
    }

    #[test]
    fn test_wrong_item() {
        let world = world_with(Some(ItemStack::new("minecraft:compass", 1)));
        for command in MapInfoCommand::ALL {
            assert_eq!(
                run(command, CommandOrigin::Player(1), &world, SnbtStyle::default()),
                Err(CommandError::Decode(DecodeError::WrongItemKind { name: "compass".into() }))
            );
        }
    }
}
