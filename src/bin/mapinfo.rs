//! Run `/mapinfo` against an item and a directory of saved maps
//!
//! Run with: cargo run --bin mapinfo -- --item held.snbt --maps world/maps get
//!
//! The item file holds a persisted item compound (`Name`, `Damage`,
//! `Count`, `tag`) as SNBT text or binary NBT. Map records are read from
//! `map_<id>.{nbt,dat,snbt}` files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mapinfo::nbt::{self, Flavor};
use mapinfo::{
    CommandOrigin, CommandRegistrar, Config, ItemStack, MapDataStore, MapInfoCommand,
    MapInfoPlugin, World,
};

#[derive(Parser)]
#[command(name = "mapinfo")]
#[command(about = "Inspect a held map item and its saved map record")]
struct Cli {
    /// Config file (defaults to ~/.mapinfo/config.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Held item, SNBT or binary NBT. Omit for an empty hand.
    #[arg(long)]
    item: Option<PathBuf>,

    /// Directory of saved map records
    #[arg(long)]
    maps: Option<PathBuf>,

    /// Invoke from the server console instead of a player
    #[arg(long)]
    console: bool,

    /// Print the result record as JSON
    #[arg(long)]
    json: bool,

    /// Strip formatting codes from messages
    #[arg(long)]
    plain: bool,

    /// Binary files use Java (big-endian) layout
    #[arg(long)]
    big_endian: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decoded map metadata
    Get,
    /// Raw tag payload as SNBT
    Snbt {
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },
}

fn load_item(path: &Path, config: &Config) -> mapinfo::Result<ItemStack> {
    let compound = if path.extension().is_some_and(|e| e == "snbt") {
        nbt::from_snbt_with_depth(&std::fs::read_to_string(path)?, config.nbt.max_depth)?
    } else {
        let data = std::fs::read(path)?;
        nbt::binary::read_root_with_depth(&data, config.nbt.flavor, config.nbt.max_depth)?.compound
    };
    ItemStack::from_compound(&compound)
}

fn run(cli: Cli) -> mapinfo::Result<bool> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if cli.json {
        config.output.json = true;
    }
    if cli.plain {
        config.output.markup = false;
    }
    if cli.big_endian {
        config.nbt.flavor = Flavor::BigEndian;
    }
    if let Commands::Snbt { compact: true } = cli.command {
        config.snbt = nbt::SnbtStyle::COMPACT;
    }

    let maps = match &cli.maps {
        Some(dir) => MapDataStore::load_dir(dir, config.nbt.flavor, config.nbt.max_depth)?,
        None => MapDataStore::new(),
    };
    info!(records = maps.len(), "map store ready");

    let mut world = World::with_maps(maps);
    let player = world.add_player(1, "cli".into());
    if let Some(path) = &cli.item {
        player.set_carried_item(Some(load_item(path, &config)?));
    }

    let mut registrar = CommandRegistrar::new();
    let mut plugin = MapInfoPlugin::new(config);
    plugin.load()?;
    plugin.enable(&mut registrar)?;

    let sub = match cli.command {
        Commands::Get => MapInfoCommand::Get,
        Commands::Snbt { .. } => MapInfoCommand::Snbt,
    };
    let origin = if cli.console {
        CommandOrigin::Server
    } else {
        CommandOrigin::Player(1)
    };
    let line = format!("/{} {}", plugin.config().command.name, sub.name());
    let result = registrar.dispatch(&line, origin, &world);

    if plugin.config().output.json {
        println!("{}", result.to_json());
    } else if result.success {
        println!("{}", result.message);
    } else {
        eprintln!("{}", result.message);
    }

    plugin.disable(&mut registrar)?;
    Ok(result.success)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mapinfo=info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
