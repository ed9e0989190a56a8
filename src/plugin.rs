//! Plugin lifecycle and command registration.
//!
//! A host constructs one [`MapInfoPlugin`] at startup and drives it through
//! `load` → `enable` → `disable`. Enabling registers the command with the
//! host's [`CommandRegistrar`]; the plugin holds no other state.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::client::{self, CommandOrigin, CommandResult, MapInfoCommand, OutputStyle};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::state::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Constructed,
    Loaded,
    Enabled,
    Disabled,
}

impl PluginState {
    fn name(self) -> &'static str {
        match self {
            Self::Constructed => "constructed",
            Self::Loaded => "loaded",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

/// A command as registered with the host
#[derive(Debug, Clone)]
pub struct RegisteredCommand {
    pub name: String,
    pub description: String,
    pub overloads: Vec<MapInfoCommand>,
    pub style: OutputStyle,
}

/// The host's command table
#[derive(Debug, Default)]
pub struct CommandRegistrar {
    commands: IndexMap<String, RegisteredCommand>,
}

impl CommandRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: RegisteredCommand) -> Result<()> {
        if self.commands.contains_key(&command.name) {
            return Err(Error::DuplicateCommand(command.name));
        }
        debug!(command = %command.name, description = %command.description, "registering command");
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> Option<RegisteredCommand> {
        self.commands.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Run a command line such as `/mapinfo get`
    pub fn dispatch(&self, line: &str, origin: CommandOrigin, world: &World) -> CommandResult {
        let mut words = line.trim().trim_start_matches('/').split_whitespace();
        let Some(name) = words.next() else {
            return CommandResult::err("Empty command");
        };
        let Some(command) = self.commands.get(name) else {
            return CommandResult::err(format!("Unknown command: {name}"));
        };
        let usage = || {
            let subs: Vec<_> = command.overloads.iter().map(|c| c.name()).collect();
            CommandResult::err(format!("Usage: /{} <{}>", command.name, subs.join("|")))
        };
        let (Some(sub), None) = (words.next(), words.next()) else {
            return usage();
        };
        match MapInfoCommand::from_name(sub).filter(|c| command.overloads.contains(c)) {
            Some(sub) => client::execute(sub, origin, world, command.style),
            None => usage(),
        }
    }
}

pub struct MapInfoPlugin {
    config: Config,
    state: PluginState,
}

impl MapInfoPlugin {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: PluginState::Constructed,
        }
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn expect_state(&self, expected: PluginState) -> Result<()> {
        if self.state != expected {
            return Err(Error::InvalidState {
                expected: expected.name(),
                actual: self.state.name(),
            });
        }
        Ok(())
    }

    pub fn load(&mut self) -> Result<()> {
        self.expect_state(PluginState::Constructed)?;
        info!("loading map info plugin");
        self.state = PluginState::Loaded;
        Ok(())
    }

    pub fn enable(&mut self, registrar: &mut CommandRegistrar) -> Result<()> {
        if self.state != PluginState::Disabled {
            self.expect_state(PluginState::Loaded)?;
        }
        info!("enabling map info plugin");
        registrar.register(RegisteredCommand {
            name: self.config.command.name.clone(),
            description: self.config.command.description.clone(),
            overloads: MapInfoCommand::ALL.to_vec(),
            style: self.config.output_style(),
        })?;
        info!(command = %self.config.command.name, "command registered");
        self.state = PluginState::Enabled;
        Ok(())
    }

    pub fn disable(&mut self, registrar: &mut CommandRegistrar) -> Result<()> {
        self.expect_state(PluginState::Enabled)?;
        info!("disabling map info plugin");
        if registrar.unregister(&self.config.command.name).is_none() {
            warn!(command = %self.config.command.name, "command was not registered");
        }
        self.state = PluginState::Disabled;
        Ok(())
    }
}
