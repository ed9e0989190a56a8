use std::path::{Path, PathBuf};

use mapinfo_nbt::{Flavor, SnbtStyle, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

use crate::client::OutputStyle;
use crate::error::{Error, Result};

/// Plugin configuration, read from JSON. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub command: CommandConfig,
    pub output: OutputConfig,
    pub snbt: SnbtStyle,
    pub nbt: NbtConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub name: String,
    pub description: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            name: "mapinfo".into(),
            description: "Show information about the map in your hand".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Keep `§` formatting codes in messages
    pub markup: bool,
    /// Emit results as JSON records instead of text
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            markup: true,
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NbtConfig {
    pub flavor: Flavor,
    pub max_depth: usize,
}

impl Default for NbtConfig {
    fn default() -> Self {
        Self {
            flavor: Flavor::LittleEndian,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// `~/.mapinfo/config.json`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mapinfo")
            .join("config.json")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Load `path` if given, else the default path if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Self::default_path();
                if default.is_file() {
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let name = &self.command.name;
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(Error::Config(format!("invalid command name: {name:?}")));
        }
        if self.nbt.max_depth == 0 {
            return Err(Error::Config("nbt.max_depth must be at least 1".into()));
        }
        Ok(())
    }

    pub fn output_style(&self) -> OutputStyle {
        OutputStyle {
            markup: self.output.markup,
            snbt: self.snbt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json(
            r#"{"output": {"markup": false}, "snbt": {"pretty": false}, "nbt": {"flavor": "big_endian"}}"#,
        )
        .unwrap();
        assert!(!config.output.markup);
        assert!(!config.output.json);
        assert_eq!(config.snbt, SnbtStyle { pretty: false, indent: 4 });
        assert_eq!(config.nbt.flavor, Flavor::BigEndian);
        assert_eq!(config.nbt.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.command.name, "mapinfo");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(Config::from_json("{"), Err(Error::Config(_))));
        assert!(matches!(
            Config::from_json(r#"{"command": {"name": "map info"}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"nbt": {"max_depth": 0}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"nbt": {"flavor": "middle_endian"}}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"output": {"json": true}}"#).unwrap();

        let config = Config::load_or_default(Some(&path)).unwrap();
        assert!(config.output.json);

        let missing = dir.path().join("missing.json");
        assert!(matches!(Config::load_or_default(Some(&missing)), Err(Error::Config(_))));
    }
}
