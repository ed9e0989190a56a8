pub mod commands;
pub mod format;
pub mod output;

pub use commands::{
    execute, run, CommandError, CommandOrigin, CommandOutcome, MapInfoCommand, OutputStyle,
};
pub use format::{format_error, format_map_info, format_raw_dump, strip_markup};
pub use output::CommandResult;
