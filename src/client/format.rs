//! User-facing text for command results.
//!
//! Messages keep the game's `§` formatting codes; [`strip_markup`] removes
//! them for plain terminals.

use crate::client::commands::CommandError;
use crate::map_info::{DecodeError, DecodedMapInfo, MapInfo, RawDump};

pub const MARKUP_PREFIX: char = '§';

const HEADER_RULE: &str = "§b----------------";

fn yes_no(v: bool) -> &'static str {
    if v { "§cYes" } else { "§aNo" }
}

pub fn format_map_info(info: &MapInfo) -> String {
    match info {
        MapInfo::Empty { potential_id } => format!(
            "§b--- Empty Map Info ---\n\
             §6Map ID: §f{potential_id} (Potential)\n\
             §7This map has no data\n\
             {HEADER_RULE}"
        ),
        MapInfo::Filled(info) => format_filled(info),
    }
}

fn format_filled(info: &DecodedMapInfo) -> String {
    let name_index = info
        .name_index
        .map_or_else(|| "N/A".to_owned(), |i| i.to_string());
    format!(
        "§b--- Map Info ---\n\
         §6Map ID: §f{}\n\
         §6Scale: §f{}\n\
         §6Center (X, Z): §f{}\n\
         §6Locked: {}\n\
         §6Scaling: {}\n\
         §6Name Index: §f{}\n\
         {HEADER_RULE}",
        info.id,
        info.scale,
        info.origin,
        yes_no(info.locked),
        yes_no(info.is_scaling),
        name_index,
    )
}

/// The dump itself is never stripped; only the surrounding text follows `markup`
pub fn format_raw_dump(dump: &RawDump, markup: bool) -> String {
    let text = |s: &str| if markup { s.to_owned() } else { strip_markup(s) };
    match dump {
        RawDump::Snbt(snbt) => format!("{}\n{snbt}", text("§eMap SNBT Data:")),
        RawDump::NoData => text("§cFailed to get SNBT data: the map carries no tag data"),
    }
}

pub fn format_error(error: &CommandError) -> String {
    match error {
        CommandError::NotAPlayer => "This command can only be run by a player".to_owned(),
        CommandError::EmptyHand => "You are not holding anything".to_owned(),
        CommandError::Decode(DecodeError::WrongItemKind { name }) => {
            format!("Hold a map to use this command. Currently holding: §r{name}")
        }
        CommandError::Decode(DecodeError::MissingIdentifier) => {
            "Could not find map_uuid in the item's NBT data".to_owned()
        }
        CommandError::Decode(DecodeError::RecordNotFound { id }) => format!(
            "Could not find this map in the world's saved data, map ID: §r{id} \
             §eIf this map was just created, try again in a few minutes"
        ),
    }
}

/// Drop `§x` formatting pairs
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == MARKUP_PREFIX {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}
