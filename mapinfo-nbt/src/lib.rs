//! Named Binary Tag model and codecs
//!
//! - `tag` - the [`Tag`] union and its [`TagKind`] ids
//! - `compound` - [`CompoundTag`], the keyed record with typed lookups
//! - `binary` - little/big-endian binary codec (optionally gzip-wrapped)
//! - `snbt` - text rendering and parsing
//!
//! Lookups never panic: a missing key and a key of the wrong kind are both
//! ordinary [`TagError`] values.

mod compound;
mod error;
mod tag;

pub mod binary;
pub mod reader;
pub mod snbt;
pub mod writer;

pub use binary::{read_root, read_root_with_depth, write_root, Flavor, NamedCompound, DEFAULT_MAX_DEPTH};
pub use compound::{has_key, CompoundTag};
pub use error::{Error, Result, TagError};
pub use snbt::{from_snbt, from_snbt_with_depth, to_snbt, SnbtStyle};
pub use tag::{FromTag, Tag, TagKind};
