use crate::tag::TagKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("invalid tag kind: {0}")]
    InvalidTagKind(u8),

    #[error("string too long: {len} bytes (max {max})")]
    StringTooLong { len: usize, max: usize },

    #[error("negative length: {0}")]
    NegativeLength(i32),

    #[error("nesting deeper than {max} levels")]
    DepthLimit { max: usize },

    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    #[error("root tag must be a compound, got {0}")]
    RootNotCompound(TagKind),

    #[error("list mixes {expected} and {found} elements")]
    HeterogeneousList { expected: TagKind, found: TagKind },

    #[error("{0} trailing bytes after root tag")]
    TrailingData(usize),

    #[error("snbt syntax error at offset {offset}: {message}")]
    Snbt { offset: usize, message: String },

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failed lookup in a [`CompoundTag`](crate::CompoundTag).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("tag {key:?} not found")]
    NotFound { key: String },

    #[error("tag {key:?} is {found}, expected {expected}")]
    WrongType {
        key: String,
        expected: TagKind,
        found: TagKind,
    },
}

impl TagError {
    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key } | Self::WrongType { key, .. } => key,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
