use mapinfo_nbt::TagError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("nbt error: {0}")]
    Nbt(#[from] mapinfo_nbt::Error),

    #[error("invalid tag data: {0}")]
    Tag(#[from] TagError),

    #[error("config error: {0}")]
    Config(String),

    #[error("plugin is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{key} out of range: {value}")]
    OutOfRange { key: &'static str, value: i64 },

    #[error("command already registered: {0}")]
    DuplicateCommand(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
