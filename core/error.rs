use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("TOML Serialization Error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stat Error: Locator '{locator}', Error: {source}")]
    Stat {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Listing Error: Locator '{locator}', Error: {source}")]
    ListDir {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File Read Error: Locator '{locator}', Error: {source}")]
    FileRead {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Locator: {0}")]
    InvalidLocator(String),

    #[error("Document Error: {0}")]
    Document(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Byte Size Error: {0}")]
    ByteSize(String),

    #[error("Host Error: {0}")]
    Host(String),
}
