use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Invalid mime type: {0}")]
    InvalidMime(String),

    #[error("Invalid mime pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("Failed to read configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Decoded text is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
