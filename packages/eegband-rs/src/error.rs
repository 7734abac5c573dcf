use thiserror::Error;

#[derive(Error, Debug)]
pub enum EegError {
    #[error("Invalid filter specification: {0}")]
    InvalidSpec(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate channel: {0}")]
    DegenerateChannel(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Failed to parse recording: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EegError>;
