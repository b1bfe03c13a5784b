use thiserror::Error;

/// Errors raised by the on-disk photo store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Photo not found: {0}")]
    NotFound(String),

    #[error("Invalid photo name: {0:?}")]
    InvalidName(String),

    #[error("Unsupported file type: {0} (expected jpg, jpeg or png)")]
    UnsupportedType(String),

    #[error("Failed to access photo store: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while turning canvas contents into a PNG
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Canvas has no drawable area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Malformed data URL: {0}")]
    InvalidDataUrl(String),
}

/// Errors raised while loading the game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by page controller actions
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type StoreResult<T> = Result<T, StoreError>;
