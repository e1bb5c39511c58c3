use thiserror::Error;

/// Errors from persistence and startup I/O.
///
/// Gameplay rejections (insufficient gold, max tier, unknown item) are not
/// errors; those operations return `bool` and leave state untouched.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Save encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    InvalidVersion { expected: u64, found: u64 },

    #[error("Save checksum verification failed")]
    ChecksumMismatch,

    #[error("Save file truncated: {0}")]
    Truncated(&'static str),

    #[error("Save file has {0} unexpected bytes after the checksum")]
    TrailingBytes(usize),

    #[error("Could not determine save directory")]
    NoSaveDirectory,
}

pub type Result<T> = std::result::Result<T, GameError>;
