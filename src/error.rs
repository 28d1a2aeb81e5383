use thiserror::Error;

/// Errors surfaced by the binaries. The maze engine itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("maze dimensions {rows}x{cols} are too small, each side must be at least {min}")]
    InvalidDimensions { rows: u16, cols: u16, min: u16 },
    #[error("failed to set up logging: {0}")]
    Logging(String),
}
