use thiserror::Error;

/// Errors raised by the network graph, the trainers and the terminators.
///
/// Every variant aborts the operation that produced it; no operation leaves
/// the network half-mutated when it fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("index {index} out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("operation requires a layer topology: {0}")]
    TopologyRequired(&'static str),

    #[error("invalid topology description '{0}'")]
    InvalidTopologyDescription(String),

    #[error("unknown terminator '{0}'")]
    UnknownTerminator(String),

    #[error("{what} mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns `InvalidIndex` unless `index < len`.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::InvalidIndex { index, len })
    }
}
