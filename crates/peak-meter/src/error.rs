use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeterError {
    #[error("bit depth {0} is outside 1..=32")]
    InvalidBitDepth(u32),

    #[error("bit depth must be set before processing samples")]
    BitDepthNotSet,

    #[error("invalid meter settings")]
    Settings(#[from] serde_json::Error),
}
