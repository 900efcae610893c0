use thiserror::Error;

/// Errors originating from the core math and animation types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid pixel dimensions: {width}×{height} (both must be > 0)")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid frame count: {0} (an animation needs at least 2 frames)")]
    InvalidFrameCount(u32),
}
