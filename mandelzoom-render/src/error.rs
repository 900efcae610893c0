use thiserror::Error;

use crate::color::SIMPLE_RGB_MAX_ITERATIONS;

/// Errors originating from configuration and the generation pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("max iterations is fixed at {SIMPLE_RGB_MAX_ITERATIONS} in SimpleRgb style, got {0}")]
    MaxIterationsLocked(u32),

    #[error("invalid tile count: {0} (must be > 0)")]
    InvalidTileCount(u32),

    #[error("could not allocate a {width}×{height} pixel buffer")]
    Allocation { width: u32, height: u32 },

    #[error("could not start the generation thread")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Core(#[from] mandelzoom_core::CoreError),
}
