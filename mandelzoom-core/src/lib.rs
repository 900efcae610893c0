pub mod animator;
pub mod complex;
pub mod crop;
pub mod error;
pub mod mandelbrot;
pub mod rect;
pub mod viewport;

// Re-export primary types for convenience.
pub use animator::{
    spawn_frame_loop, Animator, AnimatorHandle, Interpolate, RectangleAnimator, ZOOM_FRAME_COUNT,
    ZOOM_FRAME_INTERVAL,
};
pub use complex::Complex;
pub use crop::{wheel_zoom_rect, PLANE_BOUND};
pub use error::CoreError;
pub use mandelbrot::escape_time;
pub use rect::Rect;
pub use viewport::{PixelDimensions, Viewport};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
