pub mod buffer;
pub mod cancel;
pub mod color;
pub mod error;
pub mod generator;
pub mod palette;
pub mod preset;
pub mod settings;
pub mod tile;

pub use buffer::{PixelBuffer, BYTES_PER_PIXEL};
pub use cancel::RenderCancel;
pub use color::{
    paletted_color, simple_rgb_color, ColorMap, ColorStyle, DEFAULT_PALETTED_MAX_ITERATIONS,
    SIMPLE_RGB_MAX_ITERATIONS,
};
pub use error::RenderError;
pub use generator::{
    ControllerConfig, GenerationController, GenerationEvent, GenerationObserver, GenerationState,
    RenderedFrame,
};
pub use palette::{Color, Palette};
pub use preset::{default_presets, find_preset, Preset};
pub use settings::{GenerationRequest, RenderSettings, SUPERSAMPLE_MULTIPLIER};
pub use tile::{partition_rows, render_tiles, TileJob, DEFAULT_TILE_COUNT};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
