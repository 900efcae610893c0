use tracing::warn;

use mandelzoom_core::{PixelDimensions, Viewport};

use crate::color::{ColorMap, ColorStyle, DEFAULT_PALETTED_MAX_ITERATIONS, SIMPLE_RGB_MAX_ITERATIONS};
use crate::error::RenderError;
use crate::palette::Palette;

/// Resolution factor of the follow-up render.
pub const SUPERSAMPLE_MULTIPLIER: u32 = 2;

/// The user-editable state a generation is built from.
///
/// Setters validate eagerly; a rejected value leaves the settings unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    viewport: Viewport,
    pixel_dims: PixelDimensions,
    style: ColorStyle,
    max_iterations: u32,
    palette: Palette,
}

impl RenderSettings {
    /// SimpleRgb coloring of `viewport`, aspect-corrected for `pixel_dims`.
    pub fn new(mut viewport: Viewport, pixel_dims: PixelDimensions) -> Self {
        viewport.fix_aspect(pixel_dims);
        Self {
            viewport,
            pixel_dims,
            style: ColorStyle::default(),
            max_iterations: DEFAULT_PALETTED_MAX_ITERATIONS,
            palette: Palette::default(),
        }
    }

    /// Replace every setting at once, or none if any value is invalid. The
    /// viewport is aspect-corrected for the new `pixel_dims`.
    pub fn configure(
        &mut self,
        viewport: Viewport,
        pixel_dims: PixelDimensions,
        style: ColorStyle,
        max_iterations: u32,
        palette: Palette,
    ) -> crate::Result<()> {
        viewport.validate()?;
        pixel_dims.validate()?;
        check_max_iterations(style, max_iterations)?;
        self.viewport = viewport;
        self.pixel_dims = pixel_dims;
        self.style = style;
        self.max_iterations = max_iterations;
        self.palette = palette;
        self.viewport.fix_aspect(pixel_dims);
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Set the viewport as given; call [`fix_aspect`](Self::fix_aspect) if it
    /// may not match the pixel aspect ratio.
    pub fn set_viewport(&mut self, viewport: Viewport) -> crate::Result<()> {
        viewport.validate()?;
        self.viewport = viewport;
        Ok(())
    }

    pub fn pixel_dims(&self) -> PixelDimensions {
        self.pixel_dims
    }

    /// Resize the target raster and re-fix the aspect ratio.
    pub fn set_pixel_dims(&mut self, pixel_dims: PixelDimensions) -> crate::Result<()> {
        pixel_dims.validate()?;
        self.pixel_dims = pixel_dims;
        self.viewport.fix_aspect(pixel_dims);
        Ok(())
    }

    pub fn fix_aspect(&mut self) {
        self.viewport.fix_aspect(self.pixel_dims);
    }

    /// Crop to a pixel rectangle of the current raster. See
    /// [`Viewport::crop`].
    pub fn crop(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        self.viewport.crop(x1, y1, x2, y2, self.pixel_dims)
    }

    pub fn style(&self) -> ColorStyle {
        self.style
    }

    /// Switching style never fails, even if the stored iteration count is not
    /// 512; SimpleRgb simply ignores it.
    pub fn set_style(&mut self, style: ColorStyle) {
        self.style = style;
    }

    /// The stored iteration count, as used by the paletted style.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The iteration count the current style actually renders with.
    pub fn effective_max_iterations(&self) -> u32 {
        match self.style {
            ColorStyle::SimpleRgb => SIMPLE_RGB_MAX_ITERATIONS,
            ColorStyle::Paletted => self.max_iterations,
        }
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) -> crate::Result<()> {
        check_max_iterations(self.style, max_iterations)?;
        self.max_iterations = max_iterations;
        Ok(())
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Replace an unusable palette with the default when it would be used.
    ///
    /// Returns `true` if the palette was replaced.
    pub fn heal_palette(&mut self) -> bool {
        if self.style != ColorStyle::Paletted || self.palette.is_usable() {
            return false;
        }
        warn!(
            entries = self.palette.len(),
            "Palette too short for paletted coloring, resetting to default"
        );
        self.palette = Palette::default();
        true
    }

    /// Snapshot everything a render of the current view needs.
    pub fn request(&self, multiplier: u32) -> GenerationRequest {
        GenerationRequest {
            viewport: self.viewport,
            pixel_dims: self.pixel_dims,
            multiplier: multiplier.max(1),
            colors: ColorMap {
                style: self.style,
                max_iterations: self.effective_max_iterations(),
                palette: self.palette.or_default(),
            },
        }
    }
}

fn check_max_iterations(style: ColorStyle, max_iterations: u32) -> crate::Result<()> {
    if max_iterations == 0 {
        return Err(RenderError::InvalidMaxIterations(max_iterations));
    }
    if style == ColorStyle::SimpleRgb && max_iterations != SIMPLE_RGB_MAX_ITERATIONS {
        warn!(max_iterations, "Rejected iteration count for SimpleRgb style");
        return Err(RenderError::MaxIterationsLocked(max_iterations));
    }
    Ok(())
}

/// An immutable snapshot of one render: where, how big, and how to color.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub viewport: Viewport,
    /// Display size; the buffer is `pixel_dims * multiplier`.
    pub pixel_dims: PixelDimensions,
    pub multiplier: u32,
    pub colors: ColorMap,
}

impl GenerationRequest {
    pub fn output_dims(&self) -> PixelDimensions {
        self.pixel_dims.scaled(self.multiplier)
    }

    pub fn is_supersampled(&self) -> bool {
        self.multiplier > 1
    }

    /// The same view at [`SUPERSAMPLE_MULTIPLIER`]× resolution.
    pub fn supersampled(&self) -> Self {
        Self {
            multiplier: SUPERSAMPLE_MULTIPLIER,
            ..self.clone()
        }
    }
}
