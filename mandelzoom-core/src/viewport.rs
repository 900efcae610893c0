use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Size of the target raster in pixels.
///
/// Owned by whoever displays the image; the viewport only borrows it to
/// convert between pixel space and the complex plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelDimensions {
    pub width: u32,
    pub height: u32,
}

impl PixelDimensions {
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        let dims = Self { width, height };
        dims.validate()?;
        Ok(dims)
    }

    /// Both sides must be non-zero. Fields are public, so values built
    /// literally or deserialized are checked here.
    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Dimensions of a buffer rendered at `multiplier`× resolution.
    ///
    /// Saturates instead of overflowing; allocating such a buffer then fails.
    pub fn scaled(self, multiplier: u32) -> Self {
        Self {
            width: self.width.saturating_mul(multiplier),
            height: self.height.saturating_mul(multiplier),
        }
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// The rectangle of the complex plane mapped onto the pixel buffer.
///
/// `(x, y)` is the corner that lands on pixel `(0, 0)`; `width` and `height`
/// are the extent in plane units. Pixel-y grows with the imaginary part, so
/// the image is not flipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// The classic full view, `[-2, 2] × [-2, 2]`.
    pub const FULL: Self = Self {
        x: -2.0,
        y: -2.0,
        width: 4.0,
        height: 4.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> crate::Result<Self> {
        let viewport = Self {
            x,
            y,
            width,
            height,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Corner finite, extent positive and finite.
    pub fn validate(&self) -> crate::Result<()> {
        let Self {
            x,
            y,
            width,
            height,
        } = *self;
        if !(x.is_finite() && y.is_finite()) {
            return Err(CoreError::InvalidViewport {
                reason: format!("corner must be finite, got ({x}, {y})"),
            });
        }
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(CoreError::InvalidViewport {
                reason: format!("extent must be positive and finite, got {width}×{height}"),
            });
        }
        Ok(())
    }

    /// Map a pixel of a (possibly supersampled) buffer to the complex plane.
    ///
    /// `dims` is the display size; the buffer being filled is
    /// `dims * multiplier` pixels, so each buffer pixel covers
    /// `1 / multiplier` of a display pixel.
    #[inline]
    pub fn pixel_to_plane(&self, px: u32, py: u32, dims: PixelDimensions, multiplier: u32) -> Complex {
        self.subpixel_to_plane(px as f64, py as f64, dims, multiplier)
    }

    /// Like [`pixel_to_plane`](Self::pixel_to_plane) but for fractional or
    /// out-of-panel coordinates (crop gestures may start outside the panel).
    #[inline]
    pub fn subpixel_to_plane(&self, px: f64, py: f64, dims: PixelDimensions, multiplier: u32) -> Complex {
        let m = multiplier.max(1) as f64;
        Complex::new(
            px * self.width / (dims.width as f64 * m) + self.x,
            py * self.height / (dims.height as f64 * m) + self.y,
        )
    }

    pub fn center(&self) -> Complex {
        Complex::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width / height in plane units.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Stretch one axis so the plane aspect ratio matches the pixel aspect
    /// ratio, keeping the center fixed.
    ///
    /// A portrait raster adjusts the height; anything else adjusts the width.
    pub fn fix_aspect(&mut self, dims: PixelDimensions) {
        let pw = dims.width as f64;
        let ph = dims.height as f64;
        if dims.width < dims.height {
            let height = self.width * ph / pw;
            self.y -= (height - self.height) / 2.0;
            self.height = height;
        } else {
            let width = self.height * pw / ph;
            self.x -= (width - self.width) / 2.0;
            self.width = width;
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn dims(w: u32, h: u32) -> PixelDimensions {
        PixelDimensions::new(w, h).unwrap()
    }

    #[test]
    fn pixel_to_plane_corners() {
        let vp = Viewport::FULL;
        let d = dims(100, 100);
        let tl = vp.pixel_to_plane(0, 0, d, 1);
        assert!((tl.re + 2.0).abs() < EPSILON);
        assert!((tl.im + 2.0).abs() < EPSILON);

        let mid = vp.pixel_to_plane(50, 50, d, 1);
        assert!(mid.re.abs() < EPSILON);
        assert!(mid.im.abs() < EPSILON);

        let br = vp.pixel_to_plane(100, 100, d, 1);
        assert!((br.re - 2.0).abs() < EPSILON);
        assert!((br.im - 2.0).abs() < EPSILON);
    }

    #[test]
    fn supersampled_pixel_maps_to_same_point() {
        let vp = Viewport::new(-1.5, -0.5, 2.0, 1.0).unwrap();
        let d = dims(320, 160);
        let single = vp.pixel_to_plane(40, 30, d, 1);
        let double = vp.pixel_to_plane(80, 60, d, 2);
        assert!((single.re - double.re).abs() < EPSILON);
        assert!((single.im - double.im).abs() < EPSILON);
    }

    #[test]
    fn fix_aspect_landscape_widens_around_center() {
        let mut vp = Viewport::FULL;
        vp.fix_aspect(dims(200, 100));
        assert!((vp.width - 8.0).abs() < EPSILON);
        assert!((vp.height - 4.0).abs() < EPSILON);
        assert!((vp.x + 4.0).abs() < EPSILON);
        assert!(vp.center().re.abs() < EPSILON);
    }

    #[test]
    fn fix_aspect_portrait_grows_height() {
        let mut vp = Viewport::FULL;
        vp.fix_aspect(dims(100, 300));
        assert!((vp.width - 4.0).abs() < EPSILON);
        assert!((vp.height - 12.0).abs() < EPSILON);
        assert!((vp.y + 6.0).abs() < EPSILON);
        assert!(vp.center().im.abs() < EPSILON);
    }

    #[test]
    fn fix_aspect_can_shrink() {
        let mut vp = Viewport::new(0.0, 0.0, 10.0, 1.0).unwrap();
        vp.fix_aspect(dims(100, 100));
        assert!((vp.width - 1.0).abs() < EPSILON);
        assert!((vp.center().re - 5.0).abs() < EPSILON);
    }

    #[test]
    fn invalid_extent() {
        assert!(Viewport::new(0.0, 0.0, 0.0, 1.0).is_err());
        assert!(Viewport::new(0.0, 0.0, 1.0, -1.0).is_err());
        assert!(Viewport::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
        assert!(Viewport::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn literal_viewport_is_validated() {
        let flat = Viewport {
            width: 0.0,
            ..Viewport::FULL
        };
        assert!(flat.validate().is_err());
        let inverted = Viewport {
            height: -1.0,
            ..Viewport::FULL
        };
        assert!(inverted.validate().is_err());
        assert!(Viewport::FULL.validate().is_ok());
    }

    #[test]
    fn invalid_dimensions() {
        assert!(PixelDimensions { width: 0, height: 3 }.validate().is_err());
        assert!(PixelDimensions::new(0, 10).is_err());
        assert!(PixelDimensions::new(10, 0).is_err());
        assert_eq!(dims(10, 20).scaled(2), dims(20, 40));
    }
}
