//! Turning pixel-space gestures into new viewports.

use tracing::debug;

use crate::rect::Rect;
use crate::viewport::{PixelDimensions, Viewport};

/// Crops never reach outside `[-PLANE_BOUND, PLANE_BOUND]` on either axis.
pub const PLANE_BOUND: f64 = 2.0;

/// Wheel gestures are capped so `2^clicks` stays well inside `i32`.
pub const MAX_WHEEL_CLICKS: u32 = 8;

impl Viewport {
    /// Replace this viewport with the plane region under a pixel rectangle.
    ///
    /// Corners may come in any order. Bounds are clamped to
    /// `[-PLANE_BOUND, PLANE_BOUND]` and the aspect ratio is then fixed for
    /// `dims`. Returns `false` and leaves the viewport untouched when the
    /// rectangle has no area, either in pixels or after clamping.
    pub fn crop(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, dims: PixelDimensions) -> bool {
        if x1 == x2 || y1 == y2 {
            debug!(x1, y1, x2, y2, "Ignoring zero-area crop");
            return false;
        }

        let a = self.subpixel_to_plane(x1 as f64, y1 as f64, dims, 1);
        let b = self.subpixel_to_plane(x2 as f64, y2 as f64, dims, 1);

        let re_start = a.re.min(b.re).clamp(-PLANE_BOUND, PLANE_BOUND);
        let re_end = a.re.max(b.re).clamp(-PLANE_BOUND, PLANE_BOUND);
        let im_start = a.im.min(b.im).clamp(-PLANE_BOUND, PLANE_BOUND);
        let im_end = a.im.max(b.im).clamp(-PLANE_BOUND, PLANE_BOUND);

        let width = re_end - re_start;
        let height = im_end - im_start;
        if !(width > 0.0 && height > 0.0) {
            debug!(re_start, im_start, "Crop collapsed against the plane bounds");
            return false;
        }

        *self = Viewport {
            x: re_start,
            y: im_start,
            width,
            height,
        };
        self.fix_aspect(dims);
        true
    }

    /// [`crop`](Self::crop) driven by a [`Rect`].
    pub fn crop_rect(&mut self, rect: Rect, dims: PixelDimensions) -> bool {
        self.crop(rect.x, rect.y, rect.right(), rect.bottom(), dims)
    }
}

/// Pixel rectangle for a mouse-wheel zoom anchored at the cursor.
///
/// Each positive click halves the visible width and height, each negative
/// click doubles them. The plane point under the cursor keeps its pixel
/// position. Returns `None` for zero clicks, when the result has no area, or
/// when it does not fit in `i32` pixel coordinates.
pub fn wheel_zoom_rect(cursor_x: i32, cursor_y: i32, clicks: i32, dims: PixelDimensions) -> Option<Rect> {
    if clicks == 0 {
        return None;
    }
    // i64 holds u32::MAX << MAX_WHEEL_CLICKS without overflow.
    let scale = 1i64 << clicks.unsigned_abs().min(MAX_WHEEL_CLICKS);
    let (w, h) = (i64::from(dims.width), i64::from(dims.height));
    let (cx, cy) = (i64::from(cursor_x), i64::from(cursor_y));
    let dx = cx - w / 2;
    let dy = cy - h / 2;

    let (x1, y1, x2, y2) = if clicks < 0 {
        let (new_w, new_h) = (w * scale, h * scale);
        (
            cx - new_w / 2 - dx * scale,
            cy - new_h / 2 - dy * scale,
            cx + new_w / 2 - dx * scale,
            cy + new_h / 2 - dy * scale,
        )
    } else {
        let (new_w, new_h) = (w / scale, h / scale);
        (
            cx - new_w / 2 - dx / scale,
            cy - new_h / 2 - dy / scale,
            cx + new_w / 2 - dx / scale,
            cy + new_h / 2 - dy / scale,
        )
    };

    let (left, right) = (x1.min(x2), x1.max(x2));
    let (top, bottom) = (y1.min(y2), y1.max(y2));
    let rect = Rect::new(
        i32::try_from(left).ok()?,
        i32::try_from(top).ok()?,
        i32::try_from(right - left).ok()?,
        i32::try_from(bottom - top).ok()?,
    );
    // The far edge must be addressable too.
    i32::try_from(right).ok()?;
    i32::try_from(bottom).ok()?;

    (!rect.is_empty()).then_some(rect)
}
