use crate::viewport::PixelDimensions;

/// An integer pixel rectangle, used for crop gestures and zoom animation.
///
/// Coordinates may be negative or exceed the panel: zooming out produces a
/// rectangle larger than the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from two opposite corners given in any order.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let (left, right) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (top, bottom) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// The whole panel.
    pub fn full(dims: PixelDimensions) -> Self {
        Self::new(0, 0, dims.width as i32, dims.height as i32)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Every field multiplied by `factor`; maps a display-space rectangle
    /// onto a supersampled buffer.
    pub fn scaled(&self, factor: i32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalizes_order() {
        let a = Rect::from_corners(10, 40, 30, 20);
        let b = Rect::from_corners(30, 20, 10, 40);
        assert_eq!(a, Rect::new(10, 20, 20, 20));
        assert_eq!(a, b);
        assert_eq!(a.right(), 30);
        assert_eq!(a.bottom(), 40);
    }

    #[test]
    fn scaled_doubles_everything() {
        assert_eq!(Rect::new(-5, 3, 10, 7).scaled(2), Rect::new(-10, 6, 20, 14));
    }

    #[test]
    fn empty_when_flat() {
        assert!(Rect::from_corners(5, 5, 5, 9).is_empty());
        assert!(!Rect::from_corners(5, 5, 6, 9).is_empty());
    }
}
