use serde::{Deserialize, Serialize};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const DARK_BLUE: Self = Self::rgb(0, 0, 139);
    pub const ORANGE: Self = Self::rgb(255, 165, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA bytes with full alpha.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Ordered colors for piecewise-linear iteration coloring.
///
/// Order matters and duplicates are allowed. A palette needs at least
/// [`Palette::MIN_LEN`] entries to be usable; shorter palettes are replaced
/// by [`Palette::default`] when a generation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub const MIN_LEN: usize = 2;

    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// `true` if the palette has enough entries to interpolate between.
    pub fn is_usable(&self) -> bool {
        self.colors.len() >= Self::MIN_LEN
    }

    /// This palette, or the default when it is too short to use.
    pub fn or_default(&self) -> Self {
        if self.is_usable() {
            self.clone()
        } else {
            Self::default()
        }
    }
}

impl Default for Palette {
    /// Dark blue through white and orange, back to white, ending in black.
    fn default() -> Self {
        Self::new(vec![
            Color::DARK_BLUE,
            Color::WHITE,
            Color::ORANGE,
            Color::WHITE,
            Color::BLACK,
        ])
    }
}

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        Self::new(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_five_entries() {
        let p = Palette::default();
        assert_eq!(p.len(), 5);
        assert_eq!(p.colors()[0], Color::DARK_BLUE);
        assert_eq!(p.colors()[4], Color::BLACK);
    }

    #[test]
    fn short_palettes_fall_back() {
        assert_eq!(Palette::new(vec![]).or_default(), Palette::default());
        assert_eq!(Palette::new(vec![Color::RED]).or_default(), Palette::default());

        let two = Palette::new(vec![Color::RED, Color::RED]);
        assert_eq!(two.or_default(), two);
    }

    #[test]
    fn rgba_is_opaque() {
        assert_eq!(Color::ORANGE.to_rgba(), [255, 165, 0, 255]);
    }
}
