use serde::{Deserialize, Serialize};

use mandelzoom_core::Viewport;

use crate::color::{ColorStyle, SIMPLE_RGB_MAX_ITERATIONS};
use crate::palette::{Color, Palette};
use crate::settings::RenderSettings;

/// A named view with its coloring, ready to load into [`RenderSettings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub viewport: Viewport,
    pub max_iterations: u32,
    pub style: ColorStyle,
    /// May be empty for SimpleRgb presets.
    #[serde(default)]
    pub palette: Palette,
}

impl Preset {
    /// Snapshot the current view and coloring under `name`.
    pub fn capture(name: impl Into<String>, settings: &RenderSettings) -> Self {
        Self {
            name: name.into(),
            viewport: settings.viewport(),
            max_iterations: settings.effective_max_iterations(),
            style: settings.style(),
            palette: settings.palette().clone(),
        }
    }

    /// Load this preset, keeping the current pixel dimensions and fixing the
    /// aspect ratio to them. Nothing changes if the preset is invalid.
    pub fn apply(&self, settings: &mut RenderSettings) -> crate::Result<()> {
        let dims = settings.pixel_dims();
        settings.configure(
            self.viewport,
            dims,
            self.style,
            self.max_iterations,
            self.palette.clone(),
        )
    }
}

/// The built-in presets. The first is the full view.
pub fn default_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "Default".into(),
            viewport: Viewport::FULL,
            max_iterations: SIMPLE_RGB_MAX_ITERATIONS,
            style: ColorStyle::SimpleRgb,
            palette: Palette::new(Vec::new()),
        },
        Preset {
            name: "Fire Leaf".into(),
            viewport: Viewport {
                x: -0.11202303901237315,
                y: -0.92944262954527346,
                width: 0.013835606102545174,
                height: 0.0089072648146142352,
            },
            max_iterations: 128,
            style: ColorStyle::Paletted,
            palette: Palette::new(vec![
                Color::GREEN,
                Color::RED,
                Color::ORANGE,
                Color::WHITE,
                Color::BLACK,
            ]),
        },
        Preset {
            name: "Neptune's Trident".into(),
            viewport: Viewport {
                x: -0.561895714249722,
                y: -0.64233713371809176,
                width: 1.185069712557534E-05,
                height: 7.62939453125E-06,
            },
            max_iterations: 256,
            style: ColorStyle::Paletted,
            palette: Palette::new(vec![
                Color::rgb(0, 0, 64),
                Color::rgb(255, 255, 192),
                Color::rgb(128, 0, 128),
                Color::rgb(0, 192, 192),
                Color::WHITE,
                Color::BLACK,
            ]),
        },
        Preset {
            name: "Milkyway".into(),
            viewport: Viewport {
                x: 0.43918663254571694,
                y: -0.251801694741495,
                width: 9.4647755985933241E-05,
                height: 7.2604610487025933E-05,
            },
            max_iterations: 128,
            style: ColorStyle::Paletted,
            palette: Palette::new(vec![
                Color::WHITE,
                Color::rgb(0, 0, 32),
                Color::rgb(255, 255, 192),
                Color::BLACK,
            ]),
        },
    ]
}

/// Look up a preset by name, ignoring ASCII case.
pub fn find_preset<'a>(presets: &'a [Preset], name: &str) -> Option<&'a Preset> {
    presets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
