use palette::{Srgb, Srgba};
use sectors::ItemColor;
use serde::Serialize;
use std::collections::HashMap;

/// Fill and stroke colours of the editor scene. Every entry can be replaced
/// from the `[theme]` table of the config by its field name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneColors {
    pub sector: Srgba<f64>,
    pub sector_active: Srgba<f64>,
    pub highlight: Srgba<f64>,
    pub divider: Srgba<f64>,
    pub trash: Srgba<f64>,
    pub trash_hovered: Srgba<f64>,
    pub connector: Srgba<f64>,
}

impl SceneColors {
    pub fn from_overrides(overrides: &HashMap<String, ItemColor>) -> Self {
        Self {
            sector: lookup_color(overrides, "sector", hex(0x27, 0x27, 0x2a, 1.0), None),
            sector_active: lookup_color(
                overrides,
                "sector_active",
                hex(0x32, 0x32, 0x35, 1.0),
                None,
            ),
            highlight: lookup_color(overrides, "highlight", hex(0x8b, 0x5c, 0xf6, 1.0), None),
            divider: lookup_color(overrides, "divider", hex(0xff, 0xff, 0xff, 0.1), Some(0.1)),
            trash: lookup_color(overrides, "trash", hex(0x17, 0x17, 0x17, 1.0), None),
            trash_hovered: lookup_color(
                overrides,
                "trash_hovered",
                hex(0xc6, 0x22, 0x22, 1.0),
                None,
            ),
            connector: lookup_color(overrides, "connector", hex(0xff, 0xff, 0xff, 1.0), None),
        }
    }
}

impl Default for SceneColors {
    fn default() -> Self {
        Self::from_overrides(&HashMap::new())
    }
}

pub fn item_color(color: ItemColor, alpha: f64) -> Srgba<f64> {
    let c: Srgb<f64> = color.rgb().into_format();
    Srgba::new(c.red, c.green, c.blue, alpha)
}

fn hex(red: u8, green: u8, blue: u8, alpha: f64) -> Srgba<f64> {
    let c: Srgb<f64> = Srgb::new(red, green, blue).into_format();
    Srgba::new(c.red, c.green, c.blue, alpha)
}

fn lookup_color(
    overrides: &HashMap<String, ItemColor>,
    name: &str,
    fallback: Srgba<f64>,
    alpha_override: Option<f64>,
) -> Srgba<f64> {
    overrides
        .get(name)
        .map(|&c| item_color(c, alpha_override.unwrap_or(1.0)))
        .unwrap_or(fallback)
}
