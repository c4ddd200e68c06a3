use crate::map::Tile;
use glam::Vec3;
use std::collections::HashMap;

/// per-channel light multiplier
pub type Light = Vec3;

pub const FULL_BRIGHT: Light = Vec3::ONE;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// parse a `#RRGGBB` string
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let Some(digits) = hex.strip_prefix('#').filter(|d| d.len() == 6 && d.is_ascii()) else {
            anyhow::bail!("not a hex string: {hex}");
        };

        let r = u8::from_str_radix(&digits[0..2], 16)?;
        let g = u8::from_str_radix(&digits[2..4], 16)?;
        let b = u8::from_str_radix(&digits[4..6], 16)?;

        Ok(Self::rgb(r, g, b))
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    /// channels are clamped to [0, 255]; NaN becomes 0
    pub fn from_vec3(v: Vec3) -> Self {
        let channel = |c: f32| if c.is_nan() { 0 } else { c.clamp(0., 255.) as u8 };
        Self::rgb(channel(v.x), channel(v.y), channel(v.z))
    }
}

/// multiply each channel by its light component and clamp
pub fn apply(color: Color, light: Light) -> Color {
    Color::from_vec3(color.to_vec3() * light)
}

/// scale a light triple, optionally capping every channel
pub fn scale(light: Light, amplitude: f32, max_cap: Option<f32>) -> Light {
    let scaled = light * amplitude;
    match max_cap {
        Some(cap) => scaled.min(Vec3::splat(cap)),
        None => scaled,
    }
}

/// linear blend from `a` (t = 0) to `b` (t = 1)
pub fn mix(a: Color, b: Color, t: f32) -> Color {
    Color::from_vec3(a.to_vec3().lerp(b.to_vec3(), t.clamp(0., 1.)))
}

/// Per-frame lighting of the grid.
///
/// Every tile starts at the ambient level; tiles touched by a ray are
/// overridden (usually with [`FULL_BRIGHT`]). A fresh map is built by every
/// fan cast, so nothing leaks from one frame into the next.
#[derive(Clone, PartialEq, Debug)]
pub struct LightMap {
    ambient: Light,
    overrides: HashMap<(usize, usize), Light>,
}

impl Default for LightMap {
    fn default() -> Self {
        Self::new(FULL_BRIGHT)
    }
}

impl LightMap {
    pub fn new(ambient: Light) -> Self {
        Self {
            ambient,
            overrides: HashMap::new(),
        }
    }

    /// set every tile uniformly to `value`, dropping all per-tile lights
    pub fn reset_light(&mut self, value: Light) {
        self.ambient = value;
        self.overrides.clear();
    }

    pub fn set(&mut self, tile: &Tile, light: Light) {
        self.overrides.insert((tile.col, tile.row), light);
    }

    pub fn light_at(&self, col: usize, row: usize) -> Light {
        self.overrides
            .get(&(col, row))
            .copied()
            .unwrap_or(self.ambient)
    }

    pub fn is_lit(&self, col: usize, row: usize) -> bool {
        self.overrides.contains_key(&(col, row))
    }

    /// number of tiles with their own light value
    pub fn lit_count(&self) -> usize {
        self.overrides.len()
    }
}
