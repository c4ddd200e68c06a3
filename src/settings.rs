//! Render and session settings
//!
//! Defaults reproduce the demo layout: a 600×600 minimap beside a 600×600
//! perspective view. Levels may override some of them in their meta header.

use crate::light::{Color, Light};

/// Distance fog: walls fade towards `color`, fully reaching it at `distance`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Fog {
    pub distance: f32,
    pub color: Color,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Settings {
    /// perspective section width in pixels
    pub viewport_width: u32,
    /// perspective section height in pixels
    pub viewport_height: u32,
    /// minimap pixels per tile
    pub minimap_scale: f32,
    pub ray_count: usize,
    /// light of tiles no ray touched this frame
    pub ambient: Light,
    pub sky: Color,
    pub ground: Color,
    /// multiplier for walls hit on a row boundary
    pub side_shade: f32,
    pub fog: Option<Fog>,
    pub target_fps: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: 600,
            viewport_height: 600,
            minimap_scale: 20.,
            ray_count: 300,
            ambient: Light::splat(0.4),
            sky: Color::rgb(0x87, 0xCE, 0xEB),
            ground: Color::rgb(0x3A, 0x3A, 0x3A),
            side_shade: 0.75,
            fog: None,
            target_fps: 30,
        }
    }
}

impl Settings {
    /// milliseconds per frame at the target rate
    pub fn frame_millis(&self) -> u64 {
        1_000 / self.target_fps.max(1)
    }
}
