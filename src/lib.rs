//! Grid ray casting: a top-down minimap and a pseudo-3D view from one fan of rays.
//!
//! World coordinates are in tiles, with row 0 at the bottom (south) and y
//! growing north. Angles are counter-clockwise from +x.

use glam::Vec2;
use std::f32::consts::TAU;

pub mod camera;
pub mod level;
pub mod light;
pub mod map;
pub mod projection;
pub mod ray;
pub mod settings;

pub use camera::{Camera, Input};
pub use level::Level;
pub use light::{Color, Light, LightMap};
pub use map::{Grid, Tile, TileKind};
pub use projection::{cast_fan, minimap, project, Fan, Frame, Minimap};
pub use ray::{cast, RayResult, Side};
pub use settings::Settings;

/// a position in grid units
pub type Point = Vec2;

/// wrap an angle into [0, 2π)
pub fn normalize_radians(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative angles up to exactly TAU
    if wrapped >= TAU {
        0.
    } else {
        wrapped
    }
}

/// move `point` by `distance` along `angle`
pub fn translate(point: Point, angle: f32, distance: f32) -> Point {
    point + Vec2::from_angle(angle) * distance
}
