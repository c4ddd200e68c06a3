use crate::camera::Camera;
use crate::light::{self, Color, Light, LightMap, FULL_BRIGHT};
use crate::map::{Grid, Tile};
use crate::ray::{self, RayResult, Side};
use crate::settings::Settings;
use crate::{translate, Point};
use glam::Vec2;

/// minimap length of the heading marker, in tiles
const HEADING_TIP: f32 = 0.5;

/// Rays of one frame, in angle order, and the lighting they produced.
#[derive(Clone, PartialEq, Debug)]
pub struct Fan {
    pub rays: Vec<RayResult>,
    pub lights: LightMap,
}

/// Angle offsets in radians, evenly spread over `[-fov/2, +fov/2]`.
pub fn fan_offsets(ray_count: usize, fov: f32) -> Vec<f32> {
    let fov = fov.to_radians();
    let half = fov * 0.5;
    match ray_count {
        0 => vec![],
        1 => vec![0.],
        n => (0..n)
            .map(|i| fov * (i as f32 / (n - 1) as f32) - half)
            .collect(),
    }
}

/// Cast `ray_count` rays across `fov` degrees centred on the camera heading.
///
/// Every tile starts at `ambient`; tiles that stop a ray become fully lit.
pub fn cast_fan(
    grid: &Grid,
    camera: &Camera,
    ray_count: usize,
    fov: f32,
    ambient: Light,
) -> Fan {
    let heading = camera.radians();
    let mut lights = LightMap::new(ambient);

    let rays = fan_offsets(ray_count, fov)
        .into_iter()
        .map(|offset| {
            let ray = ray::cast_offset(
                grid,
                camera.position,
                heading,
                offset,
                camera.view_distance,
            );
            if let Some(tile) = &ray.tile {
                lights.set(tile, FULL_BRIGHT);
            }
            ray
        })
        .collect::<Vec<_>>();

    log::debug!(
        "cast {} rays from {:?}, {} tiles lit",
        rays.len(),
        camera.position,
        lights.lit_count()
    );

    Fan { rays, lights }
}

/// distance along the view direction, which removes fish-eye distortion
pub fn corrected_distance(ray: &RayResult) -> f32 {
    ray.distance * ray.offset.cos()
}

/// on-screen height of a wall, `None` if there is nothing to draw
pub fn column_height(corrected_distance: f32, viewport_height: f32) -> Option<f32> {
    if corrected_distance > 0. && corrected_distance.is_finite() {
        Some(viewport_height / corrected_distance)
    } else {
        None
    }
}

/// flat background fill between two screen rows
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Band {
    pub top: f32,
    pub bottom: f32,
    pub color: Color,
}

/// one vertical strip of the perspective view
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Column {
    pub index: usize,
    pub x: f32,
    pub width: f32,
    pub top: f32,
    pub bottom: f32,
    /// `None` when the ray found no wall; only the background shows
    pub color: Option<Color>,
}

impl Column {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Perspective draw list: the two bands first, then the columns left to right.
#[derive(Clone, PartialEq, Debug)]
pub struct Frame {
    pub sky: Band,
    pub ground: Band,
    pub columns: Vec<Column>,
}

fn wall_color(
    tile: &Tile,
    ray: &RayResult,
    lights: &LightMap,
    settings: &Settings,
) -> Option<Color> {
    let mut color = tile.shaded_color(lights.light_at(tile.col, tile.row))?;

    if ray.side == Side::Horizontal {
        color = light::apply(color, Light::splat(settings.side_shade));
    }
    if let Some(fog) = settings.fog.filter(|fog| fog.distance > 0.) {
        color = light::mix(color, fog.color, ray.distance / fog.distance);
    }

    Some(color)
}

/// Turn a fan into screen columns, one per ray, in fan order.
pub fn project(fan: &Fan, camera: &Camera, settings: &Settings) -> Frame {
    let viewport_height = settings.viewport_height as f32;
    let center = viewport_height / 2. - camera.look;
    let horizon = center.clamp(0., viewport_height);
    let width = if fan.rays.is_empty() {
        0.
    } else {
        settings.viewport_width as f32 / fan.rays.len() as f32
    };

    let columns = fan
        .rays
        .iter()
        .enumerate()
        .map(|(index, ray)| {
            let wall = ray.tile.and_then(|tile| {
                let height = column_height(corrected_distance(ray), viewport_height)?;
                Some((height, wall_color(&tile, ray, &fan.lights, settings)?))
            });
            let (half, color) = match wall {
                Some((height, color)) => (height / 2., Some(color)),
                None => (0., None),
            };

            Column {
                index,
                x: index as f32 * width,
                width,
                top: center - half,
                bottom: center + half,
                color,
            }
        })
        .collect();

    Frame {
        sky: Band {
            top: 0.,
            bottom: horizon,
            color: settings.sky,
        },
        ground: Band {
            top: horizon,
            bottom: viewport_height,
            color: settings.ground,
        },
        columns,
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MinimapCell {
    /// top-left corner in section pixels
    pub corner: Vec2,
    pub size: f32,
    pub color: Color,
    /// a ray stopped on this tile this frame
    pub lit: bool,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
    pub hit: bool,
}

/// Top-down draw list, north up, in pixels relative to the section corner.
#[derive(Clone, PartialEq, Debug)]
pub struct Minimap {
    pub width: f32,
    pub height: f32,
    pub cells: Vec<MinimapCell>,
    pub rays: Vec<Segment>,
    pub camera: Vec2,
    pub heading_tip: Vec2,
}

/// Flat projection of the grid and the fan with `scale` pixels per tile.
pub fn minimap(grid: &Grid, fan: &Fan, camera: &Camera, scale: f32) -> Minimap {
    let rows = grid.height() as f32;
    // world y grows north, screen y grows down
    let to_screen = |p: Point| Vec2::new(p.x * scale, (rows - p.y) * scale);

    let cells = grid
        .tiles()
        .filter_map(|tile| {
            let color = tile.shaded_color(fan.lights.light_at(tile.col, tile.row))?;
            Some(MinimapCell {
                corner: to_screen(Vec2::new(tile.col as f32, tile.row as f32 + 1.)),
                size: scale,
                color,
                lit: fan.lights.is_lit(tile.col, tile.row),
            })
        })
        .collect();

    let rays = fan
        .rays
        .iter()
        .map(|ray| Segment {
            from: to_screen(camera.position),
            to: to_screen(ray.point),
            hit: ray.is_hit(),
        })
        .collect();

    Minimap {
        width: grid.width() as f32 * scale,
        height: rows * scale,
        cells,
        rays,
        camera: to_screen(camera.position),
        heading_tip: to_screen(translate(camera.position, camera.radians(), HEADING_TIP)),
    }
}
