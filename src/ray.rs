use crate::map::{Grid, Tile};
use crate::{normalize_radians, Point};
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// rays this close to a grid axis are treated as exactly axis-aligned
pub const AXIS_EPSILON: f32 = 1e-5;

/// Which family of grid lines the ray stopped on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    /// a column boundary (x = const), found by the vertical sweep
    Vertical = 0,
    /// a row boundary (y = const), found by the horizontal sweep
    Horizontal = 1,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RayResult {
    /// relative to the camera heading
    pub offset: f32,
    /// absolute, in [0, 2π)
    pub angle: f32,
    pub point: Point,
    pub distance: f32,
    pub tile: Option<Tile>,
    pub side: Side,
}

impl RayResult {
    pub fn is_hit(&self) -> bool {
        self.tile.is_some()
    }
}

/// outcome of marching across one family of grid lines
#[derive(Clone, Copy, Debug)]
struct Sweep {
    point: Point,
    tile: Option<Tile>,
}

fn near(angle: f32, target: f32) -> bool {
    (angle - target).abs() < AXIS_EPSILON
}

/// slopes that come out undefined are treated as infinitely steep
fn finite_or_infinite(v: f32) -> f32 {
    if v.is_nan() {
        f32::INFINITY
    } else {
        v
    }
}

/// a sweep that is parallel to its grid lines only ever sees the origin cell
fn own_cell(grid: &Grid, origin: Point) -> Sweep {
    let (col, row) = grid.cell_of(origin);
    Sweep {
        point: origin,
        tile: grid.solid_tile(col, row),
    }
}

/// Step from `start` by `step` until a solid tile is sampled, the budget of
/// `max_distance` steps runs out, or a sample lies farther than `max_distance`
/// from `origin`. Each step is at least one unit long, so the distance limit
/// is always reached before the step budget.
fn march(
    grid: &Grid,
    origin: Point,
    start: Point,
    step: Vec2,
    max_distance: u32,
    cell: impl Fn(Point) -> (i32, i32),
) -> Sweep {
    let limit = max_distance as f32;
    let mut last = origin;
    let mut point = start;
    for _ in 0..=max_distance {
        // also stops on NaN
        if !(origin.distance(point) <= limit) {
            break;
        }
        let (col, row) = cell(point);
        if let Some(tile) = grid.solid_tile(col, row) {
            return Sweep {
                point,
                tile: Some(tile),
            };
        }
        last = point;
        point += step;
    }

    Sweep {
        point: last,
        tile: None,
    }
}

/// march across row boundaries (y = const)
fn horizontal_sweep(grid: &Grid, origin: Point, angle: f32, max_distance: u32) -> Sweep {
    if near(angle, 0.) || near(angle, PI) || near(angle, TAU) {
        return own_cell(grid, origin);
    }

    let tan = angle.tan();
    let atan = if tan == 0. {
        f32::INFINITY
    } else {
        finite_or_infinite(-1. / tan)
    };

    // LOOKING TOWARDS -Y: the boundary belongs to the row below it
    let (ry, dy, row_bias) = if angle > PI {
        (origin.y.floor(), -1., -1)
    } else {
        (origin.y.floor() + 1., 1., 0)
    };
    let rx = (origin.y - ry) * atan + origin.x;
    let step = Vec2::new(-dy * atan, dy);

    march(grid, origin, Vec2::new(rx, ry), step, max_distance, |p| {
        (p.x.floor() as i32, (p.y.floor() as i32).saturating_add(row_bias))
    })
}

/// march across column boundaries (x = const)
fn vertical_sweep(grid: &Grid, origin: Point, angle: f32, max_distance: u32) -> Sweep {
    if near(angle, FRAC_PI_2) || near(angle, 3. * FRAC_PI_2) {
        return own_cell(grid, origin);
    }

    let ntan = finite_or_infinite(-angle.tan());

    // LOOKING TOWARDS -X: the boundary belongs to the column left of it
    let (rx, dx, col_bias) = if angle > FRAC_PI_2 && angle < 3. * FRAC_PI_2 {
        (origin.x.floor(), -1., -1)
    } else {
        (origin.x.floor() + 1., 1., 0)
    };
    let ry = (origin.x - rx) * ntan + origin.y;
    let step = Vec2::new(dx, -dx * ntan);

    march(grid, origin, Vec2::new(rx, ry), step, max_distance, |p| {
        ((p.x.floor() as i32).saturating_add(col_bias), p.y.floor() as i32)
    })
}

/// Cast a single ray from `origin` at an absolute angle.
pub fn cast(grid: &Grid, origin: Point, ray_angle: f32, max_distance: u32) -> RayResult {
    cast_offset(grid, origin, ray_angle, 0., max_distance)
}

/// Cast a ray at `heading + offset`; the offset is kept for fish-eye correction.
pub fn cast_offset(
    grid: &Grid,
    origin: Point,
    heading: f32,
    offset: f32,
    max_distance: u32,
) -> RayResult {
    let angle = normalize_radians(heading + offset);

    let h = horizontal_sweep(grid, origin, angle, max_distance);
    let v = vertical_sweep(grid, origin, angle, max_distance);
    let dist_h = origin.distance(h.point);
    let dist_v = origin.distance(v.point);

    let (sweep, distance, side) = match (h.tile, v.tile) {
        (Some(_), Some(_)) if dist_v <= dist_h => (v, dist_v, Side::Vertical),
        (Some(_), Some(_)) | (Some(_), None) => (h, dist_h, Side::Horizontal),
        (None, Some(_)) => (v, dist_v, Side::Vertical),
        // nothing hit: report wherever the longer march gave up
        (None, None) if dist_v >= dist_h => (v, dist_v, Side::Vertical),
        (None, None) => (h, dist_h, Side::Horizontal),
    };

    log::trace!(
        "ray {angle:.4} -> {:?} at {distance:.3} ({side:?})",
        sweep.tile.map(|t| (t.col, t.row))
    );

    RayResult {
        offset,
        angle,
        point: sweep.point,
        distance,
        tile: sweep.tile,
        side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(size: usize) -> Grid {
        let ids = (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| {
                        let edge = row == 0 || col == 0 || row == size - 1 || col == size - 1;
                        edge as u32
                    })
                    .collect()
            })
            .collect();
        Grid::new(ids).unwrap()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn east_hits_vertical_wall() {
        let grid = boxed(5);
        let ray = cast(&grid, Vec2::new(2.5, 2.5), 0., 10);
        assert_eq!(ray.distance, 1.5);
        assert_eq!(ray.side, Side::Vertical);
        let tile = ray.tile.unwrap();
        assert_eq!((tile.col, tile.row), (4, 2));
        assert_eq!(ray.point, Vec2::new(4., 2.5));
    }

    #[test]
    fn axis_aligned_rays_hit_each_wall() {
        let grid = boxed(5);
        let origin = Vec2::new(2.5, 2.5);
        let cases = [
            (0., (4, 2), Side::Vertical),
            (FRAC_PI_2, (2, 4), Side::Horizontal),
            (PI, (0, 2), Side::Vertical),
            (3. * FRAC_PI_2, (2, 0), Side::Horizontal),
        ];
        for (angle, cell, side) in cases {
            let ray = cast(&grid, origin, angle, 10);
            assert!(ray.distance.is_finite(), "angle {angle}");
            assert!(close(ray.distance, 1.5), "angle {angle}: {}", ray.distance);
            assert_eq!(ray.side, side, "angle {angle}");
            let tile = ray.tile.unwrap();
            assert_eq!((tile.col, tile.row), cell, "angle {angle}");
        }
    }

    #[test]
    fn axis_aligned_matches_single_axis_march() {
        let grid = boxed(7);
        let origin = Vec2::new(2.25, 3.75);
        let ray = cast(&grid, origin, PI, 10);
        // only the vertical sweep marches: west wall at x = 1
        assert_eq!(ray.point, Vec2::new(1., 3.75));
        assert_eq!(ray.distance, 1.25);

        let ray = cast(&grid, origin, FRAC_PI_2, 10);
        assert!(close(ray.point.x, 2.25));
        assert_eq!(ray.point.y, 6.);
        assert_eq!(ray.side, Side::Horizontal);
    }

    #[test]
    fn walled_cell_hits_nearer_boundary() {
        let grid = boxed(3);
        let origin = Vec2::new(1.4, 1.55);
        let cases = [
            (0., Side::Vertical),
            (FRAC_PI_2, Side::Horizontal),
            (PI, Side::Vertical),
            (3. * FRAC_PI_2, Side::Horizontal),
            (30f32.to_radians(), Side::Vertical),
            (80f32.to_radians(), Side::Horizontal),
            (200f32.to_radians(), Side::Vertical),
            (250f32.to_radians(), Side::Horizontal),
        ];
        for (angle, side) in cases {
            let ray = cast(&grid, origin, angle, 1);
            assert!(ray.is_hit(), "angle {angle}");
            assert!(ray.distance < 1., "angle {angle}: {}", ray.distance);
            assert_eq!(ray.side, side, "angle {angle}");
        }
    }

    #[test]
    fn up_and_left_sample_the_cell_being_entered() {
        // single solid tile directly below-left of an open area
        let grid = Grid::new(vec![
            vec![1, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let down = cast(&grid, Vec2::new(0.5, 2.5), 3. * FRAC_PI_2, 5);
        assert_eq!(down.tile.map(|t| (t.col, t.row)), Some((0, 0)));
        assert_eq!(down.distance, 1.5);

        let left = cast(&grid, Vec2::new(3.5, 0.5), PI, 5);
        assert_eq!(left.tile.map(|t| (t.col, t.row)), Some((0, 0)));
        assert_eq!(left.distance, 2.5);
    }

    #[test]
    fn longer_view_distance_never_changes_a_hit() {
        let grid = Grid::new(vec![
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 2, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ])
        .unwrap();
        let origin = Vec2::new(1.3, 2.2);
        for degrees in (0..360).step_by(7) {
            let angle = (degrees as f32).to_radians();
            let mut first_hit: Option<RayResult> = None;
            for max_distance in 1..16 {
                let ray = cast(&grid, origin, angle, max_distance);
                match first_hit {
                    Some(hit) => assert_eq!(ray, hit, "angle {degrees} at {max_distance}"),
                    None if ray.is_hit() => first_hit = Some(ray),
                    None => {}
                }
            }
            assert!(first_hit.is_some(), "angle {degrees} never hit");
        }
    }

    #[test]
    fn no_hit_reports_last_sample() {
        let grid = Grid::new(vec![vec![0; 8]; 8]).unwrap();
        let ray = cast(&grid, Vec2::new(0.5, 0.5), 0., 3);
        assert!(!ray.is_hit());
        assert_eq!(ray.point, Vec2::new(3., 0.5));
        assert_eq!(ray.distance, 2.5);

        let ray = cast(&grid, Vec2::new(0.5, 0.5), 0.3, 0);
        assert!(!ray.is_hit());
        assert_eq!(ray.point, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn solid_origin_is_a_zero_distance_hit() {
        let grid = boxed(3);
        let ray = cast(&grid, Vec2::new(0.5, 0.5), 0., 4);
        assert!(ray.is_hit());
        assert_eq!(ray.distance, 0.);
    }

    #[test]
    fn angle_is_normalized() {
        let grid = boxed(5);
        let ray = cast_offset(&grid, Vec2::new(2.5, 2.5), TAU, -FRAC_PI_2, 10);
        assert!(close(ray.angle, 3. * FRAC_PI_2));
        assert_eq!(ray.offset, -FRAC_PI_2);
        assert_eq!(ray.tile.map(|t| t.row), Some(0));
    }
}
