use crate::light::{self, Color, Light};
use crate::Point;
use glam::Vec2;

pub const AIR: u32 = 0;
pub const WALL: u32 = 1;

const WALL_COLOR: Color = Color::rgb(0x00, 0xDD, 0xDD);
const UNKNOWN_COLOR: Color = Color::rgb(0xFF, 0x00, 0xFF);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileKind {
    Air,
    Wall,
    /// present but unrecognized id, drawn with a placeholder color
    Unknown,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
    pub id: u32,
    pub col: usize,
    pub row: usize,
}

impl Tile {
    pub fn new(id: u32, col: usize, row: usize) -> Self {
        Self { id, col, row }
    }

    pub fn kind(&self) -> TileKind {
        match self.id {
            AIR => TileKind::Air,
            WALL => TileKind::Wall,
            _ => TileKind::Unknown,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.kind() != TileKind::Air
    }

    pub fn base_color(&self) -> Option<Color> {
        match self.kind() {
            TileKind::Air => None,
            TileKind::Wall => Some(WALL_COLOR),
            TileKind::Unknown => Some(UNKNOWN_COLOR),
        }
    }

    pub fn shaded_color(&self, light: Light) -> Option<Color> {
        self.base_color().map(|color| light::apply(color, light))
    }

    /// lower-left corner of the tile when one tile is `scale` units wide
    pub fn origin(&self, scale: f32) -> Vec2 {
        Vec2::new(self.col as f32, self.row as f32) * scale
    }

    /// edges are inclusive
    pub fn contains(&self, point: Point, scale: f32) -> bool {
        let min = self.origin(scale);
        let max = min + Vec2::splat(scale);
        (min.x..=max.x).contains(&point.x) && (min.y..=max.y).contains(&point.y)
    }
}

/// Rectangular tile map addressed `[row][col]`, row 0 at the bottom.
#[derive(Clone, PartialEq, Debug)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
    width: usize,
}

impl Grid {
    /// build a grid from tile ids, bottom row first
    pub fn new(ids: Vec<Vec<u32>>) -> anyhow::Result<Self> {
        let Some(width) = ids.first().map(Vec::len) else {
            anyhow::bail!("grid has no rows");
        };
        if width == 0 {
            anyhow::bail!("grid has no columns");
        }
        if let Some(row) = ids.iter().position(|r| r.len() != width) {
            anyhow::bail!(
                "row {row} has {} tiles, expected {width}",
                ids[row].len()
            );
        }

        let rows = ids
            .into_iter()
            .enumerate()
            .map(|(row, line)| {
                line.into_iter()
                    .enumerate()
                    .map(|(col, id)| Tile::new(id, col, row))
                    .collect()
            })
            .collect();

        Ok(Self { rows, width })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn tile_at(&self, col: i32, row: i32) -> Option<&Tile> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        self.rows.get(row)?.get(col)
    }

    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row).is_some_and(Tile::is_solid)
    }

    pub fn solid_tile(&self, col: i32, row: i32) -> Option<Tile> {
        self.tile_at(col, row).filter(|tile| tile.is_solid()).copied()
    }

    /// cell containing `point`; saturates for points far outside the grid
    pub fn cell_of(&self, point: Point) -> (i32, i32) {
        (point.x.floor() as i32, point.y.floor() as i32)
    }

    pub fn is_solid_at(&self, point: Point) -> bool {
        let (col, row) = self.cell_of(point);
        self.is_solid(col, row)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::new(vec![vec![1, 1, 1], vec![1, 0, 7], vec![1, 1, 1]]).unwrap()
    }

    #[test]
    fn shape_and_lookup() {
        let grid = sample();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.tile_at(2, 1).map(|t| t.id), Some(7));
        assert_eq!(grid.tile_at(2, 1).map(|t| (t.col, t.row)), Some((2, 1)));
        assert_eq!(grid.tiles().count(), 9);
    }

    #[test]
    fn out_of_bounds_is_no_tile() {
        let grid = sample();
        for (col, row) in [(-1, 0), (0, -1), (3, 0), (0, 3), (i32::MAX, i32::MIN)] {
            assert!(grid.tile_at(col, row).is_none());
            assert!(!grid.is_solid(col, row));
        }
    }

    #[test]
    fn air_is_never_solid_or_colored() {
        let grid = sample();
        assert!(!grid.is_solid(1, 1));
        assert!(grid.solid_tile(1, 1).is_none());
        let air = grid.tile_at(1, 1).copied().unwrap();
        assert_eq!(air.kind(), TileKind::Air);
        assert_eq!(air.base_color(), None);
        assert_eq!(air.shaded_color(Light::ONE), None);
    }

    #[test]
    fn kinds_and_colors() {
        let wall = Tile::new(WALL, 0, 0);
        let odd = Tile::new(42, 0, 0);
        assert_eq!(wall.kind(), TileKind::Wall);
        assert_eq!(odd.kind(), TileKind::Unknown);
        assert!(odd.is_solid());
        assert_eq!(wall.base_color(), Some(WALL_COLOR));
        assert_eq!(odd.base_color(), Some(UNKNOWN_COLOR));
        assert_eq!(
            wall.shaded_color(Light::splat(0.5)),
            Some(Color::rgb(0, 110, 110))
        );
    }

    #[test]
    fn geometry_is_pure_in_scale() {
        let tile = Tile::new(WALL, 2, 3);
        assert_eq!(tile.origin(1.), Vec2::new(2., 3.));
        assert_eq!(tile.origin(20.), Vec2::new(40., 60.));
        assert!(tile.contains(Vec2::new(2.5, 3.5), 1.));
        assert!(tile.contains(Vec2::new(60., 80.), 20.));
        assert!(!tile.contains(Vec2::new(1.9, 3.5), 1.));
    }

    #[test]
    fn cell_of_floors() {
        let grid = sample();
        assert_eq!(grid.cell_of(Vec2::new(1.99, 0.01)), (1, 0));
        assert_eq!(grid.cell_of(Vec2::new(-0.5, 2.)), (-1, 2));
        assert!(grid.is_solid_at(Vec2::new(0.5, 0.5)));
        assert!(!grid.is_solid_at(Vec2::new(1.5, 1.5)));
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert!(Grid::new(vec![]).is_err());
        assert!(Grid::new(vec![vec![]]).is_err());
        assert!(Grid::new(vec![vec![1, 1], vec![1]]).is_err());
    }
}
