//! Tile grid component
//!
//! A fixed rectangular grid of cells. Cells whose value reaches
//! `collide_index` are solid. The grid is indexed as one object, and turns
//! into many collision candidates only when it is paired with something:
//! [`TileGrid::collidable_offsets`] lists the solid cells near the other
//! object, and the resolver tests one cell-sized hull translated to each of
//! those positions.

use thiserror::Error;

use crate::foundation::math::{Rect, Vec2};

/// Errors raised while building a tile grid
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TileGridError {
    /// The grid would have no cells
    #[error("Tile grid must have at least one cell")]
    Empty,

    /// Cell data does not match the declared dimensions
    #[error("Tile data has {actual} cells, expected {expected}")]
    SizeMismatch {
        /// Cells implied by the dimensions
        expected: usize,
        /// Cells supplied
        actual: usize,
    },

    /// A CSV row has a different length from the first row
    #[error("Row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Columns in the first row
        expected: usize,
        /// Columns in this row
        actual: usize,
    },

    /// A CSV cell is not an unsigned integer
    #[error("Invalid tile value {value:?} at row {row}, column {column}")]
    InvalidValue {
        /// Zero-based row index
        row: usize,
        /// Zero-based column index
        column: usize,
        /// Offending text
        value: String,
    },

    /// Cell sizes must be positive
    #[error("Tile size must be positive, got {width}x{height}")]
    InvalidTileSize {
        /// Cell width
        width: f32,
        /// Cell height
        height: f32,
    },
}

/// Grid of tile values with a collision threshold
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width_in_tiles: usize,
    height_in_tiles: usize,
    tile_width: f32,
    tile_height: f32,
    collide_index: u32,
    data: Vec<u32>,
}

impl TileGrid {
    /// Create a grid from row-major cell data
    pub fn new(
        width_in_tiles: usize,
        height_in_tiles: usize,
        tile_width: f32,
        tile_height: f32,
        collide_index: u32,
        data: Vec<u32>,
    ) -> Result<Self, TileGridError> {
        if width_in_tiles == 0 || height_in_tiles == 0 {
            return Err(TileGridError::Empty);
        }
        if tile_width <= 0.0 || tile_height <= 0.0 {
            return Err(TileGridError::InvalidTileSize { width: tile_width, height: tile_height });
        }
        let expected = width_in_tiles * height_in_tiles;
        if data.len() != expected {
            return Err(TileGridError::SizeMismatch { expected, actual: data.len() });
        }
        Ok(Self {
            width_in_tiles,
            height_in_tiles,
            tile_width,
            tile_height,
            collide_index,
            data,
        })
    }

    /// Create an all-empty grid
    pub fn empty(
        width_in_tiles: usize,
        height_in_tiles: usize,
        tile_width: f32,
        tile_height: f32,
        collide_index: u32,
    ) -> Result<Self, TileGridError> {
        Self::new(
            width_in_tiles,
            height_in_tiles,
            tile_width,
            tile_height,
            collide_index,
            vec![0; width_in_tiles * height_in_tiles],
        )
    }

    /// Parse comma separated rows of tile values
    ///
    /// Blank lines are ignored. Every row must have as many columns as the first.
    pub fn from_csv(csv: &str, tile_width: f32, tile_height: f32, collide_index: u32) -> Result<Self, TileGridError> {
        let mut data = Vec::new();
        let mut width = 0;
        let mut height = 0;

        for line in csv.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let mut columns = 0;
            for (column, cell) in line.split(',').map(str::trim).enumerate() {
                let value = cell.parse::<u32>().map_err(|_| TileGridError::InvalidValue {
                    row: height,
                    column,
                    value: cell.to_string(),
                })?;
                data.push(value);
                columns += 1;
            }
            if height == 0 {
                width = columns;
            } else if columns != width {
                return Err(TileGridError::RaggedRow { row: height, expected: width, actual: columns });
            }
            height += 1;
        }

        Self::new(width, height, tile_width, tile_height, collide_index, data)
    }

    /// Columns
    pub fn width_in_tiles(&self) -> usize {
        self.width_in_tiles
    }

    /// Rows
    pub fn height_in_tiles(&self) -> usize {
        self.height_in_tiles
    }

    /// Cell size
    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_width, self.tile_height)
    }

    /// Total size of the grid in world units
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width_in_tiles as f32 * self.tile_width,
            self.height_in_tiles as f32 * self.tile_height,
        )
    }

    /// Lowest value that counts as solid
    pub fn collide_index(&self) -> u32 {
        self.collide_index
    }

    /// One cell at the grid origin; translated by offsets during resolution
    pub fn cell_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.tile_width, self.tile_height)
    }

    /// Value of a cell, `None` when out of range
    pub fn tile(&self, column: usize, row: usize) -> Option<u32> {
        if column >= self.width_in_tiles || row >= self.height_in_tiles {
            return None;
        }
        self.data.get(row * self.width_in_tiles + column).copied()
    }

    /// Overwrite a cell, returning `false` when out of range
    pub fn set_tile(&mut self, column: usize, row: usize, value: u32) -> bool {
        if column >= self.width_in_tiles || row >= self.height_in_tiles {
            return false;
        }
        self.data[row * self.width_in_tiles + column] = value;
        true
    }

    /// Whether a cell is solid; out-of-range cells are not
    pub fn is_collidable(&self, column: usize, row: usize) -> bool {
        self.tile(column, row).is_some_and(|value| value >= self.collide_index)
    }

    /// Cell containing a world point, for a grid whose top-left is `origin`
    pub fn cell_at(&self, origin: Vec2, point: Vec2) -> Option<(usize, usize)> {
        let column = ((point.x - origin.x) / self.tile_width).floor();
        let row = ((point.y - origin.y) / self.tile_height).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        if column >= self.width_in_tiles || row >= self.height_in_tiles {
            return None;
        }
        Some((column, row))
    }

    /// Value under a world point, `None` when outside the grid
    pub fn tile_at(&self, origin: Vec2, point: Vec2) -> Option<u32> {
        let (column, row) = self.cell_at(origin, point)?;
        self.tile(column, row)
    }

    /// Whether a world point lands on a solid cell
    pub fn is_collidable_at(&self, origin: Vec2, point: Vec2) -> bool {
        self.cell_at(origin, point).is_some_and(|(column, row)| self.is_collidable(column, row))
    }

    /// World positions of the solid cells around `rect`
    ///
    /// Covers the cell holding `rect`'s top-left corner through one cell past
    /// its far edges, clamped to the grid.
    pub fn collidable_offsets(&self, origin: Vec2, rect: &Rect) -> Vec<Vec2> {
        let start_x = ((rect.x - origin.x) / self.tile_width).floor() as i64;
        let start_y = ((rect.y - origin.y) / self.tile_height).floor() as i64;
        let end_x = start_x + (rect.width / self.tile_width).ceil() as i64 + 1;
        let end_y = start_y + (rect.height / self.tile_height).ceil() as i64 + 1;

        let start_x = start_x.max(0);
        let start_y = start_y.max(0);
        let end_x = end_x.min(self.width_in_tiles as i64);
        let end_y = end_y.min(self.height_in_tiles as i64);

        let mut offsets = Vec::new();
        for row in start_y..end_y {
            for column in start_x..end_x {
                let (column, row) = (column as usize, row as usize);
                if self.is_collidable(column, row) {
                    offsets.push(Vec2::new(
                        origin.x + column as f32 * self.tile_width,
                        origin.y + row as f32 * self.tile_height,
                    ));
                }
            }
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> TileGrid {
        TileGrid::new(2, 2, 16.0, 16.0, 1, vec![1, 0, 0, 2]).unwrap()
    }

    #[test]
    fn test_dimension_checks() {
        assert_eq!(TileGrid::new(0, 2, 16.0, 16.0, 1, vec![]), Err(TileGridError::Empty));
        assert_eq!(
            TileGrid::new(2, 2, 16.0, 16.0, 1, vec![0; 3]),
            Err(TileGridError::SizeMismatch { expected: 4, actual: 3 })
        );
        assert_eq!(
            TileGrid::new(1, 1, 0.0, 16.0, 1, vec![0]),
            Err(TileGridError::InvalidTileSize { width: 0.0, height: 16.0 })
        );
    }

    #[test]
    fn test_from_csv() {
        let grid = TileGrid::from_csv("0,0,1\n\n1, 1 ,1\n", 8.0, 8.0, 1).unwrap();
        assert_eq!(grid.width_in_tiles(), 3);
        assert_eq!(grid.height_in_tiles(), 2);
        assert_eq!(grid.tile(2, 0), Some(1));
        assert_eq!(grid.tile(1, 1), Some(1));
        assert_eq!(grid.pixel_size(), Vec2::new(24.0, 16.0));
    }

    #[test]
    fn test_from_csv_errors() {
        assert_eq!(
            TileGrid::from_csv("0,1\n0,1,1", 8.0, 8.0, 1),
            Err(TileGridError::RaggedRow { row: 1, expected: 2, actual: 3 })
        );
        assert!(matches!(
            TileGrid::from_csv("0,x", 8.0, 8.0, 1),
            Err(TileGridError::InvalidValue { row: 0, column: 1, .. })
        ));
        assert_eq!(TileGrid::from_csv("", 8.0, 8.0, 1), Err(TileGridError::Empty));
    }

    #[test]
    fn test_out_of_range_queries_are_not_found() {
        let grid = two_by_two();
        let origin = Vec2::new(100.0, 100.0);

        assert_eq!(grid.tile(2, 0), None);
        assert_eq!(grid.tile_at(origin, Vec2::new(99.0, 101.0)), None);
        assert_eq!(grid.tile_at(origin, Vec2::new(132.0, 101.0)), None);
        assert!(!grid.is_collidable_at(origin, Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn test_point_queries_floor_divide() {
        let grid = two_by_two();
        let origin = Vec2::new(100.0, 100.0);

        assert_eq!(grid.cell_at(origin, Vec2::new(115.9, 116.0)), Some((0, 1)));
        assert!(grid.is_collidable_at(origin, Vec2::new(101.0, 101.0)));
        assert!(!grid.is_collidable_at(origin, Vec2::new(120.0, 101.0)));
        assert!(grid.is_collidable_at(origin, Vec2::new(120.0, 120.0)));
    }

    #[test]
    fn test_set_tile() {
        let mut grid = two_by_two();
        assert!(grid.set_tile(1, 0, 5));
        assert!(grid.is_collidable(1, 0));
        assert!(!grid.set_tile(5, 5, 1));
    }

    #[test]
    fn test_collidable_offsets_clamped_to_grid() {
        let grid = two_by_two();
        let origin = Vec2::new(0.0, 0.0);

        let all = grid.collidable_offsets(origin, &Rect::new(-20.0, -20.0, 100.0, 100.0));
        assert_eq!(all, vec![Vec2::new(0.0, 0.0), Vec2::new(16.0, 16.0)]);

        let near_origin = grid.collidable_offsets(origin, &Rect::new(2.0, 2.0, 4.0, 4.0));
        assert_eq!(near_origin, vec![Vec2::new(0.0, 0.0), Vec2::new(16.0, 16.0)]);

        let far_corner = grid.collidable_offsets(origin, &Rect::new(20.0, 20.0, 4.0, 4.0));
        assert_eq!(far_corner, vec![Vec2::new(16.0, 16.0)]);

        let outside = grid.collidable_offsets(origin, &Rect::new(200.0, 200.0, 4.0, 4.0));
        assert!(outside.is_empty());
    }
}
