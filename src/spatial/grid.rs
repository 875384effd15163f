//! Tile grid storage, the host contract used by the synthesizer, and enclosure checks
//!
//! The synthesizer never owns the map it walls in. It reads and writes cells
//! through [`TileHost`], which any map representation can implement;
//! [`TileGrid`] is the in-memory implementation used by the CLI and tests.

use ndarray::Array2;
use std::fmt;
use std::str::FromStr;

use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{Result, WallError, out_of_bounds};

/// Terrain stored in a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellType {
    /// Open buildable terrain
    #[default]
    Grass,
    /// Structure that must end up inside the wall
    Building,
    /// Committed wall segment
    Wall,
    /// Natural barrier; never walled, never part of the frontier
    Rock,
}

impl CellType {
    /// Character used for this cell in text maps
    pub const fn symbol(self) -> char {
        match self {
            Self::Grass => '.',
            Self::Building => 'B',
            Self::Wall => '#',
            Self::Rock => 'R',
        }
    }

    /// Parse a text map character
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Grass),
            'B' => Some(Self::Building),
            '#' => Some(Self::Wall),
            'R' => Some(Self::Rock),
            _ => None,
        }
    }

    /// Whether the cell blocks movement between the inside and outside of a wall
    pub const fn is_barrier(self) -> bool {
        matches!(self, Self::Wall | Self::Rock)
    }
}

/// Cosmetic tag the synthesizer attaches to cells while it searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    /// No highlight
    #[default]
    None,
    /// Expanded interior cell
    Closed,
    /// Frontier cell
    Open,
    /// Start cell of the search
    Start,
}

/// Grid contract consumed by the synthesizer
///
/// Coordinates are zero-based over `[0, width) × [0, height)`. Accessors
/// report out-of-range coordinates as [`WallError::OutOfBounds`].
pub trait TileHost {
    /// Number of columns
    fn width(&self) -> usize;

    /// Number of rows
    fn height(&self) -> usize;

    /// Current terrain of a cell
    ///
    /// # Errors
    ///
    /// Returns [`WallError::OutOfBounds`] if the coordinate is outside the grid
    fn cell_type(&self, x: usize, y: usize) -> Result<CellType>;

    /// Overwrite the terrain of a cell
    ///
    /// # Errors
    ///
    /// Returns [`WallError::OutOfBounds`] if the coordinate is outside the grid
    fn set_cell_type(&mut self, x: usize, y: usize, cell_type: CellType) -> Result<()>;

    /// Attach a cosmetic tag to a cell; hosts without a display ignore it
    fn highlight(&mut self, _x: usize, _y: usize, _tag: Highlight) {}
}

/// Axis-aligned bounding box over grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Minimum coordinates (inclusive)
    pub min: [usize; 2],
    /// Maximum coordinates (inclusive)
    pub max: [usize; 2],
}

impl BoundingBox {
    /// Smallest box containing every position, or `None` for no positions
    pub fn around(positions: impl IntoIterator<Item = [usize; 2]>) -> Option<Self> {
        positions.into_iter().fold(None, |bounds, [x, y]| {
            Some(bounds.map_or(
                Self {
                    min: [x, y],
                    max: [x, y],
                },
                |b: Self| Self {
                    min: [b.min[0].min(x), b.min[1].min(y)],
                    max: [b.max[0].max(x), b.max[1].max(y)],
                },
            ))
        })
    }

    /// Center cell, rounding toward the minimum corner
    pub const fn center(&self) -> [usize; 2] {
        [
            (self.min[0] + self.max[0]) / 2,
            (self.min[1] + self.max[1]) / 2,
        ]
    }
}

/// In-memory tile map indexed by `[x, y]`
///
/// Keeps the last highlight tag of every cell so a search can be rendered
/// frame by frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    cells: Array2<CellType>,
    highlights: Array2<Highlight>,
}

impl TileGrid {
    /// Create a grid filled with grass
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_cells(Array2::from_elem((width, height), CellType::Grass))
    }

    /// Wrap an existing cell array of shape `(width, height)`
    pub fn from_cells(cells: Array2<CellType>) -> Self {
        let highlights = Array2::from_elem(cells.dim(), Highlight::None);
        Self { cells, highlights }
    }

    /// Terrain array indexed by `[x, y]`
    pub const fn cells(&self) -> &Array2<CellType> {
        &self.cells
    }

    /// Highlight array indexed by `[x, y]`
    pub const fn highlights(&self) -> &Array2<Highlight> {
        &self.highlights
    }

    /// Terrain at a position, `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<CellType> {
        self.cells.get([x, y]).copied()
    }

    /// Highlight at a position, `None` outside the grid
    pub fn highlight_at(&self, x: usize, y: usize) -> Option<Highlight> {
        self.highlights.get([x, y]).copied()
    }

    /// All positions holding the given terrain, in `x`-major order
    pub fn positions_of(&self, cell_type: CellType) -> Vec<[usize; 2]> {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| **cell == cell_type)
            .map(|((x, y), _)| [x, y])
            .collect()
    }

    /// Number of cells holding the given terrain
    pub fn count(&self, cell_type: CellType) -> usize {
        self.cells.iter().filter(|cell| **cell == cell_type).count()
    }

    /// Remove every highlight tag
    pub fn clear_highlights(&mut self) {
        self.highlights.fill(Highlight::None);
    }

    /// Cells reachable from the grid border without crossing a wall or rock
    ///
    /// Flood fill over all 8 neighbors, seeded from every non-barrier border
    /// cell. Everything left `false` is enclosed.
    pub fn exterior_mask(&self) -> Array2<bool> {
        let (width, height) = self.cells.dim();
        let mut exterior = Array2::from_elem((width, height), false);
        let mut stack = Vec::new();

        for ((x, y), cell) in self.cells.indexed_iter() {
            let on_border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_border && !cell.is_barrier() {
                if let Some(seen) = exterior.get_mut([x, y]) {
                    *seen = true;
                }
                stack.push([x, y]);
            }
        }

        while let Some([x, y]) = stack.pop() {
            for dx in -1..=1_isize {
                for dy in -1..=1_isize {
                    let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                    else {
                        continue;
                    };
                    let passable = self.get(nx, ny).is_some_and(|cell| !cell.is_barrier());
                    if !passable {
                        continue;
                    }
                    if let Some(seen) = exterior.get_mut([nx, ny]) {
                        if !*seen {
                            *seen = true;
                            stack.push([nx, ny]);
                        }
                    }
                }
            }
        }

        exterior
    }

    /// Whether every building is cut off from the grid border by walls and rocks
    pub fn buildings_enclosed(&self) -> bool {
        let exterior = self.exterior_mask();
        self.positions_of(CellType::Building)
            .into_iter()
            .all(|[x, y]| exterior.get([x, y]).is_some_and(|outside| !outside))
    }
}

impl TileHost for TileGrid {
    fn width(&self) -> usize {
        self.cells.dim().0
    }

    fn height(&self) -> usize {
        self.cells.dim().1
    }

    fn cell_type(&self, x: usize, y: usize) -> Result<CellType> {
        self.get(x, y)
            .ok_or_else(|| out_of_bounds(x, y, self.width(), self.height()))
    }

    fn set_cell_type(&mut self, x: usize, y: usize, cell_type: CellType) -> Result<()> {
        let (width, height) = self.cells.dim();
        let cell = self
            .cells
            .get_mut([x, y])
            .ok_or_else(|| out_of_bounds(x, y, width, height))?;
        *cell = cell_type;
        Ok(())
    }

    fn highlight(&mut self, x: usize, y: usize, tag: Highlight) {
        if let Some(slot) = self.highlights.get_mut([x, y]) {
            *slot = tag;
        }
    }
}

impl FromStr for TileGrid {
    type Err = WallError;

    /// Parse a text map: one line per row, `.` grass, `B` building, `#` wall, `R` rock
    ///
    /// Blank lines are skipped and trailing whitespace is ignored.
    fn from_str(source: &str) -> Result<Self> {
        let mut rows: Vec<(usize, Vec<CellType>)> = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let row = line
                .chars()
                .map(|symbol| {
                    CellType::from_symbol(symbol).ok_or_else(|| WallError::MapParse {
                        line: index + 1,
                        reason: format!("unknown cell symbol '{symbol}'"),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push((index + 1, row));
        }

        let width = rows.first().map_or(0, |(_, row)| row.len());
        let height = rows.len();
        if width == 0 {
            return Err(WallError::InvalidSourceData {
                reason: "Map contains no cells".to_string(),
            });
        }
        if width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
            return Err(WallError::InvalidSourceData {
                reason: format!("Map {width}x{height} exceeds the {MAX_GRID_DIMENSION} cell limit"),
            });
        }

        let mut cells = Array2::from_elem((width, height), CellType::Grass);
        for (y, (line, row)) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(WallError::MapParse {
                    line,
                    reason: format!("expected {width} cells, found {}", row.len()),
                });
            }
            for (x, cell_type) in row.into_iter().enumerate() {
                if let Some(cell) = cells.get_mut([x, y]) {
                    *cell = cell_type;
                }
            }
        }

        Ok(Self::from_cells(cells))
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.cells.dim();
        for y in 0..height {
            for x in 0..width {
                let symbol = self.get(x, y).map_or('?', CellType::symbol);
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
