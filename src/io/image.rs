//! PNG map import and export using the fixed cell palette

use std::path::Path;

use image::{ImageBuffer, Rgba};
use ndarray::Array2;
use tracing::debug;

use crate::io::configuration::{
    BUILDING_COLOR, GRASS_COLOR, MAX_GRID_DIMENSION, ROCK_COLOR, WALL_COLOR,
};
use crate::io::error::{Result, WallError};
use crate::spatial::grid::{CellType, TileGrid};

/// Palette color of a cell type
pub const fn cell_color(cell_type: CellType) -> [u8; 4] {
    match cell_type {
        CellType::Grass => GRASS_COLOR,
        CellType::Building => BUILDING_COLOR,
        CellType::Wall => WALL_COLOR,
        CellType::Rock => ROCK_COLOR,
    }
}

/// Cell type painted with a palette color
///
/// Colors outside the palette map to `None`.
pub fn cell_from_color(color: [u8; 4]) -> Option<CellType> {
    [
        CellType::Grass,
        CellType::Building,
        CellType::Wall,
        CellType::Rock,
    ]
    .into_iter()
    .find(|&cell_type| cell_color(cell_type) == color)
}

/// Load a map from a PNG, one pixel per cell
///
/// Pixels whose color is not in the palette are read as grass.
///
/// # Errors
///
/// Returns an error if:
/// - The PNG file cannot be loaded
/// - The image is empty or larger than the grid dimension limit
pub fn load_grid_from_png(path: &Path) -> Result<TileGrid> {
    let img = image::open(path).map_err(|e| WallError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Err(WallError::InvalidSourceData {
            reason: "Map image contains no pixels".to_string(),
        });
    }
    if width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
        return Err(WallError::InvalidSourceData {
            reason: format!("Map {width}x{height} exceeds the {MAX_GRID_DIMENSION} cell limit"),
        });
    }

    let mut cells = Array2::from_elem((width, height), CellType::Grass);
    let mut unknown = 0_usize;
    for (x, y, pixel) in rgba_img.enumerate_pixels() {
        let color = [pixel[0], pixel[1], pixel[2], pixel[3]];
        let cell_type = cell_from_color(color).unwrap_or_else(|| {
            unknown += 1;
            CellType::Grass
        });
        if let Some(cell) = cells.get_mut([x as usize, y as usize]) {
            *cell = cell_type;
        }
    }

    if unknown > 0 {
        debug!(path = %path.display(), unknown, "pixels outside the palette read as grass");
    }

    Ok(TileGrid::from_cells(cells))
}

/// Export the grid as a PNG, one pixel per cell
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &TileGrid, output_path: &Path) -> Result<()> {
    let (width, height) = grid.cells().dim();
    let mut img = ImageBuffer::new(width as u32, height as u32);

    for ((x, y), &cell_type) in grid.cells().indexed_iter() {
        img.put_pixel(x as u32, y as u32, Rgba(cell_color(cell_type)));
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WallError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path).map_err(|e| WallError::ImageExport {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
