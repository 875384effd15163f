//! Tests for PNG map import and export

#[cfg(test)]
mod tests {
    use greedywall::WallError;
    use greedywall::io::configuration::{BUILDING_COLOR, GRASS_COLOR, ROCK_COLOR, WALL_COLOR};
    use greedywall::io::image::{cell_color, cell_from_color, export_grid_as_png, load_grid_from_png};
    use greedywall::spatial::grid::{CellType, TileGrid};
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    // Tests palette lookups in both directions
    // Verified by mapping rock to the wall color
    #[test]
    fn test_palette_lookup() {
        assert_eq!(cell_color(CellType::Grass), GRASS_COLOR);
        assert_eq!(cell_color(CellType::Rock), ROCK_COLOR);
        assert_eq!(cell_from_color(WALL_COLOR), Some(CellType::Wall));
        assert_eq!(cell_from_color(BUILDING_COLOR), Some(CellType::Building));
        assert_eq!(cell_from_color([1, 2, 3, 255]), None);
    }

    // Tests that exported maps load back with the same cells
    // Verified by transposing pixels on export
    #[test]
    fn test_export_then_load_preserves_cells() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("nested").join("map.png");
        let grid: TileGrid = "B.R\n.#.\n".parse().expect("valid map");

        export_grid_as_png(&grid, &path).expect("export");
        assert!(path.exists(), "PNG should be written into a created directory");

        let loaded = load_grid_from_png(&path).expect("load");
        assert_eq!(loaded, grid);
    }

    // Tests that colors outside the palette become grass
    // Verified by rejecting unknown colors
    #[test]
    fn test_unknown_colors_load_as_grass() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("painted.png");
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba(BUILDING_COLOR));
        img.put_pixel(0, 1, Rgba([0, 0, 0, 0]));
        img.save(&path).expect("save");

        let grid = load_grid_from_png(&path).expect("load");

        assert_eq!(grid.get(1, 0), Some(CellType::Building));
        assert_eq!(grid.get(0, 0), Some(CellType::Grass));
        assert_eq!(grid.get(0, 1), Some(CellType::Grass));
        assert_eq!(grid.count(CellType::Grass), 3);
    }

    // Tests error for a missing file
    // Verified by returning an empty grid for missing files
    #[test]
    fn test_missing_file_is_image_load_error() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("absent.png");

        match load_grid_from_png(&path) {
            Err(WallError::ImageLoad { path: reported, .. }) => assert_eq!(reported, path),
            other => unreachable!("Expected ImageLoad error, got {other:?}"),
        }
    }
}
