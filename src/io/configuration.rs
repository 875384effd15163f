//! Algorithm defaults, palette and output settings

// Default values for configurable parameters
/// Minimum Manhattan distance between the start node and any wall segment
pub const DEFAULT_MIN_WALL_DISTANCE: i32 = 1;
/// Maximum number of wall segments before a run is aborted
pub const DEFAULT_MAX_WALL_TILES: usize = 100;
/// Weight applied to distance and exposure when ranking frontier nodes
pub const DEFAULT_STRUCTURAL_CONSTANT: i32 = 2;
/// Extra valid steps searched after the first wall is found
pub const DEFAULT_FUTURE_STEPS: usize = 100;

/// Neighbor counter assigned to the start node so it can be expanded at once
pub const START_NEIGHBOR_SEED: u32 = 4;

/// Most edge-adjacent wall segments a segment may touch
pub const MAX_SEGMENT_DEGREE: usize = 2;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

// Map palette (RGBA) shared by PNG import, export and visualization
/// Grass cells
pub const GRASS_COLOR: [u8; 4] = [124, 179, 66, 255];
/// Building cells
pub const BUILDING_COLOR: [u8; 4] = [121, 85, 72, 255];
/// Wall cells
pub const WALL_COLOR: [u8; 4] = [158, 158, 158, 255];
/// Rock cells
pub const ROCK_COLOR: [u8; 4] = [55, 55, 55, 255];

// Highlight tints used while the search is in progress
/// Expanded interior cells
pub const CLOSED_TINT: [u8; 4] = [255, 204, 204, 255];
/// Frontier cells
pub const OPEN_TINT: [u8; 4] = [204, 204, 255, 255];
/// The start cell
pub const START_TINT: [u8; 4] = [204, 255, 204, 255];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 50;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_walled";
/// Suffix added to search animation filenames
pub const VISUALIZATION_SUFFIX: &str = "_search";
/// Side length in pixels of one cell in the search animation
pub const VISUALIZATION_CELL_PIXELS: u32 = 8;
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 20;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
