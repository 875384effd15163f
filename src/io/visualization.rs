//! Frame capture and GIF generation for wall search visualization

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Delay, Frame, Rgba, RgbaImage};

use crate::io::configuration::{
    CLOSED_TINT, OPEN_TINT, START_TINT, VIEWER_MIN_FRAME_DELAY_MS, VISUALIZATION_CELL_PIXELS,
};
use crate::io::error::{Result, WallError};
use crate::io::image::cell_color;
use crate::spatial::grid::{CellType, Highlight, TileGrid};

/// Display color of a cell, with its highlight tint multiplied in
pub const fn render_cell(cell_type: CellType, highlight: Highlight) -> [u8; 4] {
    let base = cell_color(cell_type);
    let tint = match highlight {
        Highlight::None => return base,
        Highlight::Closed => CLOSED_TINT,
        Highlight::Open => OPEN_TINT,
        Highlight::Start => START_TINT,
    };
    [
        (base[0] as u16 * tint[0] as u16 / 255) as u8,
        (base[1] as u16 * tint[1] as u16 / 255) as u8,
        (base[2] as u16 * tint[2] as u16 / 255) as u8,
        base[3],
    ]
}

/// Captures the grid after every search step
///
/// Each frame stores one pixel per cell; frames are scaled up only when the
/// GIF is encoded.
pub struct VisualizationCapture {
    frames: Vec<RgbaImage>,
    width: usize,
    height: usize,
}

impl VisualizationCapture {
    /// Create an empty capture for a `width × height` grid
    pub fn new(width: usize, height: usize, expected_frames: usize) -> Self {
        Self {
            frames: Vec::with_capacity(expected_frames),
            width,
            height,
        }
    }

    /// Snapshot the cell types and highlight tags of the grid
    ///
    /// # Errors
    ///
    /// Returns an error if the grid size differs from the capture size
    pub fn record_frame(&mut self, grid: &TileGrid) -> Result<()> {
        if grid.cells().dim() != (self.width, self.height) {
            let (width, height) = grid.cells().dim();
            return Err(WallError::InvalidSourceData {
                reason: format!(
                    "Frame is {width}x{height}, capture expects {}x{}",
                    self.width, self.height
                ),
            });
        }

        let mut img = RgbaImage::new(self.width as u32, self.height as u32);
        for ((x, y), &cell_type) in grid.cells().indexed_iter() {
            let highlight = grid.highlight_at(x, y).unwrap_or_default();
            img.put_pixel(x as u32, y as u32, Rgba(render_cell(cell_type, highlight)));
        }
        self.frames.push(img);
        Ok(())
    }

    /// Captured frames, one pixel per cell
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Returns the number of captured frames
    pub const fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Export the captured frames as a GIF with automatic frame skipping
    ///
    /// Delays below what viewers support are raised to the viewer minimum,
    /// and frames are dropped to keep the apparent speed. The last frame is
    /// always kept and shown longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        let frames = self.encode_frames(frame_delay_ms)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WallError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| WallError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| WallError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Scaled frames with delays, as they are written to the GIF
    ///
    /// # Errors
    ///
    /// Returns an error if no frames were captured
    pub fn encode_frames(&self, frame_delay_ms: u32) -> Result<Vec<Frame>> {
        let Some(last) = self.frames.last() else {
            return Err(WallError::InvalidSourceData {
                reason: "No frames captured for visualization".to_string(),
            });
        };

        let frame_delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms).max(1) as usize;

        let mut frames: Vec<Frame> = self
            .frames
            .iter()
            .step_by(skip_factor)
            .map(|img| self.scaled_frame(img, effective_delay_ms))
            .collect();

        if (self.frames.len() - 1) % skip_factor != 0 {
            frames.push(self.scaled_frame(last, effective_delay_ms));
        }

        // Final frame displays longer so the committed wall is visible
        frames.push(self.scaled_frame(last, effective_delay_ms * 25));

        Ok(frames)
    }

    fn scaled_frame(&self, img: &RgbaImage, delay_ms: u32) -> Frame {
        let scaled = imageops::resize(
            img,
            self.width as u32 * VISUALIZATION_CELL_PIXELS,
            self.height as u32 * VISUALIZATION_CELL_PIXELS,
            FilterType::Nearest,
        );
        Frame::from_parts(scaled, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1))
    }
}
