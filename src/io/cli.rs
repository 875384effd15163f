//! Command-line interface for batch wall synthesis over map files

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use crate::algorithm::synthesizer::{RunStatus, WallConfig, WallSynthesizer};
use crate::io::configuration::{
    DEFAULT_FUTURE_STEPS, DEFAULT_MAX_WALL_TILES, DEFAULT_MIN_WALL_DISTANCE,
    DEFAULT_STRUCTURAL_CONSTANT, GIF_FRAME_DELAY_MS, OUTPUT_SUFFIX, VISUALIZATION_SUFFIX,
};
use crate::io::error::{Result, WallError, io_error};
use crate::io::image::{export_grid_as_png, load_grid_from_png};
use crate::io::progress::ProgressManager;
use crate::io::visualization::VisualizationCapture;
use crate::spatial::grid::TileGrid;

#[derive(Parser)]
#[command(name = "greedywall")]
#[command(
    author,
    version,
    about = "Synthesize walls around building clusters on tile maps"
)]
/// Command-line arguments for the wall synthesis tool
pub struct Cli {
    /// Input map (PNG or TXT) or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Minimum Manhattan distance between the start node and the wall
    #[arg(short = 'd', long, default_value_t = DEFAULT_MIN_WALL_DISTANCE, allow_negative_numbers = true)]
    pub min_distance: i32,

    /// Abort once the frontier holds this many segments
    #[arg(short, long, default_value_t = DEFAULT_MAX_WALL_TILES)]
    pub max_wall_tiles: usize,

    /// Weight of distance and exposure when ranking frontier cells
    #[arg(short, long, default_value_t = DEFAULT_STRUCTURAL_CONSTANT, allow_negative_numbers = true)]
    pub constant: i32,

    /// Valid steps to keep searching for a shorter wall
    #[arg(short, long, default_value_t = DEFAULT_FUTURE_STEPS)]
    pub future_steps: usize,

    /// Write the search as an animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Synthesizer parameters taken from the arguments
    pub const fn wall_config(&self) -> WallConfig {
        WallConfig {
            min_wall_distance: self.min_distance,
            max_wall_tiles: self.max_wall_tiles,
            structural_constant: self.constant,
            future_steps: self.future_steps,
        }
    }
}

/// Supported map file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    /// One pixel per cell, palette colors
    Png,
    /// One character per cell, one line per row
    Text,
}

impl MapFormat {
    /// Format implied by the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("png") => Some(Self::Png),
            Some("txt") => Some(Self::Text),
            _ => None,
        }
    }

    /// Read a map in this format
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(self, path: &Path) -> Result<TileGrid> {
        match self {
            Self::Png => load_grid_from_png(path),
            Self::Text => {
                let source =
                    std::fs::read_to_string(path).map_err(|e| WallError::FileSystem {
                        path: path.to_path_buf(),
                        operation: "read map",
                        source: e,
                    })?;
                source.parse()
            }
        }
    }

    /// Write a map in this format
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save(self, grid: &TileGrid, path: &Path) -> Result<()> {
        match self {
            Self::Png => export_grid_as_png(grid, path),
            Self::Text => std::fs::write(path, grid.to_string()).map_err(|e| {
                WallError::FileSystem {
                    path: path.to_path_buf(),
                    operation: "write map",
                    source: e,
                }
            }),
        }
    }
}

/// Orchestrates batch processing of map files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// A map without a wall is reported and skipped; the batch continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, target validation
    /// fails or a map cannot be read or written
    pub fn process(&mut self) -> Result<()> {
        self.cli.wall_config().validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Map files selected by the target, sorted by path
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a map file nor a directory,
    /// or the directory cannot be read
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if MapFormat::from_path(&self.cli.target).is_some() {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(io_error("Target file must be a PNG or TXT map"))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if MapFormat::from_path(&path).is_some()
                    && !Self::is_generated(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(io_error("Target must be a map file or directory"))
        }
    }

    fn is_generated(path: &Path) -> bool {
        path.file_stem()
            .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::output_path(input_path);
        if output_path.exists() {
            warn!(input = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    /// Run the synthesizer on one map and write its outputs
    ///
    /// The walled map is only written when a wall was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be read, synthesized or written
    pub fn process_file(&mut self, input_path: &Path, index: usize) -> Result<RunStatus> {
        let format = MapFormat::from_path(input_path)
            .ok_or_else(|| io_error("Unsupported map file extension"))?;
        let mut grid = format.load(input_path)?;
        let (width, height) = grid.cells().dim();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, width * height);
        }

        let mut capture = self
            .cli
            .visualize
            .then(|| VisualizationCapture::new(width, height, width * height));
        if let Some(ref mut capture) = capture {
            capture.record_frame(&grid)?;
        }

        let mut synthesizer = WallSynthesizer::new(self.cli.wall_config())?;
        let mut status = synthesizer.initialize(&mut grid)?;
        loop {
            if let Some(ref mut capture) = capture {
                capture.record_frame(&grid)?;
            }
            if let Some(ref mut pm) = self.progress_manager {
                pm.update_step(index, synthesizer.steps());
            }
            if status.is_terminal() {
                break;
            }
            status = synthesizer.step(&mut grid)?;
        }

        let outcome = match status {
            RunStatus::Finished(segments) => {
                let output_path = Self::output_path(input_path);
                format.save(&grid, &output_path)?;
                info!(
                    input = %input_path.display(),
                    output = %output_path.display(),
                    segments,
                    steps = synthesizer.steps(),
                    "wall written"
                );
                format!("{segments} segments")
            }
            RunStatus::Failed(reason) => {
                warn!(input = %input_path.display(), %reason, "no wall written");
                reason.to_string()
            }
            RunStatus::Continue => String::new(),
        };

        if let Some(capture) = capture {
            capture.export_gif(&Self::visualization_path(input_path), GIF_FRAME_DELAY_MS)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, &outcome);
        }

        Ok(status)
    }

    /// Path of the walled map written next to the input
    pub fn output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let extension = input_path.extension().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            extension.to_string_lossy()
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }

    /// Path of the search animation written next to the input
    pub fn visualization_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let viz_name = format!("{}{}.gif", stem.to_string_lossy(), VISUALIZATION_SUFFIX);

        if let Some(parent) = input_path.parent() {
            parent.join(viz_name)
        } else {
            PathBuf::from(viz_name)
        }
    }
}
