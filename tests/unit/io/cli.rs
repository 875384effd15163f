//! Tests for command-line interface parsing and map file processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use greedywall::algorithm::synthesizer::{FailureReason, RunStatus, WallConfig};
    use greedywall::io::cli::{Cli, FileProcessor, MapFormat};
    use greedywall::io::configuration::{
        DEFAULT_FUTURE_STEPS, DEFAULT_MAX_WALL_TILES, DEFAULT_MIN_WALL_DISTANCE,
        DEFAULT_STRUCTURAL_CONSTANT,
    };
    use greedywall::spatial::grid::{CellType, TileGrid};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const BLOCK: &str = "........\n........\n...BB...\n...BB...\n........\n........\n";

    fn create_test_cli(target: &Path) -> Cli {
        Cli {
            target: target.to_path_buf(),
            min_distance: 1,
            max_wall_tiles: 100,
            constant: 2,
            future_steps: 0,
            visualize: false,
            quiet: true,
            no_skip: false,
        }
    }

    // Tests CLI parsing with only required target file argument
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program", "map.png"]);

        assert_eq!(cli.target, PathBuf::from("map.png"));
        assert_eq!(cli.min_distance, DEFAULT_MIN_WALL_DISTANCE);
        assert_eq!(cli.max_wall_tiles, DEFAULT_MAX_WALL_TILES);
        assert_eq!(cli.constant, DEFAULT_STRUCTURAL_CONSTANT);
        assert_eq!(cli.future_steps, DEFAULT_FUTURE_STEPS);
        assert!(!cli.quiet && !cli.visualize);
        assert!(cli.skip_existing());
        assert!(cli.should_show_progress());
        assert_eq!(cli.wall_config(), WallConfig::default());
    }

    // Tests CLI parsing with every flag in short and long form
    // Verified by changing short flag definitions
    #[test]
    fn test_cli_parse_all_args() {
        let long = Cli::parse_from([
            "program",
            "maps",
            "--min-distance",
            "3",
            "--max-wall-tiles",
            "40",
            "--constant",
            "5",
            "--future-steps",
            "7",
            "--visualize",
            "--quiet",
            "--no-skip",
        ]);
        let short = Cli::parse_from([
            "program", "maps", "-d", "3", "-m", "40", "-c", "5", "-f", "7", "-v", "-q", "-n",
        ]);

        for cli in [long, short] {
            assert_eq!(
                cli.wall_config(),
                WallConfig {
                    min_wall_distance: 3,
                    max_wall_tiles: 40,
                    structural_constant: 5,
                    future_steps: 7,
                }
            );
            assert!(cli.visualize);
            assert!(!cli.should_show_progress());
            assert!(!cli.skip_existing());
        }
    }

    // Tests format detection and derived output paths
    // Verified by dropping the extension from the output name
    #[test]
    fn test_paths_and_formats() {
        assert_eq!(MapFormat::from_path(Path::new("a/b.png")), Some(MapFormat::Png));
        assert_eq!(MapFormat::from_path(Path::new("b.txt")), Some(MapFormat::Text));
        assert_eq!(MapFormat::from_path(Path::new("b.jpg")), None);

        assert_eq!(
            FileProcessor::output_path(Path::new("maps/town.txt")),
            PathBuf::from("maps/town_walled.txt")
        );
        assert_eq!(
            FileProcessor::visualization_path(Path::new("maps/town.png")),
            PathBuf::from("maps/town_search.gif")
        );
    }

    // Tests a text map is walled and written next to the input
    // Verified by writing the input grid instead of the walled one
    #[test]
    fn test_process_text_map() {
        let temp_dir = TempDir::new().expect("temp dir");
        let input = temp_dir.path().join("block.txt");
        fs::write(&input, BLOCK).expect("write map");

        let mut processor = FileProcessor::new(create_test_cli(&input));
        processor.process().expect("process");

        let output = fs::read_to_string(temp_dir.path().join("block_walled.txt")).expect("output");
        let walled: TileGrid = output.parse().expect("valid output");
        assert_eq!(walled.count(CellType::Wall), 12);
        assert_eq!(walled.count(CellType::Building), 4);
        assert!(walled.buildings_enclosed());
    }

    // Tests a PNG map with visualization enabled
    // Verified by skipping the GIF export
    #[test]
    fn test_process_png_map_with_visualization() {
        let temp_dir = TempDir::new().expect("temp dir");
        let input = temp_dir.path().join("block.png");
        let grid: TileGrid = BLOCK.parse().expect("valid map");
        MapFormat::Png.save(&grid, &input).expect("save input");

        let mut cli = create_test_cli(&input);
        cli.visualize = true;
        let mut processor = FileProcessor::new(cli);
        let status = processor.process_file(&input, 0).expect("process");

        assert_eq!(status, RunStatus::Finished(12));
        assert!(temp_dir.path().join("block_search.gif").exists());
        let walled = MapFormat::Png
            .load(&temp_dir.path().join("block_walled.png"))
            .expect("load output");
        assert_eq!(walled.count(CellType::Wall), 12);
    }

    // Tests that a map without a wall produces no output
    // Verified by writing the output on failure
    #[test]
    fn test_failed_map_writes_nothing() {
        let temp_dir = TempDir::new().expect("temp dir");
        let input = temp_dir.path().join("empty.txt");
        fs::write(&input, "....\n....\n").expect("write map");

        let mut processor = FileProcessor::new(create_test_cli(&input));
        let status = processor.process_file(&input, 0).expect("process");

        assert_eq!(status, RunStatus::Failed(FailureReason::NoBuildings));
        assert!(!temp_dir.path().join("empty_walled.txt").exists());
    }

    // Tests directory scanning, skipping and output filtering
    // Verified by collecting generated outputs as inputs
    #[test]
    fn test_collect_files_in_directory() {
        let temp_dir = TempDir::new().expect("temp dir");
        for name in ["b.txt", "a.txt", "notes.md", "c_walled.txt", "d.txt", "d_walled.txt"] {
            fs::write(temp_dir.path().join(name), BLOCK).expect("write");
        }

        let processor = FileProcessor::new(create_test_cli(temp_dir.path()));
        let files = processor.collect_files().expect("collect");
        assert_eq!(
            files,
            vec![temp_dir.path().join("a.txt"), temp_dir.path().join("b.txt")]
        );

        let mut cli = create_test_cli(temp_dir.path());
        cli.no_skip = true;
        let files = FileProcessor::new(cli).collect_files().expect("collect");
        assert_eq!(files.len(), 3);
    }

    // Tests error handling for missing and unsupported targets
    // Verified by removing file type validation
    #[test]
    fn test_invalid_targets() {
        let temp_dir = TempDir::new().expect("temp dir");
        let notes = temp_dir.path().join("notes.md");
        fs::write(&notes, "not a map").expect("write");

        assert!(FileProcessor::new(create_test_cli(&notes)).process().is_err());
        assert!(
            FileProcessor::new(create_test_cli(&temp_dir.path().join("missing.png")))
                .process()
                .is_err()
        );

        let bad_map = temp_dir.path().join("bad.txt");
        fs::write(&bad_map, "..Z\n").expect("write");
        assert!(FileProcessor::new(create_test_cli(&bad_map)).process().is_err());
    }

    // Tests invalid parameters are rejected before any file is read
    // Verified by validating only after loading maps
    #[test]
    fn test_invalid_parameters_rejected() {
        let temp_dir = TempDir::new().expect("temp dir");
        let input = temp_dir.path().join("block.txt");
        fs::write(&input, BLOCK).expect("write map");

        let mut cli = create_test_cli(&input);
        cli.constant = 0;
        assert!(FileProcessor::new(cli).process().is_err());
        assert!(!temp_dir.path().join("block_walled.txt").exists());
    }
}
