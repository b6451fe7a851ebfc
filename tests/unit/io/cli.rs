//! Tests for command-line parsing, file selection and batch output

#[cfg(test)]
mod tests {
    use clap::Parser;
    use paintnumber::Result;
    use paintnumber::io::cli::{Cli, FileProcessor, parse_label_color};
    use paintnumber::io::configuration::{
        DEFAULT_K_COLORS, DEFAULT_MAX_ITERATIONS, DEFAULT_SIZE_LIMIT, DEFAULT_SLIDING_SIZE,
    };
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn create_test_cli(target: &Path, extra: &[&str]) -> Cli {
        let mut args = vec!["program".to_string(), target.display().to_string()];
        args.extend(extra.iter().map(ToString::to_string));
        Cli::parse_from(args)
    }

    fn write_checkerboard(path: &Path) -> Result<()> {
        let image = image::RgbaImage::from_fn(12, 12, |x, y| {
            if (x / 6 + y / 6) % 2 == 0 {
                image::Rgba([220, 40, 40, 255])
            } else {
                image::Rgba([40, 40, 220, 255])
            }
        });
        paintnumber::io::image::export_png(&image, path)
    }

    // Tests CLI parsing with only the target argument
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program", "photo.png"]);

        assert_eq!(cli.target, PathBuf::from("photo.png"));
        assert_eq!(cli.colors, DEFAULT_K_COLORS);
        assert_eq!(cli.iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(cli.sliding, DEFAULT_SLIDING_SIZE);
        assert_eq!(cli.size_limit, DEFAULT_SIZE_LIMIT);
        assert!(cli.seed.is_empty());
        assert_eq!(cli.label_color, [0, 0, 0]);
        assert!(!cli.quiet && !cli.isolate && !cli.alternative_label);
    }

    // Tests CLI parsing with every option
    // Verified by removing the label color parser
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "input.jpg",
            "--colors",
            "8",
            "--iterations",
            "20",
            "--seed",
            "sunset",
            "--max-pixels",
            "5000",
            "--sliding",
            "5",
            "--size-limit",
            "9",
            "--isolate",
            "--alternative-label",
            "--label-color",
            "#ff8000",
            "--quiet",
            "--no-skip",
            "-vv",
        ]);

        let params = cli.params();
        assert_eq!(params.k_colors, 8);
        assert_eq!(params.max_iterations, 20);
        assert_eq!(params.random_seed, "sunset");
        assert_eq!(params.max_pixels, 5000);
        assert_eq!(params.sliding_size, 5);
        assert_eq!(params.size_limit, 9);
        assert!(params.isolate_regions_on && params.alternative_label_on);
        assert_eq!(params.label_color, [255, 128, 0]);
        assert!(!cli.skip_existing());
        assert!(!cli.should_show_progress());
        assert_eq!(cli.log_level(), "debug");
    }

    // Tests short flags map to the same fields
    // Verified by changing short flag definitions
    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["program", "a.png", "-k", "4", "-s", "x", "-w", "1", "-l", "3", "-v"]);

        assert_eq!(cli.colors, 4);
        assert_eq!(cli.seed, "x");
        assert_eq!(cli.sliding, 1);
        assert_eq!(cli.size_limit, 3);
        assert_eq!(cli.log_level(), "info");
    }

    // Tests both label color notations and rejections
    // Verified by accepting short hex strings
    #[test]
    fn test_parse_label_color() {
        assert_eq!(parse_label_color("10, 20,30"), Ok([10, 20, 30]));
        assert_eq!(parse_label_color("#0a141e"), Ok([10, 20, 30]));
        assert!(parse_label_color("#fff").is_err());
        assert!(parse_label_color("1,2").is_err());
        assert!(parse_label_color("1,2,300").is_err());
        assert!(parse_label_color("#gg0000").is_err());
    }

    // Tests output names sit next to the input
    // Verified by dropping the stem
    #[test]
    fn test_output_path() {
        let path = FileProcessor::get_output_path(Path::new("dir/cat.jpg"), "_pbn", "png");
        assert_eq!(path, PathBuf::from("dir/cat_pbn.png"));
    }

    // Tests accepted input extensions
    // Verified by matching extensions case-sensitively
    #[test]
    fn test_is_supported_image() {
        assert!(FileProcessor::is_supported_image(Path::new("a.PNG")));
        assert!(FileProcessor::is_supported_image(Path::new("a.jpeg")));
        assert!(!FileProcessor::is_supported_image(Path::new("a.gif")));
        assert!(!FileProcessor::is_supported_image(Path::new("noext")));
    }

    // Tests directory scans skip outputs and unsupported files
    // Verified by collecting generated outputs as inputs
    #[test]
    fn test_collect_files_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        for name in ["b.png", "a.jpg", "a_pbn.png", "b_colors.png", "c_layer_0.png", "notes.txt"] {
            fs::write(temp_dir.path().join(name), "fake")?;
        }

        let processor = FileProcessor::new(create_test_cli(temp_dir.path(), &["--quiet", "--no-skip"]));
        let files = processor.collect_files()?;

        assert_eq!(
            files,
            vec![temp_dir.path().join("a.jpg"), temp_dir.path().join("b.png")]
        );
        Ok(())
    }

    // Tests inputs with an existing outline are skipped
    // Verified by removing skip check
    #[test]
    fn test_collect_files_skips_existing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("a.png"), "fake")?;
        fs::write(temp_dir.path().join("a_pbn.png"), "fake")?;
        fs::write(temp_dir.path().join("b.png"), "fake")?;

        let processor = FileProcessor::new(create_test_cli(temp_dir.path(), &["--quiet"]));
        assert_eq!(processor.collect_files()?, vec![temp_dir.path().join("b.png")]);
        Ok(())
    }

    // Tests error handling for missing and unsupported targets
    // Verified by removing file type validation
    #[test]
    fn test_invalid_targets() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let txt_file = temp_dir.path().join("test.txt");
        fs::write(&txt_file, "not an image")?;

        let mut missing = FileProcessor::new(create_test_cli(&temp_dir.path().join("none.png"), &["-q"]));
        assert!(missing.process().is_err());

        let mut unsupported = FileProcessor::new(create_test_cli(&txt_file, &["-q"]));
        assert!(unsupported.process().is_err());
        Ok(())
    }

    // Tests invalid parameters stop processing before any file is read
    // Verified by validating per file after decoding
    #[test]
    fn test_invalid_parameters_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut processor = FileProcessor::new(create_test_cli(temp_dir.path(), &["-q", "-w", "2"]));

        let result = processor.process();
        assert!(result.is_err_and(|e| e.kind() == "InvalidParameters"));
        Ok(())
    }

    // Tests processing empty directories
    // Verified by adding error for empty directories
    #[test]
    fn test_process_empty_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut processor = FileProcessor::new(create_test_cli(temp_dir.path(), &["-q"]));
        processor.process()
    }

    // Tests a full run writes every output next to the input
    // Verified by skipping the legend export
    #[test]
    fn test_process_writes_outputs() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("board.png");
        write_checkerboard(&input)?;

        let mut processor = FileProcessor::new(create_test_cli(
            &input,
            &["-q", "-k", "2", "-s", "board", "-l", "4", "--isolate"],
        ));
        processor.process()?;

        for suffix in ["_pbn", "_colors", "_layer_0"] {
            let path = FileProcessor::get_output_path(&input, suffix, "png");
            assert!(path.exists(), "missing {}", path.display());
        }
        let legend = fs::read_to_string(FileProcessor::get_output_path(&input, "_legend", "txt"))?;
        assert!(legend.contains("size: 12x12"));
        assert!(legend.contains("k-means iterations:"));
        Ok(())
    }
}
