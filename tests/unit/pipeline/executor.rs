//! Tests for stage orchestration, hooks and pipeline outputs

#[cfg(test)]
mod tests {
    use paintnumber::pipeline::context::{CancellationToken, Level, Stage};
    use paintnumber::{Pipeline, PipelineParams, Result, run_pipeline};

    fn uniform_black(width: usize, height: usize) -> Vec<u8> {
        [0, 0, 0, 255].repeat(width * height)
    }

    fn seeded(k_colors: usize) -> PipelineParams {
        PipelineParams {
            k_colors,
            random_seed: "executor".to_string(),
            ..PipelineParams::default()
        }
    }

    // Tests the output keeps the input geometry
    // Verified by exporting the segmented grid as final pixels
    #[test]
    fn test_output_geometry() -> Result<()> {
        let output = run_pipeline(&uniform_black(4, 4), 4, 4, &seeded(1))?;

        assert_eq!((output.width, output.height), (4, 4));
        assert_eq!(output.final_pixels.len(), 64);
        assert_eq!(output.outline.width(), 4);
        assert_eq!(output.segmented.get(2, 2), Some([0, 0, 0, 255]));
        assert_eq!(output.final_pixels.get(0..4), Some(&[0, 0, 0, 255][..]));
        Ok(())
    }

    // Tests markers exist for both renderings
    // Verified by skipping outline markers
    #[test]
    fn test_markers() -> Result<()> {
        let params = PipelineParams {
            label_color: [200, 0, 0],
            ..seeded(1)
        };
        let output = run_pipeline(&uniform_black(4, 4), 4, 4, &params)?;

        assert_eq!(output.markers.len(), 1);
        assert_eq!(output.outline_markers.len(), 1);
        assert!(output.markers.first().is_some_and(|m| m.color == [200, 0, 0, 255]));
        assert!(output.outline_markers.first().is_some_and(|m| m.color == [0, 0, 0, 255]));
        Ok(())
    }

    // Tests the progress hook receives every stage in order
    // Verified by skipping the edge stage messages
    #[test]
    fn test_progress_stages() -> Result<()> {
        let mut stages = Vec::new();
        let output = Pipeline::new(seeded(1))
            .with_progress(|d| {
                if stages.last() != Some(&d.stage) {
                    stages.push(d.stage);
                }
            })
            .run(&uniform_black(3, 3), 3, 3)?;

        assert_eq!(
            stages,
            vec![
                Stage::Validation,
                Stage::Quantize,
                Stage::Denoise,
                Stage::Particles,
                Stage::Regions,
                Stage::Edges,
            ]
        );
        assert_eq!(
            output.diagnostics.first().map(ToString::to_string),
            Some("[0]: Validating parameters".to_string())
        );
        Ok(())
    }

    // Tests a cancelled token stops the run
    // Verified by checking the token only at the end
    #[test]
    fn test_cancelled_run() {
        let token = CancellationToken::new();
        token.cancel();
        let result = Pipeline::new(seeded(1))
            .with_cancellation(token)
            .run(&uniform_black(2, 2), 2, 2);

        assert!(result.is_err_and(|e| e.kind() == "CancellationRequested"));
    }

    // Tests validation errors surface before any stage runs
    // Verified by validating after quantization
    #[test]
    fn test_invalid_inputs() {
        assert!(run_pipeline(&[], 0, 0, &seeded(1)).is_err_and(|e| e.kind() == "EmptyInput"));
        assert!(
            run_pipeline(&uniform_black(2, 2), 3, 2, &seeded(1))
                .is_err_and(|e| e.kind() == "InvalidParameters")
        );
        assert!(
            run_pipeline(&uniform_black(2, 2), 2, 2, &seeded(0))
                .is_err_and(|e| e.kind() == "InvalidParameters")
        );
    }

    // Tests clustering is skipped for tiny images with a warning
    // Verified by clustering fewer points than colors
    #[test]
    fn test_tiny_image_skips_clustering() -> Result<()> {
        let output = run_pipeline(&uniform_black(2, 2), 2, 2, &seeded(16))?;

        assert_eq!(output.iterations, 0);
        assert!(
            output
                .diagnostics
                .iter()
                .any(|d| d.stage == Stage::Quantize && d.level == Level::Warning)
        );
        Ok(())
    }

    // Tests the pipeline reports its parameters
    // Verified by returning defaults
    #[test]
    fn test_params_accessor() {
        let pipeline = Pipeline::new(seeded(3));
        assert_eq!(pipeline.params().k_colors, 3);
    }
}
