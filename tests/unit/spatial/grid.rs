//! Tests for the RGBA pixel grid and buffer conversions

#[cfg(test)]
mod tests {
    use paintnumber::Result;
    use paintnumber::spatial::grid::{
        PixelGrid, color_magnitude, dimensional_to_flatten, flatten_to_dimensional,
    };

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    // Tests flattening restores the exact input buffer
    // Verified by swapping row and column order in the conversion
    #[test]
    fn test_flatten_round_trip() -> Result<()> {
        let buffer: Vec<u8> = (0..2 * 3 * 4).map(|v| v as u8).collect();
        let grid = flatten_to_dimensional(&buffer, 2, 3)?;

        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(1, 0), Some([4, 5, 6, 7]));
        assert_eq!(grid.get(0, 1), Some([8, 9, 10, 11]));
        assert_eq!(dimensional_to_flatten(&grid), buffer);
        Ok(())
    }

    // Tests buffers of the wrong length are rejected
    // Verified by truncating the buffer silently
    #[test]
    fn test_flatten_wrong_length() {
        let result = flatten_to_dimensional(&[0; 15], 2, 2);
        assert!(result.is_err_and(|e| e.kind() == "InvalidParameters"));
    }

    // Tests rows of different lengths are rejected
    // Verified by padding short rows
    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![RED, RED], vec![RED]];
        assert!(PixelGrid::from_rows(&rows).is_err());
    }

    // Tests rows become grid rows in order
    // Verified by transposing the shape
    #[test]
    fn test_from_rows() -> Result<()> {
        let grid = PixelGrid::from_rows(&[vec![RED, BLUE, RED], vec![BLUE, BLUE, BLUE]])?;

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.get(1, 0), Some(BLUE));
        assert_eq!(grid.row(1), vec![BLUE; 3]);
        assert!(grid.row(2).is_empty());
        Ok(())
    }

    // Tests out-of-bounds reads and writes
    // Verified by clamping coordinates into range
    #[test]
    fn test_bounds_handling() {
        let mut grid = PixelGrid::filled(2, 2, RED);
        grid.set(5, 5, BLUE);

        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get_signed(-1, 0), None);
        assert_eq!(grid.get_signed(1, 1), Some(RED));
        assert!(grid.enumerate().all(|(_, _, color)| color == RED));
    }

    // Tests enumeration is row-major with x varying fastest
    // Verified by iterating columns first
    #[test]
    fn test_enumerate_order() {
        let grid = PixelGrid::filled(2, 2, RED);
        let order: Vec<(usize, usize)> = grid.enumerate().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    // Tests zero-area grids report empty
    // Verified by checking width only
    #[test]
    fn test_empty_grid() {
        assert!(PixelGrid::filled(0, 3, RED).is_empty());
        assert!(!PixelGrid::filled(1, 1, RED).is_empty());
    }

    // Tests magnitude ignores alpha
    // Verified by including alpha in the sum
    #[test]
    fn test_color_magnitude() {
        assert_eq!(color_magnitude(&[1, 2, 3, 0]), 14);
        assert_eq!(color_magnitude(&[1, 2, 3, 255]), 14);
        assert_eq!(color_magnitude(&[255, 255, 255, 255]), 195_075);
    }
}
