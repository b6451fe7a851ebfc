//! Tests for Moore-neighbour tracing, hole detection and hole validation

#[cfg(test)]
mod tests {
    use paintnumber::regions::boundary::{
        MOORE_DIRECTIONS, hole_boundaries, outer_boundary, touches_color, trace_boundary,
        valid_holes,
    };
    use paintnumber::regions::components::BinaryMask;
    use paintnumber::spatial::coords::{Bounds, Coord};

    fn rectangle(x0: usize, y0: usize, width: usize, height: usize) -> Vec<Coord> {
        (y0..y0 + height)
            .flat_map(|y| (x0..x0 + width).map(move |x| Coord::new(x, y)))
            .collect()
    }

    fn frame(size: usize) -> Vec<Coord> {
        rectangle(0, 0, size, size)
            .into_iter()
            .filter(|c| c.x == 0 || c.y == 0 || c.x + 1 == size || c.y + 1 == size)
            .collect()
    }

    // Tests a rectangle's boundary is its perimeter pixels
    // Verified by stopping the walk after the first turn
    #[test]
    fn test_rectangle_boundary() {
        let boundary = outer_boundary(&rectangle(2, 1, 4, 3));

        assert_eq!(boundary.len(), 10);
        assert_eq!(boundary.first(), Some(&Coord::new(2, 1)));
        assert_eq!(boundary.get(1), Some(&Coord::new(3, 1)));
        assert!(!boundary.contains(&Coord::new(3, 2)));
    }

    // Tests the walk is clockwise on screen
    // Verified by reversing the direction table
    #[test]
    fn test_boundary_clockwise() {
        let boundary = outer_boundary(&rectangle(0, 0, 2, 2));
        assert_eq!(
            boundary,
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(1, 1),
                Coord::new(0, 1),
            ]
        );
    }

    // Tests isolated pixels and empty masks
    // Verified by looping without a neighbour
    #[test]
    fn test_single_pixel_boundary() {
        assert_eq!(outer_boundary(&[Coord::new(4, 4)]), vec![Coord::new(4, 4)]);
        assert!(outer_boundary(&[]).is_empty());

        let empty = BinaryMask::new(Bounds {
            min_x: 0,
            max_x: 2,
            min_y: 0,
            max_y: 2,
        });
        assert!(trace_boundary(&empty).is_empty());
    }

    // Tests the direction table covers the neighbourhood once
    // Verified by duplicating a direction
    #[test]
    fn test_moore_directions() {
        let mut sorted = MOORE_DIRECTIONS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 8);
        assert!(!MOORE_DIRECTIONS.contains(&(0, 0)));
    }

    // Tests a frame has one hole traced around its inside
    // Verified by returning hole candidates untraced
    #[test]
    fn test_frame_hole() {
        let holes = hole_boundaries(&frame(5));

        assert_eq!(holes.len(), 1);
        assert_eq!(holes.first().map(Vec::len), Some(8));
        assert!(hole_boundaries(&rectangle(0, 0, 3, 3)).is_empty());
    }

    // Tests holes bordered by the component color are kept
    // Verified by inverting the touch check
    #[test]
    fn test_valid_holes() {
        let component = frame(5);
        let bounds = Bounds {
            min_x: 0,
            max_x: 9,
            min_y: 0,
            max_y: 9,
        };
        let color_mask = BinaryMask::covering(&component, bounds);

        let kept = valid_holes(hole_boundaries(&component), &color_mask);
        assert_eq!(kept.len(), 1);

        let far_ring = vec![Coord::new(8, 8)];
        assert!(!touches_color(&far_ring, &color_mask));
        assert!(valid_holes(vec![far_ring], &color_mask).is_empty());
    }
}
