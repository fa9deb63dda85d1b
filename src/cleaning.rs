use crate::readers::Grid;

/// Replace every cell exactly equal to `sentinel` with NaN; other cells pass through.
///
/// The comparison has no tolerance: sentinels are integers stored as floats.
pub fn clean(grid: &Grid, sentinel: f64) -> Grid {
    grid.mapv(|v| if v == sentinel { f64::NAN } else { v })
}

/// In-place variant of [`clean`], returning the number of replaced cells.
pub fn clean_in_place(grid: &mut Grid, sentinel: f64) -> usize {
    let mut replaced = 0;
    grid.map_inplace(|v| {
        if *v == sentinel {
            *v = f64::NAN;
            replaced += 1;
        }
    });
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::Bbox;
    use crate::readers::{GeoTransform, MemorySource, RasterSource};
    use ndarray::{array, s};

    fn same_cells(a: &Grid, b: &Grid) -> bool {
        a.dim() == b.dim()
            && a.iter()
                .zip(b.iter())
                .all(|(x, y)| x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan()))
    }

    #[test]
    fn test_clean_replaces_sentinel() {
        let grid = array![[-9999.0, 10.0], [20.0, -9999.0]];
        let cleaned = clean(&grid, -9999.0);

        assert!(cleaned[[0, 0]].is_nan());
        assert_eq!(cleaned[[0, 1]], 10.0);
        assert_eq!(cleaned[[1, 0]], 20.0);
        assert!(cleaned[[1, 1]].is_nan());
    }

    #[test]
    fn test_negative_zero_matches_zero_sentinel() {
        let grid = array![[-0.0, 0.0, 1.0]];

        let cleaned = clean(&grid, 0.0);
        assert!(cleaned[[0, 0]].is_nan());
        assert!(cleaned[[0, 1]].is_nan());
        assert_eq!(cleaned[[0, 2]], 1.0);

        let mut in_place = grid.clone();
        assert_eq!(clean_in_place(&mut in_place, 0.0), 2);
        assert!(in_place[[0, 0]].is_nan());
    }

    #[test]
    fn test_only_exact_matches_change() {
        let grid = array![[-9999.0, -9998.999999, -9999.000001], [0.0, 255.0, 254.5]];

        let cleaned = clean(&grid, -9999.0);
        assert_eq!(cleaned.iter().filter(|v| v.is_nan()).count(), 1);
        assert_eq!(cleaned[[0, 1]], -9998.999999);
        assert_eq!(cleaned[[0, 2]], -9999.000001);
        assert_eq!(cleaned[[1, 0]], 0.0);

        // 255 only counts as missing for the percentage product
        let pe = clean(&grid, 255.0);
        assert!(pe[[1, 1]].is_nan());
        assert_eq!(pe[[1, 0]], 0.0);
        assert_eq!(pe[[0, 0]], -9999.0);

        let counts = clean(&grid, 0.0);
        assert!(counts[[1, 0]].is_nan());
        assert_eq!(counts[[1, 1]], 255.0);
    }

    #[test]
    fn test_existing_nan_is_untouched() {
        let grid = array![[f64::NAN, 1.0]];
        let cleaned = clean(&grid, 0.0);

        assert!(cleaned[[0, 0]].is_nan());
        assert_eq!(cleaned[[0, 1]], 1.0);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let grid = array![[0.0, 3.0, 0.0], [7.0, 0.0, 1.0]];
        let once = clean(&grid, 0.0);
        let twice = clean(&once, 0.0);

        assert!(same_cells(&once, &twice));
    }

    #[test]
    fn test_clean_in_place_matches_clean() {
        let grid = array![[-9999.0, 10.0], [20.0, -9999.0]];
        let mut in_place = grid.clone();

        let replaced = clean_in_place(&mut in_place, -9999.0);

        assert_eq!(replaced, 2);
        assert!(same_cells(&in_place, &clean(&grid, -9999.0)));
    }

    #[test]
    fn test_window_and_clean_commute() {
        let grid = Grid::from_shape_fn((12, 8), |(r, c)| {
            if (r + c) % 3 == 0 {
                -9999.0
            } else {
                (r * 8 + c) as f64
            }
        });
        let source = MemorySource::new(grid.clone(), GeoTransform::north_up(-113.0, 37.0, 0.5, 0.5));
        let bbox = Bbox::new(-112.0, -110.0, 33.0, 36.0).unwrap();

        let window_then_clean = clean(&source.read_window(&bbox).unwrap(), -9999.0);
        let clean_then_window = clean(&grid, -9999.0).slice(s![2..8, 2..6]).to_owned();

        assert!(same_cells(&window_then_clean, &clean_then_window));
        assert!(window_then_clean.iter().any(|v| v.is_nan()));
    }
}
