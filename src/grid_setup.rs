//! This module contains code for setting up the sample grid, and the flat 2D output field
//! that quadrature results are written to.

use serde::{Deserialize, Serialize};

use crate::{
    error::{QuadError, Result},
    util,
};

/// Bounds and resolution of the sample grid. The same bounds and resolution apply to
/// x, y, and z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub grid_min: f64,
    pub grid_max: f64,
    /// Number of sample points per axis, including both ends.
    pub n: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            grid_min: -10.,
            grid_max: 10.,
            n: 128,
        }
    }
}

impl GridSpec {
    pub fn new(grid_min: f64, grid_max: f64, n: usize) -> Result<Self> {
        let result = Self {
            grid_min,
            grid_max,
            n,
        };
        result.validate()?;

        Ok(result)
    }

    /// Fail fast on grids where the spacing would be undefined, or non-finite.
    pub fn validate(&self) -> Result<()> {
        if self.n < 2 {
            return Err(QuadError::InvalidConfig(format!(
                "grid resolution must be at least 2; got {}",
                self.n
            )));
        }
        if !self.grid_min.is_finite() || !self.grid_max.is_finite() {
            return Err(QuadError::InvalidConfig(format!(
                "grid bounds must be finite; got ({}, {})",
                self.grid_min, self.grid_max
            )));
        }
        if self.grid_max <= self.grid_min {
            return Err(QuadError::InvalidConfig(format!(
                "grid max ({}) must be greater than grid min ({})",
                self.grid_max, self.grid_min
            )));
        }

        Ok(())
    }

    /// Distance between adjacent samples along an axis.
    pub fn spacing(&self) -> f64 {
        (self.grid_max - self.grid_min) / (self.n - 1) as f64
    }

    pub fn range(&self) -> f64 {
        self.grid_max - self.grid_min
    }

    /// Position along any axis for sample index `k`. Computed from the index, not accumulated,
    /// so the last sample is `grid_max` exactly.
    pub fn coord(&self, k: usize) -> f64 {
        if self.n < 2 {
            return self.grid_min;
        }
        if k == self.n - 1 {
            return self.grid_max;
        }
        self.grid_min + k as f64 * self.spacing()
    }

    /// Flat, row-major index of the (i, j) node in the output field.
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        i * self.n + j
    }

    /// Number of (x, y) nodes, n². Errors if the count doesn't fit in a `usize`, since no buffer
    /// of that size could be allocated.
    pub fn num_nodes(&self) -> Result<usize> {
        self.n.checked_mul(self.n).ok_or(QuadError::Allocation {
            what: "output field",
            len: usize::MAX,
        })
    }
}

/// The integrated density g(x, y), stored as a flat row-major array: `g[i * n + j]` holds the
/// value at x = coord(i), y = coord(j).
#[derive(Clone, Debug)]
pub struct OutputField {
    pub grid: GridSpec,
    pub data: Vec<f64>,
}

impl OutputField {
    /// Make a new zeroed field. Fails with an allocation error rather than aborting if the
    /// buffer can't be reserved.
    pub fn new_zeroed(grid: GridSpec) -> Result<Self> {
        let data = util::try_alloc_zeroed(grid.num_nodes()?, "output field")?;
        Ok(Self { grid, data })
    }

    pub fn n(&self) -> usize {
        self.grid.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.grid.flat_index(i, j)]
    }

    /// One row of the field: fixed x, all y.
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.grid.n;
        &self.data[i * n..(i + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.grid.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_and_endpoints() {
        let grid = GridSpec::default();
        assert!((grid.spacing() - 20. / 127.).abs() < 1e-15);
        assert!((grid.spacing() - 0.15748).abs() < 1e-5);
        assert_eq!(grid.coord(0), -10.);
        assert_eq!(grid.coord(127), 10.);
        assert_eq!(grid.coord(64), -10. + 64. * grid.spacing());
    }

    #[test]
    fn coord_on_unvalidated_grid_does_not_panic() {
        for n in [0, 1] {
            let grid = GridSpec {
                grid_min: -1.,
                grid_max: 1.,
                n,
            };
            assert_eq!(grid.coord(0), -1.);
        }
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert!(matches!(
            GridSpec::new(-1., 1., 1),
            Err(QuadError::InvalidConfig(_))
        ));
        assert!(matches!(
            GridSpec::new(-1., 1., 0),
            Err(QuadError::InvalidConfig(_))
        ));
        assert!(GridSpec::new(1., 1., 4).is_err());
        assert!(GridSpec::new(f64::NAN, 1., 4).is_err());
        assert!(GridSpec::new(-1., 1., 2).is_ok());
    }

    #[test]
    fn flat_index_is_a_bijection() {
        let grid = GridSpec::new(0., 1., 7).unwrap();
        let mut seen = vec![false; grid.num_nodes().unwrap()];

        for (i, j) in crate::iter_arr_2d!(grid.n) {
            let idx = grid.flat_index(i, j);
            assert!(!seen[idx]);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn rows_match_get() {
        let grid = GridSpec::new(0., 1., 3).unwrap();
        let mut field = OutputField::new_zeroed(grid).unwrap();
        for (idx, v) in field.data.iter_mut().enumerate() {
            *v = idx as f64;
        }

        assert_eq!(field.row(1), &[3., 4., 5.]);
        assert_eq!(field.get(2, 1), 7.);
        assert_eq!(field.rows().count(), 3);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_field_is_an_allocation_error() {
        // n² wraps to 0 here.
        let grid = GridSpec::new(-10., 10., 1 << 32).unwrap();
        assert!(matches!(grid.num_nodes(), Err(QuadError::Allocation { .. })));
        assert!(matches!(
            OutputField::new_zeroed(grid),
            Err(QuadError::Allocation { .. })
        ));

        // n² fits, but the buffer can't be reserved.
        let grid = GridSpec::new(-10., 10., 1 << 31).unwrap();
        assert!(matches!(
            OutputField::new_zeroed(grid),
            Err(QuadError::Allocation {
                what: "output field",
                ..
            })
        ));
    }
}
