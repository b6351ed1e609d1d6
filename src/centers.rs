//! Random placement of Gaussian centers within the grid's cube.

use lin_alg::f64::Vec3;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::{
    error::{QuadError, Result},
    grid_setup::GridSpec,
};

/// The points the Gaussians are centered on. Immutable once built; evaluation only reads it.
#[derive(Clone, Debug, Default)]
pub struct CenterSet {
    points: Vec<Vec3>,
}

impl CenterSet {
    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Place `n_centers` points, each coordinate drawn independently and uniformly from
    /// `[grid_min, grid_max)`.
    pub fn generate<R: Rng + ?Sized>(n_centers: usize, grid: &GridSpec, rng: &mut R) -> Result<Self> {
        let mut points = Vec::new();
        points
            .try_reserve_exact(n_centers)
            .map_err(|_| QuadError::Allocation {
                what: "center set",
                len: n_centers.saturating_mul(3),
            })?;

        let range = grid.range();
        let mut sample = || grid.grid_min + range * rng.gen::<f64>();

        for _ in 0..n_centers {
            let x = sample();
            let y = sample();
            let z = sample();
            points.push(Vec3::new(x, y, z));
        }

        debug!("Placed {} Gaussian centers", points.len());

        Ok(Self { points })
    }

    /// Generate from a seed. The same seed always gives the same centers.
    pub fn generate_seeded(n_centers: usize, grid: &GridSpec, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::generate(n_centers, grid, &mut rng)
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flatten to (x, y, z) component arrays, eg for uploading to a GPU.
    pub fn components(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut x = Vec::with_capacity(self.len());
        let mut y = Vec::with_capacity(self.len());
        let mut z = Vec::with_capacity(self.len());

        for p in &self.points {
            x.push(p.x);
            y.push(p.y);
            z.push(p.z);
        }

        (x, y, z)
    }
}

/// Pick a seed from OS entropy, for runs that didn't specify one. We log it so the run can be
/// reproduced.
pub fn random_seed() -> u64 {
    rand::thread_rng().next_u64()
}
