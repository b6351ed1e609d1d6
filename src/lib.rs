//! Computes g(x, y) = ∫ exp(f(x, y, z)) dz over a 2D grid, where f is a sum of isotropic
//! Gaussians centered on randomly-placed points in a cube. Integration along z uses the
//! composite trapezoidal rule, on the same samples as the x and y axes.
//!
//! Numeric note: exp(f) is not guarded against overflow. Large amplitudes combined with many
//! overlapping centers can push it to infinity.

pub mod centers;
pub mod config;
pub mod error;
#[cfg(feature = "cuda")]
pub mod gpu;
pub mod grid_setup;
pub mod integrate;
pub mod potential;
pub mod report;
pub mod types;
pub mod util;

use std::time::{Duration, Instant};

use tracing::info;

pub use centers::CenterSet;
pub use config::{DeviceKind, QuadratureConfig};
pub use error::{QuadError, Result};
pub use grid_setup::{GridSpec, OutputField};
pub use integrate::{integrate_column, integrate_grid, QuadratureCtx};
pub use potential::{potential_gauss, ExpPrecision, PotentialParams};
pub use types::ComputationDevice;

/// The result of a full pipeline run.
#[derive(Debug)]
pub struct RunOutput {
    pub field: OutputField,
    pub centers: CenterSet,
    /// The seed the centers were placed from.
    pub seed: u64,
    /// Wall time of the integration phase only; excludes center placement.
    pub elapsed: Duration,
    pub device_name: String,
}

/// Build the device the config asks for.
pub fn make_device(config: &QuadratureConfig) -> Result<ComputationDevice> {
    match config.device {
        #[cfg(feature = "cuda")]
        DeviceKind::Cuda => Ok(ComputationDevice::Gpu(gpu::init_device(0)?)),
        #[cfg(not(feature = "cuda"))]
        DeviceKind::Cuda => Err(QuadError::InvalidConfig(
            "the CUDA device needs this crate built with `--features cuda`".to_owned(),
        )),
        _ => config.cpu_device(),
    }
}

/// Integrate over the grid for an existing center set, timing the integration.
pub fn run_with_centers(
    config: &QuadratureConfig,
    centers: &CenterSet,
    device: &ComputationDevice,
) -> Result<(OutputField, Duration)> {
    config.validate()?;

    let ctx = QuadratureCtx::new(centers, config.potential_params(), config.grid());

    let start = Instant::now();
    let field = integrate_grid(&ctx, device)?;
    let elapsed = start.elapsed();

    Ok((field, elapsed))
}

/// Run the whole pipeline: validate, place centers, then integrate every grid node.
pub fn run(config: &QuadratureConfig, device: &ComputationDevice) -> Result<RunOutput> {
    config.validate()?;

    let grid = config.grid();
    let seed = config.seed.unwrap_or_else(centers::random_seed);

    info!(
        "Placing {} centers in [{}, {}]^3 (seed {seed})",
        config.n_centers, grid.grid_min, grid.grid_max
    );
    let centers = CenterSet::generate_seeded(config.n_centers, &grid, seed)?;

    info!(
        "Grid: {} samples per axis, spacing {:.6}. A = {}, w = {}",
        grid.n,
        grid.spacing(),
        config.amplitude,
        config.width
    );

    let (field, elapsed) = run_with_centers(config, &centers, device)?;

    Ok(RunOutput {
        field,
        centers,
        seed,
        elapsed,
        device_name: device.name(),
    })
}
