//! Trapezoidal quadrature of exp(f) along z, for every (x, y) node of the grid.
//!
//! Each node is independent: it reads only the (shared, read-only) centers and parameters, and
//! writes only its own cell of the output. This lets us hand disjoint rows to separate threads
//! without any synchronization.

use lin_alg::f64::Vec3;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    centers::CenterSet,
    error::Result,
    grid_setup::{GridSpec, OutputField},
    iter_arr_2d,
    potential::{potential_gauss, PotentialParams},
    types::ComputationDevice,
};

/// Everything a node integration reads. Borrowed, so the center set can't change while a grid
/// is being computed.
#[derive(Clone, Copy, Debug)]
pub struct QuadratureCtx<'a> {
    pub centers: &'a CenterSet,
    pub params: PotentialParams,
    pub grid: GridSpec,
}

impl<'a> QuadratureCtx<'a> {
    pub fn new(centers: &'a CenterSet, params: PotentialParams, grid: GridSpec) -> Self {
        Self {
            centers,
            params,
            grid,
        }
    }

    /// h(z) = exp(f(x, y, z)); the integrand.
    pub fn integrand(&self, x: f64, y: f64, z: f64) -> f64 {
        let f = potential_gauss(Vec3::new(x, y, z), self.centers, &self.params);
        self.params.precision.exp(f)
    }
}

/// Composite trapezoidal rule of `f` over the grid's axis. `f` is called exactly once per
/// sample; each value is carried over to the next trapezoid. A grid with fewer than two
/// samples spans no interval, and integrates to 0.
pub fn trapezoid_fn<F: FnMut(f64) -> f64>(mut f: F, grid: &GridSpec) -> f64 {
    if grid.n < 2 {
        return 0.;
    }

    let dx = grid.spacing();

    let mut result = 0.;
    let mut val_prev = f(grid.coord(0));

    for k in 1..grid.n {
        let val_next = f(grid.coord(k));
        result += dx * 0.5 * (val_prev + val_next);
        val_prev = val_next;
    }

    result
}

/// Integrate exp(f(x, y, z)) over z at grid node (i, j).
pub fn integrate_column(i: usize, j: usize, ctx: &QuadratureCtx) -> f64 {
    let x = ctx.grid.coord(i);
    let y = ctx.grid.coord(j);

    trapezoid_fn(|z| ctx.integrand(x, y, z), &ctx.grid)
}

/// Write `cell(i, j)` into every cell of the field, once per cell, using the CPU strategy
/// the device asks for.
pub(crate) fn fill_cells<F>(field: &mut OutputField, device: &ComputationDevice, cell: F) -> Result<()>
where
    F: Fn(usize, usize) -> f64 + Sync,
{
    let grid = field.grid;
    let n = grid.n;

    match device {
        ComputationDevice::Cpu => {
            for (i, j) in iter_arr_2d!(n) {
                field.data[grid.flat_index(i, j)] = cell(i, j);
            }
        }
        ComputationDevice::CpuParallel { threads } => {
            let fill = |data: &mut [f64]| {
                data.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
                    for (j, val) in row.iter_mut().enumerate() {
                        *val = cell(i, j);
                    }
                });
            };

            match threads {
                Some(t) => {
                    let pool = rayon::ThreadPoolBuilder::new().num_threads(*t).build()?;
                    pool.install(|| fill(&mut field.data));
                }
                None => fill(&mut field.data),
            }
        }
        #[cfg(feature = "cuda")]
        ComputationDevice::Gpu(_) => {
            return Err(crate::error::QuadError::Gpu(
                "per-cell closures can't run on the GPU; use `integrate_grid`".to_owned(),
            ));
        }
    }

    Ok(())
}

/// Compute g(x, y) over the whole grid. The field is only returned once every cell has been
/// written.
pub fn integrate_grid(ctx: &QuadratureCtx, device: &ComputationDevice) -> Result<OutputField> {
    ctx.grid.validate()?;

    let mut field = OutputField::new_zeroed(ctx.grid)?;

    debug!(
        "Integrating {}x{} nodes, {} z samples each, on {}",
        ctx.grid.n,
        ctx.grid.n,
        ctx.grid.n,
        device.name()
    );

    match device {
        #[cfg(feature = "cuda")]
        ComputationDevice::Gpu(dev) => crate::gpu::integrate_grid(dev, ctx, &mut field.data)?,
        _ => fill_cells(&mut field, device, |i, j| integrate_column(i, j, ctx))?,
    }

    Ok(field)
}
