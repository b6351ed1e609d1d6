//! GPU computation of the quadrature grid, via CUDA. One kernel thread per (x, y) node; the
//! per-node algorithm is the same as `integrate::integrate_column`.

use std::sync::Arc;

use cudarc::{
    driver::{CudaDevice, CudaSlice, DriverError, LaunchAsync, LaunchConfig},
    nvrtc::Ptx,
};
use tracing::debug;

use crate::{
    centers::CenterSet,
    error::{QuadError, Result},
    integrate::QuadratureCtx,
    potential::ExpPrecision,
};

const MODULE: &str = "quadrature";
const KERNEL: &str = "quadrature_kernel";

impl From<DriverError> for QuadError {
    fn from(e: DriverError) -> Self {
        Self::Gpu(e.to_string())
    }
}

/// Open a CUDA device, and load our quadrature kernel onto it. The PTX is compiled in `build.rs`.
pub fn init_device(ordinal: usize) -> Result<Arc<CudaDevice>> {
    let dev = CudaDevice::new(ordinal)?;

    dev.load_ptx(
        Ptx::from_src(include_str!(concat!(env!("OUT_DIR"), "/quadrature.ptx"))),
        MODULE,
        &[KERNEL],
    )?;

    Ok(dev)
}

/// Copy center positions to the device, as one array per component.
fn allocate_centers(
    dev: &Arc<CudaDevice>,
    centers: &CenterSet,
) -> Result<(CudaSlice<f64>, CudaSlice<f64>, CudaSlice<f64>)> {
    let (x, y, z) = centers.components();

    Ok((dev.htod_copy(x)?, dev.htod_copy(y)?, dev.htod_copy(z)?))
}

/// Launch size for `n_nodes` kernel threads. CUDA takes it as a `u32`.
fn launch_len(n_nodes: usize) -> Result<u32> {
    u32::try_from(n_nodes).map_err(|_| {
        QuadError::Gpu(format!("{n_nodes} nodes is too many for a single kernel launch"))
    })
}

/// Run the quadrature for every grid node on the GPU, writing into `out`, which must have
/// one value per node.
pub fn integrate_grid(dev: &Arc<CudaDevice>, ctx: &QuadratureCtx, out: &mut [f64]) -> Result<()> {
    let grid = ctx.grid;
    let n_nodes = grid.num_nodes()?;

    if out.len() != n_nodes {
        return Err(QuadError::Gpu(format!(
            "output buffer has {} values; expected {n_nodes}",
            out.len()
        )));
    }

    // An empty device allocation isn't valid; a single dummy center with zero amplitude
    // contributes nothing.
    let (centers, amplitude) = if ctx.centers.is_empty() {
        (
            CenterSet::from_points(vec![lin_alg::f64::Vec3::new_zero()]),
            0.,
        )
    } else {
        (
            ctx.centers.clone(),
            ctx.params.precision.round_param(ctx.params.amplitude),
        )
    };
    let width = ctx.params.precision.round_param(ctx.params.width);

    let (cx, cy, cz) = allocate_centers(dev, &centers)?;
    let mut out_gpu = dev.alloc_zeros::<f64>(n_nodes)?;

    let kernel = dev
        .get_func(MODULE, KERNEL)
        .ok_or_else(|| QuadError::Gpu(format!("kernel `{KERNEL}` not loaded")))?;

    let single_exp: i32 = match ctx.params.precision {
        ExpPrecision::Double => 0,
        ExpPrecision::Single => 1,
    };

    let cfg = LaunchConfig::for_num_elems(launch_len(n_nodes)?);

    unsafe {
        kernel.launch(
            cfg,
            (
                &mut out_gpu,
                &cx,
                &cy,
                &cz,
                centers.len(),
                amplitude,
                width,
                single_exp,
                grid.grid_min,
                grid.grid_max,
                grid.n,
            ),
        )
    }?;

    let result = dev.dtoh_sync_copy(&out_gpu)?;
    out.copy_from_slice(&result);

    debug!("GPU quadrature collected {} nodes", n_nodes);

    Ok(())
}
