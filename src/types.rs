#[cfg(feature = "cuda")]
use std::sync::Arc;

#[cfg(feature = "cuda")]
use cudarc::driver::CudaDevice;

/// Where the grid quadrature runs.
#[derive(Clone, Debug)]
pub enum ComputationDevice {
    /// Single-threaded, row-major. The reference path.
    Cpu,
    /// Rows are fanned out over a rayon thread pool. `None` uses rayon's global pool.
    CpuParallel { threads: Option<usize> },
    #[cfg(feature = "cuda")]
    Gpu(Arc<CudaDevice>),
}

impl ComputationDevice {
    pub fn name(&self) -> String {
        match self {
            Self::Cpu => "CPU",
            Self::CpuParallel { .. } => "CPU (parallel)",
            #[cfg(feature = "cuda")]
            Self::Gpu(_) => "GPU",
        }
        .to_string()
    }
}
