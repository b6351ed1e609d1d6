//! Run configuration. Defaults match the reference run: a [-10, 10] cube, 128 samples per
//! axis, 500 centers, A = 0.1, w = 0.2.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{QuadError, Result},
    grid_setup::GridSpec,
    potential::{ExpPrecision, PotentialParams},
    types::ComputationDevice,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Serial,
    Rayon,
    Cuda,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureConfig {
    pub grid_min: f64,
    pub grid_max: f64,
    /// Samples per axis. Also the number of z samples per node.
    pub grid_n: usize,
    /// Number of Gaussian centers; P.
    pub n_centers: usize,
    pub amplitude: f64,
    pub width: f64,
    /// If `None`, centers are placed from a fresh random seed each run.
    pub seed: Option<u64>,
    pub exp_precision: ExpPrecision,
    pub device: DeviceKind,
    /// Thread count for the rayon device. `None` uses all cores.
    pub threads: Option<usize>,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        let grid = GridSpec::default();
        let params = PotentialParams::default();

        Self {
            grid_min: grid.grid_min,
            grid_max: grid.grid_max,
            grid_n: grid.n,
            n_centers: 500,
            amplitude: params.amplitude,
            width: params.width,
            seed: None,
            exp_precision: params.precision,
            device: DeviceKind::Serial,
            threads: None,
        }
    }
}

impl QuadratureConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec {
            grid_min: self.grid_min,
            grid_max: self.grid_max,
            n: self.grid_n,
        }
    }

    pub fn potential_params(&self) -> PotentialParams {
        PotentialParams {
            amplitude: self.amplitude,
            width: self.width,
            precision: self.exp_precision,
        }
    }

    /// Reject configurations that can't produce a meaningful field. An empty center set is
    /// allowed, but flagged: the field is then uniform.
    pub fn validate(&self) -> Result<()> {
        self.grid().validate()?;

        if !self.amplitude.is_finite() || !self.width.is_finite() {
            return Err(QuadError::InvalidConfig(format!(
                "amplitude and width must be finite; got A = {}, w = {}",
                self.amplitude, self.width
            )));
        }
        if self.threads == Some(0) {
            return Err(QuadError::InvalidConfig(
                "thread count must be at least 1".to_owned(),
            ));
        }
        if self.n_centers == 0 {
            warn!("No Gaussian centers; the potential is zero everywhere, and the field will be uniform");
        }

        Ok(())
    }

    /// The CPU devices are built directly. The CUDA device has to be opened, so is built
    /// by `gpu::init_device` instead.
    pub fn cpu_device(&self) -> Result<ComputationDevice> {
        match self.device {
            DeviceKind::Serial => Ok(ComputationDevice::Cpu),
            DeviceKind::Rayon => Ok(ComputationDevice::CpuParallel {
                threads: self.threads,
            }),
            DeviceKind::Cuda => Err(QuadError::InvalidConfig(
                "the CUDA device isn't a CPU device".to_owned(),
            )),
        }
    }
}
