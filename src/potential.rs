//! Contains code related to evaluating the Gaussian potential f(x, y, z).

use lin_alg::f64::Vec3;
use serde::{Deserialize, Serialize};

use crate::centers::CenterSet;

/// Precision used for the transcendental (`exp`) calls. Sums are always accumulated in f64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpPrecision {
    #[default]
    Double,
    /// Round the argument to f32, exponentiate in f32, then widen. Amplitude and width are
    /// rounded to f32 too, as single-precision constants held in doubles. Together these match
    /// CPU reference runs that used single-precision `exp`.
    Single,
}

impl ExpPrecision {
    pub fn exp(self, x: f64) -> f64 {
        match self {
            Self::Double => x.exp(),
            Self::Single => (x as f32).exp() as f64,
        }
    }

    /// Round a potential parameter to the precision it's stored at.
    pub fn round_param(self, v: f64) -> f64 {
        match self {
            Self::Double => v,
            Self::Single => v as f32 as f64,
        }
    }
}

/// Height and falloff shared by every Gaussian.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PotentialParams {
    /// Height of each Gaussian; A.
    pub amplitude: f64,
    /// Inverse width; w. Larger values make each bump fall off faster.
    pub width: f64,
    pub precision: ExpPrecision,
}

impl Default for PotentialParams {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            width: 0.2,
            precision: ExpPrecision::Double,
        }
    }
}

/// Evaluate f at a point: Σ A exp(-w |posit - center|²), over all centers.
pub fn potential_gauss(posit: Vec3, centers: &CenterSet, params: &PotentialParams) -> f64 {
    let amplitude = params.precision.round_param(params.amplitude);
    let width = params.precision.round_param(params.width);

    let mut result = 0.;

    for ctr in centers.points() {
        let mut dist_sq = 0.;
        dist_sq += (posit.x - ctr.x) * (posit.x - ctr.x);
        dist_sq += (posit.y - ctr.y) * (posit.y - ctr.y);
        dist_sq += (posit.z - ctr.z) * (posit.z - ctr.z);

        result += amplitude * params.precision.exp(-width * dist_sq);
    }

    result
}
