//! Computes the marginal density g(x, y) = ∫ exp(f(x, y, z)) dz on a grid, for a potential
//! made of randomly-placed Gaussians, and reports how long the integration took.
//!
//! Usage: `gauss_quad [--config FILE] [--grid-n N] [--centers P] ... [--output FILE]`

use std::{path::PathBuf, process};

use clap::Parser;
use gauss_quad::{
    config::{DeviceKind, QuadratureConfig},
    make_device,
    potential::ExpPrecision,
    report::{self, FieldStats},
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "gauss_quad")]
#[command(about = "Integrate exp(f) along z for a sum-of-Gaussians potential f")]
struct Args {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    grid_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    grid_max: Option<f64>,

    /// Samples per axis (at least 2).
    #[arg(long)]
    grid_n: Option<usize>,

    /// Number of Gaussian centers.
    #[arg(long = "centers")]
    n_centers: Option<usize>,

    /// Gaussian height, A.
    #[arg(long, allow_negative_numbers = true)]
    amplitude: Option<f64>,

    /// Gaussian inverse width, w.
    #[arg(long, allow_negative_numbers = true)]
    width: Option<f64>,

    /// Seed for center placement. Omit for a random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Use single-precision `exp`, matching reference CPU runs.
    #[arg(long)]
    single_exp: bool,

    #[arg(long, value_enum)]
    device: Option<DeviceArg>,

    /// Threads for the rayon device.
    #[arg(long)]
    threads: Option<usize>,

    /// Write the field here, one grid row per line.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DeviceArg {
    Serial,
    Rayon,
    Cuda,
}

impl From<DeviceArg> for DeviceKind {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Serial => Self::Serial,
            DeviceArg::Rayon => Self::Rayon,
            DeviceArg::Cuda => Self::Cuda,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn build_config(args: &Args) -> gauss_quad::Result<QuadratureConfig> {
    let mut cfg = match &args.config {
        Some(path) => QuadratureConfig::load(path)?,
        None => QuadratureConfig::default(),
    };

    if let Some(v) = args.grid_min {
        cfg.grid_min = v;
    }
    if let Some(v) = args.grid_max {
        cfg.grid_max = v;
    }
    if let Some(v) = args.grid_n {
        cfg.grid_n = v;
    }
    if let Some(v) = args.n_centers {
        cfg.n_centers = v;
    }
    if let Some(v) = args.amplitude {
        cfg.amplitude = v;
    }
    if let Some(v) = args.width {
        cfg.width = v;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if args.single_exp {
        cfg.exp_precision = ExpPrecision::Single;
    }
    if let Some(d) = args.device {
        cfg.device = d.into();
    }
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }

    Ok(cfg)
}

fn run(args: &Args) -> gauss_quad::Result<()> {
    let cfg = build_config(args)?;
    let device = make_device(&cfg)?;

    let out = gauss_quad::run(&cfg, &device)?;

    println!(
        "Time taken on {} = {:.6} seconds",
        out.device_name,
        out.elapsed.as_secs_f64()
    );

    let stats = FieldStats::new(&out.field);
    info!(
        "g: min {:.6}, max {:.6} at {:?}, mean {:.6}",
        stats.min, stats.max, stats.argmax, stats.mean
    );

    if let Some(path) = &args.output {
        report::write_field(path, &out.field)?;
        info!("Wrote field to {}", path.display());
    }

    Ok(())
}

fn main() {
    init_logging();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{e}");
        process::exit(1);
    }
}
