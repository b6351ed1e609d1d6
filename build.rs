//! We use this to automatically compile the CUDA quadrature kernel when building with the
//! `cuda` feature.
//!
//! You must have `nvcc` in the PATH environment variable.

use std::{env, path::PathBuf, process::Command};

/// Compute capability the PTX targets, eg `89` for RTX 40-series cards. Override with the
/// `CUDA_ARCH` env var.
/// [Selecting architecture, by nVidia series](https://arnon.dk/matching-sm-architectures-arch-and-gencode-for-various-nvidia-cards/)
const DEFAULT_CUDA_ARCH: &str = "89";

/// See [These CUDA docs](https://docs.nvidia.com/cuda/cuda-compiler-driver-nvcc/index.html)
/// for info about these flags.
///
/// Compiles our CUDA program to PTX using Nvidia's NVCC compiler. The PTX lands in `OUT_DIR`,
/// and is embedded in the binary by `gpu.rs`.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if env::var_os("CARGO_FEATURE_CUDA").is_none() {
        return;
    }

    // Tell Cargo that if the given file changes, to rerun this build script.
    println!("cargo:rerun-if-changed=src/cuda/quadrature.cu");
    println!("cargo:rerun-if-env-changed=CUDA_ARCH");

    let arch = env::var("CUDA_ARCH").unwrap_or_else(|_| DEFAULT_CUDA_ARCH.to_owned());
    let gencode = format!("arch=compute_{arch},code=sm_{arch}");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("Cargo always sets OUT_DIR"));
    let ptx_path = out_dir.join("quadrature.ptx");

    let compilation_result = Command::new("nvcc")
        .args([
            "src/cuda/quadrature.cu",
            "-gencode",
            &gencode,
            "-ptx",
            "-O3", // optimized/release mode.
            "-o",
        ])
        .arg(&ptx_path)
        .output()
        .expect("Problem compiling the CUDA module.");

    if !compilation_result.status.success() {
        panic!("Compilation problem: {:?}", compilation_result);
    }
}
