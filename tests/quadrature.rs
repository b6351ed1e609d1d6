use gauss_quad::{
    config::{DeviceKind, QuadratureConfig},
    integrate_column, integrate_grid, make_device,
    report::FieldStats,
    run, run_with_centers, CenterSet, ComputationDevice, ExpPrecision, GridSpec, PotentialParams,
    QuadError, QuadratureCtx,
};
use lin_alg::f64::Vec3;

fn small_config() -> QuadratureConfig {
    QuadratureConfig {
        grid_n: 24,
        n_centers: 50,
        seed: Some(2024),
        ..Default::default()
    }
}

#[test]
fn fixed_centers_are_deterministic() {
    let cfg = small_config();
    let centers = CenterSet::generate_seeded(cfg.n_centers, &cfg.grid(), 11).unwrap();

    let (a, _) = run_with_centers(&cfg, &centers, &ComputationDevice::Cpu).unwrap();
    let (b, _) = run_with_centers(&cfg, &centers, &ComputationDevice::Cpu).unwrap();
    let (c, _) = run_with_centers(
        &cfg,
        &centers,
        &ComputationDevice::CpuParallel { threads: Some(4) },
    )
    .unwrap();

    assert_eq!(a.data, b.data);
    assert_eq!(a.data, c.data);
}

#[test]
fn empty_center_set_gives_domain_width() {
    let centers = CenterSet::default();

    for (min, max, n) in [(-10., 10., 128), (0., 3., 5), (-1., 2.5, 40)] {
        let grid = GridSpec::new(min, max, n).unwrap();
        let ctx = QuadratureCtx::new(&centers, PotentialParams::default(), grid);
        let field = integrate_grid(&ctx, &ComputationDevice::CpuParallel { threads: None }).unwrap();

        assert_eq!(field.data.len(), n * n);
        for v in &field.data {
            assert!((v - (max - min)).abs() < 1e-10 * (max - min));
        }
    }
}

#[test]
fn single_center_peaks_at_origin_column() {
    let centers = CenterSet::from_points(vec![Vec3::new(0., 0., 0.)]);
    let grid = GridSpec::new(-10., 10., 128).unwrap();
    let params = PotentialParams {
        amplitude: 0.1,
        width: 0.2,
        precision: ExpPrecision::Double,
    };
    let ctx = QuadratureCtx::new(&centers, params, grid);
    let field = integrate_grid(&ctx, &ComputationDevice::CpuParallel { threads: None }).unwrap();

    let stats = FieldStats::new(&field);
    let (i_max, j_max) = stats.argmax;
    assert!(i_max == 63 || i_max == 64);
    assert!(j_max == 63 || j_max == 64);

    // Local maximum at the node nearest the origin.
    let peak = field.get(64, 64);
    for (di, dj) in [(1, 0), (0, 1), (1, 1)] {
        assert!(peak >= field.get(64 + di, 64 + dj));
    }

    // Falls off moving outward along the center row.
    let row = field.row(64);
    for j in 64..127 {
        assert!(row[j + 1] < row[j], "not decreasing at j = {j}");
    }
    for j in 1..=63 {
        assert!(row[j - 1] < row[j], "not increasing at j = {j}");
    }
}

#[test]
fn field_bounded_below_by_domain_width() {
    let cfg = small_config();
    let device = make_device(&cfg).unwrap();
    let out = run(&cfg, &device).unwrap();

    let width = cfg.grid_max - cfg.grid_min;
    for v in &out.field.data {
        assert!(*v >= width * (1. - 1e-12));
    }
}

#[test]
fn run_reports_seed_and_full_field() {
    let cfg = QuadratureConfig {
        device: DeviceKind::Rayon,
        threads: Some(2),
        ..small_config()
    };
    let device = make_device(&cfg).unwrap();
    let out = run(&cfg, &device).unwrap();

    assert_eq!(out.seed, 2024);
    assert_eq!(out.centers.len(), cfg.n_centers);
    assert_eq!(out.field.data.len(), cfg.grid_n * cfg.grid_n);
    assert_eq!(out.device_name, "CPU (parallel)");

    // Same seed, same centers, same field.
    let again = run(&cfg, &device).unwrap();
    assert_eq!(out.field.data, again.field.data);
}

#[test]
fn cells_match_per_node_integration() {
    let cfg = small_config();
    let centers = CenterSet::generate_seeded(cfg.n_centers, &cfg.grid(), 3).unwrap();
    let ctx = QuadratureCtx::new(&centers, cfg.potential_params(), cfg.grid());
    let field = integrate_grid(&ctx, &ComputationDevice::Cpu).unwrap();

    for (i, j) in [(0, 0), (3, 17), (23, 23), (12, 0)] {
        assert_eq!(field.data[i * cfg.grid_n + j], integrate_column(i, j, &ctx));
    }
}

#[test]
fn single_precision_exp_stays_close_to_double() {
    let cfg = small_config();
    let centers = CenterSet::generate_seeded(cfg.n_centers, &cfg.grid(), 8).unwrap();

    let (dbl, _) = run_with_centers(&cfg, &centers, &ComputationDevice::Cpu).unwrap();
    let single = QuadratureConfig {
        exp_precision: ExpPrecision::Single,
        ..cfg
    };
    let (sgl, _) = run_with_centers(&single, &centers, &ComputationDevice::Cpu).unwrap();

    for (a, b) in dbl.data.iter().zip(&sgl.data) {
        assert!((a - b).abs() / a < 1e-5);
    }
}

#[test]
fn invalid_grid_fails_fast() {
    let cfg = QuadratureConfig {
        grid_n: 1,
        ..small_config()
    };
    let result = run(&cfg, &ComputationDevice::Cpu);
    assert!(matches!(result, Err(QuadError::InvalidConfig(_))));
}

#[cfg(not(feature = "cuda"))]
#[test]
fn cuda_device_needs_feature() {
    let cfg = QuadratureConfig {
        device: DeviceKind::Cuda,
        ..small_config()
    };
    assert!(matches!(make_device(&cfg), Err(QuadError::InvalidConfig(_))));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn oversized_problem_reports_allocation_failure() {
    let centers = CenterSet::default();
    let grid = GridSpec::new(-10., 10., 1 << 32).unwrap();
    let ctx = QuadratureCtx::new(&centers, PotentialParams::default(), grid);

    for device in [
        ComputationDevice::Cpu,
        ComputationDevice::CpuParallel { threads: None },
    ] {
        assert!(matches!(
            integrate_grid(&ctx, &device),
            Err(QuadError::Allocation { .. })
        ));
    }

    let result = CenterSet::generate_seeded(usize::MAX / 2, &GridSpec::default(), 5);
    assert!(matches!(result, Err(QuadError::Allocation { .. })));
}
