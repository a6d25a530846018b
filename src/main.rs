mod config;
mod error;
mod phantom;
mod projection;
mod render;
mod simulation;

#[cfg(test)]
mod tests;

// Re-export public API
pub use config::{LegStudyConfig, MaterialPreset, PhantomSpec, ProjectionMode, SimulationConfig};
pub use error::{SimResult, SimulationError};
pub use phantom::{
    BACKGROUND_LABEL, BONE_LABEL, OBJECT_LABEL, Phantom2D, Phantom3D, Rect, add_fracture,
    add_orthogonal_split, build_2d_circular, build_2d_multi_circle, build_2d_rectangular,
    build_3d_leg,
};
pub use projection::{
    BeamGeometry, CoarseUniform, ColumnSampling, MaterialMap, ProjectionModel, TransmissionProfile,
    XrayImage, generate_xray_image, simulate_transmission,
};
pub use render::{Raster, grid_to_string, normalize_values, profile_to_string, save_pgm, write_pgm};
pub use simulation::{FractureVariant, LegStudyOutput, SimulationOutput, run_leg_study, run_simulation};

use std::path::Path;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(2).map(String::as_str);

    let result = if args.len() > 1 && args[1] == "--simulate" {
        run_transmission(config_path, Path::new("."))
    } else if args.len() > 1 && args[1] == "--leg" {
        run_leg(config_path, Path::new("."))
    } else if args.len() > 1 && args[1] == "--benchmark" {
        run_benchmark()
    } else {
        println!("X-ray Phantom Simulator");
        println!("Run with --simulate [config.json] for a 2D transmission profile");
        println!("Run with --leg [config.json] for 3D leg radiographs and fractures");
        println!("Run with --benchmark to test performance");
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Write `phantom.pgm` into `out_dir` and print the profile table.
fn run_transmission(config_path: Option<&str>, out_dir: &Path) -> SimResult<()> {
    let config = match config_path {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };

    let output = run_simulation(&config)?;
    save_pgm(&output.phantom, out_dir.join("phantom.pgm"), 4)?;
    print!("{}", profile_to_string(&output.profile));
    Ok(())
}

/// Write the mid-depth slice, intact/split radiographs and one radiograph per
/// fracture angle into `out_dir`.
fn run_leg(config_path: Option<&str>, out_dir: &Path) -> SimResult<()> {
    let config = match config_path {
        Some(path) => LegStudyConfig::from_json_file(path)?,
        None => LegStudyConfig::default(),
    };

    let output = run_leg_study(&config)?;
    save_pgm(&output.leg.slice_2d(output.leg.depth() / 2), out_dir.join("leg_slice.pgm"), 4)?;
    save_pgm(&output.intact_image, out_dir.join("xray_intact.pgm"), 4)?;
    save_pgm(&output.split_image, out_dir.join("xray_split.pgm"), 4)?;
    for variant in &output.fractures {
        let filename = format!("xray_fracture_{:.0}deg.pgm", variant.angle_deg);
        save_pgm(&variant.image, out_dir.join(filename), 4)?;
    }
    Ok(())
}

fn run_benchmark() -> SimResult<()> {
    use std::time::Instant;
    use rayon::prelude::*;

    println!("=== Leg Phantom Benchmark ===\n");

    let sizes = [(32, 64, 64), (64, 128, 128), (128, 128, 128)];
    let angles: Vec<f64> = (0..8).map(|i| i as f64 * 10.0).collect();
    let iterations = 5;

    for dims in sizes {
        println!("Volume: {}x{}x{}", dims.0, dims.1, dims.2);
        println!("-----------------------");

        let leg_radius = dims.1 as f64 * 0.3;
        let bone_radius = leg_radius * 0.4;

        let start = Instant::now();
        for _ in 0..iterations {
            let _ = build_3d_leg(dims, leg_radius, bone_radius, 1.0, 2.0)?;
        }
        let build_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

        let leg = build_3d_leg(dims, leg_radius, bone_radius, 1.0, 2.0)?;

        // Sequential fracture fan-out
        let start = Instant::now();
        for _ in 0..iterations {
            for &angle in &angles {
                let variant = add_fracture(&leg, bone_radius, 4.0, angle)?;
                let _ = generate_xray_image(&variant);
            }
        }
        let sequential_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

        // Parallel with rayon
        let start = Instant::now();
        for _ in 0..iterations {
            let _images = angles
                .par_iter()
                .map(|&angle| add_fracture(&leg, bone_radius, 4.0, angle).map(|v| generate_xray_image(&v)))
                .collect::<SimResult<Vec<_>>>()?;
        }
        let parallel_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

        println!("  Build leg:              {:.3} ms/iter", build_ms);
        println!("  {} fractures (seq):     {:.3} ms/iter", angles.len(), sequential_ms);
        println!("  {} fractures (rayon):   {:.3} ms/iter", angles.len(), parallel_ms);
        println!("  Speedup: {:.2}x", sequential_ms / parallel_ms);
        println!();
    }

    Ok(())
}
