//! End-to-end tests for phantom construction and projection

use crate::{
    BONE_LABEL, BeamGeometry, MaterialMap, add_orthogonal_split, build_2d_circular,
    build_2d_multi_circle, build_2d_rectangular, build_3d_leg, generate_xray_image, grid_to_string,
    simulate_transmission,
};
use proptest::prelude::*;

fn thigh_materials() -> MaterialMap {
    MaterialMap::from_pairs(&[(1.0, 0.5), (2.0, 0.3)])
}

#[test]
fn test_main() {
    crate::main();
}

#[test]
fn test_simulate_command_writes_phantom_image() {
    let dir = tempfile::tempdir().unwrap();
    crate::run_transmission(None, dir.path()).unwrap();

    let pgm = std::fs::read_to_string(dir.path().join("phantom.pgm")).unwrap();
    let mut lines = pgm.lines();
    assert_eq!(lines.next(), Some("P2"));
    assert_eq!(lines.next(), Some("400 400"));
}

#[test]
fn test_leg_command_writes_every_radiograph() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("leg.json");
    std::fs::write(
        &config_path,
        r#"{"dimensions": [8, 16, 16], "leg_radius": 6.0, "bone_radius": 3.0,
            "split_depth": 4, "fracture_width": 2.0, "fracture_angles": [0.0, 30.0]}"#,
    )
    .unwrap();

    crate::run_leg(config_path.to_str(), dir.path()).unwrap();

    for name in [
        "leg_slice.pgm",
        "xray_intact.pgm",
        "xray_split.pgm",
        "xray_fracture_0deg.pgm",
        "xray_fracture_30deg.pgm",
    ] {
        let pgm = std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(pgm.starts_with("P2\n64 64\n255\n"), "bad header in {}", name);
    }
}

#[test]
fn test_leg_command_rejects_bad_labels() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("leg.json");
    std::fs::write(
        &config_path,
        r#"{"dimensions": [8, 16, 16], "leg_radius": 6.0, "bone_radius": 3.0, "bone_value": 1.5}"#,
    )
    .unwrap();

    let result = crate::run_leg(config_path.to_str(), dir.path());
    assert!(matches!(result, Err(crate::SimulationError::InvalidGeometry(_))));
    assert!(!dir.path().join("xray_split.pgm").exists());
}

#[test]
fn test_thigh_reference_profile() {
    let phantom = build_2d_circular((100, 100), 40.0, 20.0, 1.0, 2.0).unwrap();
    let beam = BeamGeometry::new(60.0, 0.0, 100.0, 200.0);
    let profile = simulate_transmission(&phantom, &beam, &thigh_materials()).unwrap();

    let center = (-0.3f64 * 100.0).exp() * (200.0 / 300.0);
    let outside = 1.0 * (200.0 / 300.0);
    println!("profile[50] = {:.6e}, profile[0] = {:.6}", profile[50], profile[0]);

    assert!((profile[50] - center).abs() < 1e-15);
    assert!((profile[0] - outside).abs() < 1e-12);
}

#[test]
fn test_leg_split_at_64() {
    let leg = build_3d_leg((128, 128, 128), 40.0, 15.0, 1.0, 2.0).unwrap();
    let split = add_orthogonal_split(leg.clone(), 64, 0.0);

    for z in 64..128 {
        assert!(split.slice(z).iter().all(|&v| v < BONE_LABEL), "bone left in slice {}", z);
    }
    for z in 0..64 {
        assert_eq!(split.slice(z), leg.slice(z));
    }
}

#[test]
fn test_radiograph_of_split_leg() {
    let leg = build_3d_leg((128, 64, 64), 20.0, 8.0, 1.0, 2.0).unwrap();
    let image = generate_xray_image(&add_orthogonal_split(leg, 64, 0.0));

    // Bone column: 64 slices of bone, 64 emptied. Soft tissue: 128 slices of 1.
    assert_eq!(image.get(32, 32), 128.0);
    assert_eq!(image.get(32, 45), 128.0);
    assert_eq!(image.get(0, 0), 0.0);
}

#[test]
fn test_small_circle_layout() {
    let phantom = build_2d_circular((7, 7), 3.0, 1.5, 1.0, 2.0).unwrap();
    let grid = grid_to_string(&phantom);
    println!("{}", grid);

    let center_row = grid.lines().nth(3).unwrap();
    assert_eq!(center_row.trim(), "0.00  1.00  2.00  2.00  2.00  1.00  0.00");
}

fn circle_args() -> impl Strategy<Value = (usize, usize, f64, f64)> {
    (4usize..48, 4usize..48, 0.0f64..20.0, 0.5f64..20.0)
        .prop_map(|(rows, cols, inner, gap)| (rows, cols, inner, inner + gap))
}

proptest! {
    /// Every cell lands in exactly the region its distance says.
    #[test]
    fn circular_regions_follow_distance((rows, cols, inner, outer) in circle_args()) {
        let phantom = build_2d_circular((rows, cols), outer, inner, 1.0, 2.0).unwrap();
        let (cy, cx) = (rows / 2, cols / 2);

        for y in 0..rows {
            for x in 0..cols {
                let d = ((y as f64 - cy as f64).powi(2) + (x as f64 - cx as f64).powi(2)).sqrt();
                let expected = if d < inner { 2.0 } else if d < outer { 1.0 } else { 0.0 };
                prop_assert_eq!(phantom.get(y, x), expected);
            }
        }
    }

    /// Builders hold no state between calls.
    #[test]
    fn builders_are_deterministic((rows, cols, inner, outer) in circle_args()) {
        let a = build_2d_circular((rows, cols), outer, inner, 1.0, 2.0).unwrap();
        let b = build_2d_circular((rows, cols), outer, inner, 1.0, 2.0).unwrap();
        prop_assert_eq!(a, b);

        let c = build_2d_multi_circle((rows, cols), &[(rows / 2, cols / 2)], &[outer]).unwrap();
        let d = build_2d_multi_circle((rows, cols), &[(rows / 2, cols / 2)], &[outer]).unwrap();
        prop_assert_eq!(c, d);
    }

    /// The inner rectangle always shows through, whatever the outer one covers.
    #[test]
    fn inner_rectangle_wins(
        top in 0usize..10, left in 0usize..10,
        h in 1usize..10, w in 1usize..10,
        otop in 0usize..10, oleft in 0usize..10,
        oh in 1usize..10, ow in 1usize..10,
    ) {
        let inner = ((top, left), (top + h, left + w));
        let outer = ((otop, oleft), (otop + oh, oleft + ow));
        let phantom = build_2d_rectangular((20, 20), outer, inner, 1.0, 2.0).unwrap();

        for y in top..top + h {
            for x in left..left + w {
                prop_assert_eq!(phantom.get(y, x), 2.0);
            }
        }
    }

    /// Profile values are in (0, 1] in front of the source and exactly 0 behind it.
    #[test]
    fn profile_bounds(
        angle in -80.0f64..80.0,
        sp in 1.0f64..100.0,
        sd in 1.0f64..300.0,
    ) {
        let phantom = build_2d_circular((40, 40), 15.0, 6.0, 1.0, 2.0).unwrap();
        let materials = MaterialMap::from_pairs(&[(1.0, 0.01), (2.0, 0.02)]);
        let beam = BeamGeometry::new(60.0, angle, sp, sd);
        let profile = simulate_transmission(&phantom, &beam, &materials).unwrap();

        let tan = angle.to_radians().tan();
        for (i, &v) in profile.values().iter().enumerate() {
            let distance_column = sp + (i as f64 - 20.0) * tan;
            if distance_column < 0.0 {
                prop_assert_eq!(v, 0.0);
            } else {
                prop_assert!(v > 0.0 && v <= 1.0, "column {} = {}", i, v);
            }
        }
    }

    /// At 0° every column sees the same distance, so equal labels give equal values.
    #[test]
    fn zero_angle_profile_depends_on_label_only(sp in 1.0f64..200.0, sd in 1.0f64..400.0) {
        let phantom = build_2d_circular((30, 30), 12.0, 5.0, 1.0, 2.0).unwrap();
        let beam = BeamGeometry::new(60.0, 0.0, sp, sd);
        let profile = simulate_transmission(&phantom, &beam, &thigh_materials()).unwrap();

        let mag = sd / (sp + sd);
        for (i, &label) in phantom.row(15).iter().enumerate() {
            let mu = thigh_materials().get(label).unwrap_or(0.0);
            prop_assert!((profile[i] - (-mu * sp).exp() * mag).abs() < 1e-12);
        }
    }
}
