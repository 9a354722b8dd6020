#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use formicary::simulation::geometry::{
    angle_to, clamp_to_bounds, distance, heading_vector, in_bounds, unit_to, wrap_angle,
};
use ndarray::Array1;
use std::f32::consts::{FRAC_PI_2, PI};

fn pos(x: f32, y: f32) -> Array1<f32> {
    Array1::from_vec(vec![x, y])
}

#[test]
fn test_heading_vector_is_unit_length() {
    for angle in [0.0, FRAC_PI_2, PI, -FRAC_PI_2, 2.3] {
        let v = heading_vector(angle);
        let length = (v[0] * v[0] + v[1] * v[1]).sqrt();
        assert!((length - 1.0).abs() < 1e-6);
    }
    let east = heading_vector(0.0);
    assert_eq!(east[0], 1.0);
    assert_eq!(east[1], 0.0);
}

#[test]
fn test_distance_and_direction() {
    let a = pos(1.0, 2.0);
    let b = pos(4.0, 6.0);

    assert_eq!(distance(&a, &b), 5.0);
    assert_eq!(distance(&a, &a), 0.0);

    let dir = unit_to(&a, &b);
    assert!((dir[0] - 0.6).abs() < 1e-6);
    assert!((dir[1] - 0.8).abs() < 1e-6);

    // coincident points give a zero direction instead of NaN
    let zero = unit_to(&a, &a);
    assert_eq!(zero[0], 0.0);
    assert_eq!(zero[1], 0.0);
}

#[test]
fn test_angle_to_cardinal_directions() {
    let origin = pos(0.0, 0.0);

    assert_eq!(angle_to(&origin, &pos(5.0, 0.0)), 0.0);
    assert!((angle_to(&origin, &pos(0.0, 3.0)) - FRAC_PI_2).abs() < 1e-6);
    assert!((angle_to(&origin, &pos(-2.0, 0.0)) - PI).abs() < 1e-6);
}

#[test]
fn test_wrap_angle_stays_in_range() {
    for raw in [0.0, 3.0 * PI, -3.0 * PI, 7.5, -7.5, PI, -PI] {
        let wrapped = wrap_angle(raw);
        assert!((-PI..=PI).contains(&wrapped), "wrap_angle({raw}) = {wrapped}");
    }
    assert!((wrap_angle(2.0 * PI)).abs() < 1e-6);
    assert!((wrap_angle(PI + 0.1) - (-PI + 0.1)).abs() < 1e-5);
}

#[test]
fn test_clamp_and_bounds_check() {
    let mut p = pos(-5.0, 120.0);
    assert!(!in_bounds(&p, 100.0, 100.0));

    clamp_to_bounds(&mut p, 100.0, 100.0);
    assert_eq!(p[0], 0.0);
    assert_eq!(p[1], 100.0);
    assert!(in_bounds(&p, 100.0, 100.0));
}
