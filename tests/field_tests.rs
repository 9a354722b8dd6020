#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use formicary::simulation::field::{Channel, PheromoneField};
use ndarray::Array1;

fn create_test_field() -> PheromoneField {
    PheromoneField::new(200.0, 200.0, 10.0, 0.05, 0.05, 100.0).expect("valid field config")
}

fn pos(x: f32, y: f32) -> Array1<f32> {
    Array1::from_vec(vec![x, y])
}

#[test]
fn test_deposit_then_sample_is_exact() {
    let mut field = create_test_field();

    field.deposit(Channel::Food, &pos(0.0, 0.0), 5.0);

    // No step has run yet, so the deposited amount must come back exactly.
    assert_eq!(field.sample(Channel::Food, &pos(0.0, 0.0)), 5.0);
    // The other channel is untouched.
    assert_eq!(field.sample(Channel::Home, &pos(0.0, 0.0)), 0.0);
}

#[test]
fn test_sample_outside_bounds_is_zero() {
    let mut field = create_test_field();
    field.deposit(Channel::Food, &pos(5.0, 5.0), 50.0);

    assert_eq!(field.sample(Channel::Food, &pos(-1.0, 5.0)), 0.0);
    assert_eq!(field.sample(Channel::Food, &pos(5.0, 201.0)), 0.0);
}

#[test]
fn test_deposit_outside_bounds_is_ignored() {
    let mut field = create_test_field();
    field.deposit(Channel::Food, &pos(-50.0, 10.0), 5.0);
    field.deposit(Channel::Food, &pos(10.0, 500.0), 5.0);

    assert_eq!(field.total_mass(Channel::Food), 0.0);
}

#[test]
fn test_nonpositive_deposit_is_noop() {
    let mut field = create_test_field();
    field.deposit(Channel::Home, &pos(50.0, 50.0), 0.0);
    field.deposit(Channel::Home, &pos(50.0, 50.0), -3.0);

    assert_eq!(field.total_mass(Channel::Home), 0.0);
}

#[test]
fn test_deposit_saturates_at_cell_cap() {
    let mut field = create_test_field();
    for _ in 0..50 {
        field.deposit(Channel::Food, &pos(50.0, 50.0), 10.0);
    }

    assert_eq!(field.sample(Channel::Food, &pos(55.0, 55.0)), field.cell_cap());
    assert_eq!(field.total_mass(Channel::Food), 100.0);
}

#[test]
fn test_bilinear_sample_between_cells() {
    let mut field = create_test_field();
    // Cell (0, 0) has its center at (5, 5); cell (1, 0) at (15, 5).
    field.deposit(Channel::Food, &pos(5.0, 5.0), 8.0);

    // Halfway between the two cell centers the interpolation gives half.
    assert_eq!(field.sample(Channel::Food, &pos(10.0, 5.0)), 4.0);
}

#[test]
fn test_evaporation_reduces_total_mass() {
    let mut field = create_test_field();
    field.deposit(Channel::Food, &pos(100.0, 100.0), 50.0);

    let mut previous = field.total_mass(Channel::Food);
    for _ in 0..20 {
        field.step(0.1);
        let current = field.total_mass(Channel::Food);
        assert!(
            current < previous,
            "mass must strictly decrease without new deposits"
        );
        previous = current;
    }
}

#[test]
fn test_diffusion_conserves_mass_up_to_evaporation() {
    let mut field = create_test_field();
    field.deposit(Channel::Food, &pos(100.0, 100.0), 60.0);

    let before = field.total_mass(Channel::Food);
    let dt = 0.1;
    field.step(dt);
    let after = field.total_mass(Channel::Food);

    // Diffusion itself conserves mass; only evaporation removes it.
    let expected = before * (1.0f32 - 0.05).powf(dt);
    assert!(
        (after - expected).abs() < 1e-3,
        "mass after step {after} should match evaporation-only prediction {expected}"
    );
}

#[test]
fn test_diffusion_spreads_symmetrically() {
    let mut field = create_test_field();
    let (cells_x, cells_y) = field.dimensions();
    let center_x = cells_x / 2;
    let center_y = cells_y / 2;
    let cell = field.cell_size();
    let center = pos(
        (center_x as f32 + 0.5) * cell,
        (center_y as f32 + 0.5) * cell,
    );

    field.deposit(Channel::Food, &center, 10.0);
    for _ in 0..5 {
        field.step(0.5);
    }

    let grid = field.grid(Channel::Food);
    for offset in 1..4usize {
        let east = grid[[center_x + offset, center_y]];
        let west = grid[[center_x - offset, center_y]];
        let north = grid[[center_x, center_y + offset]];
        let south = grid[[center_x, center_y - offset]];

        assert!((east - west).abs() < 1e-5);
        assert!((north - south).abs() < 1e-5);
        assert!((east - north).abs() < 1e-5);
        assert!(east > 0.0, "diffusion should have spread outward");
    }
}

#[test]
fn test_cells_stay_within_bounds_over_many_steps() {
    let mut field = create_test_field();
    for i in 0..10 {
        field.deposit(Channel::Food, &pos(i as f32 * 17.0 % 200.0, 90.0), 40.0);
        field.deposit(Channel::Home, &pos(30.0, i as f32 * 23.0 % 200.0), 70.0);
    }

    for _ in 0..200 {
        field.step(0.1);
    }

    for channel in Channel::ALL {
        for &value in field.grid(channel).iter() {
            assert!(value.is_finite());
            assert!((0.0..=100.0).contains(&value));
        }
    }
}

#[test]
fn test_unstable_diffusion_rate_is_rejected() {
    let result = PheromoneField::new(200.0, 200.0, 10.0, 0.05, 0.3, 100.0);
    assert!(result.is_err(), "diffusion rate above 0.25 must be rejected");

    let result = PheromoneField::new(200.0, 200.0, 10.0, 0.05, -0.1, 100.0);
    assert!(result.is_err(), "negative diffusion rate must be rejected");
}

#[test]
fn test_invalid_evaporation_rate_is_rejected() {
    assert!(PheromoneField::new(200.0, 200.0, 10.0, 0.0, 0.05, 100.0).is_err());
    assert!(PheromoneField::new(200.0, 200.0, 10.0, 1.0, 0.05, 100.0).is_err());
}
