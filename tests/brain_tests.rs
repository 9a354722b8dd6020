#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use formicary::simulation::brain::{ACTION_COUNT, Brain, SENSOR_COUNT};
use ndarray::Array1;

const LAYER_SIZES: [usize; 4] = [SENSOR_COUNT, 8, 6, ACTION_COUNT];

fn brains_equal(a: &Brain, b: &Brain) -> bool {
    if a.layers.len() != b.layers.len() {
        return false;
    }
    a.layers.iter().zip(&b.layers).all(|(la, lb)| {
        la.weights == lb.weights && la.biases == lb.biases
    })
}

#[test]
fn test_new_random_has_requested_shapes() {
    let brain = Brain::new_random(&LAYER_SIZES, 0.1, 7);

    assert_eq!(brain.layer_sizes(), LAYER_SIZES.to_vec());
    assert_eq!(brain.layers.len(), LAYER_SIZES.len() - 1);
    for (i, layer) in brain.layers.iter().enumerate() {
        assert_eq!(layer.weights.dim(), (LAYER_SIZES[i + 1], LAYER_SIZES[i]));
        assert_eq!(layer.biases.len(), LAYER_SIZES[i + 1]);
    }
}

#[test]
fn test_new_random_is_seed_deterministic() {
    let a = Brain::new_random(&LAYER_SIZES, 0.1, 42);
    let b = Brain::new_random(&LAYER_SIZES, 0.1, 42);
    let c = Brain::new_random(&LAYER_SIZES, 0.1, 43);

    assert!(brains_equal(&a, &b));
    assert!(!brains_equal(&a, &c));
}

#[test]
fn test_think_is_pure_and_bounded() {
    let brain = Brain::new_random(&LAYER_SIZES, 0.5, 11);
    let inputs = Array1::from_shape_fn(SENSOR_COUNT, |i| (i as f32) / 10.0 - 0.5);

    let first = brain.think(&inputs);
    let second = brain.think(&inputs);

    assert_eq!(first, second, "inference must have no internal state");
    assert_eq!(first.len(), ACTION_COUNT);
    for &value in first.iter() {
        assert!((-1.0..=1.0).contains(&value), "tanh output must be bounded");
    }
}

#[test]
fn test_mutated_preserves_shape_and_original() {
    let brain = Brain::new_random(&LAYER_SIZES, 0.1, 3);
    let original = brain.clone();

    let mutant = brain.mutated(1.0, 0.5, 99);

    assert_eq!(mutant.layer_sizes(), brain.layer_sizes());
    assert!(
        brains_equal(&brain, &original),
        "mutation must be copy-on-write"
    );
    assert!(
        !brains_equal(&brain, &mutant),
        "rate 1.0 must perturb the copy"
    );
}

#[test]
fn test_mutated_is_seed_deterministic() {
    let brain = Brain::new_random(&LAYER_SIZES, 0.1, 3);

    let a = brain.mutated(0.5, 0.2, 1234);
    let b = brain.mutated(0.5, 0.2, 1234);
    let c = brain.mutated(0.5, 0.2, 1235);

    assert!(brains_equal(&a, &b));
    assert!(!brains_equal(&a, &c));
}

#[test]
fn test_mutated_with_zero_rate_is_identical() {
    let brain = Brain::new_random(&LAYER_SIZES, 0.1, 5);

    assert!(brains_equal(&brain, &brain.mutated(0.0, 0.5, 7)));
    assert!(brains_equal(&brain, &brain.mutated(0.5, 0.0, 7)));
}

#[test]
fn test_crossover_preserves_shape() {
    let p1 = Brain::new_random(&LAYER_SIZES, 0.1, 1);
    let p2 = Brain::new_random(&LAYER_SIZES, 0.1, 2);

    let child = Brain::crossover(&p1, &p2, 7);

    assert_eq!(child.layer_sizes(), p1.layer_sizes());
}

#[test]
fn test_crossover_picks_every_weight_from_a_parent() {
    let p1 = Brain::new_random(&LAYER_SIZES, 0.1, 1);
    let p2 = Brain::new_random(&LAYER_SIZES, 0.1, 2);

    let child = Brain::crossover(&p1, &p2, 7);

    let mut from_first = 0usize;
    let mut from_second = 0usize;
    for ((cl, l1), l2) in child.layers.iter().zip(&p1.layers).zip(&p2.layers) {
        for ((&c, &w1), &w2) in cl.weights.iter().zip(l1.weights.iter()).zip(l2.weights.iter()) {
            assert!(c == w1 || c == w2, "child weight must come from a parent");
            if c == w1 {
                from_first += 1;
            } else {
                from_second += 1;
            }
        }
    }
    assert!(from_first > 0, "uniform crossover should use both parents");
    assert!(from_second > 0, "uniform crossover should use both parents");
}

#[test]
fn test_crossover_is_seed_deterministic() {
    let p1 = Brain::new_random(&LAYER_SIZES, 0.1, 1);
    let p2 = Brain::new_random(&LAYER_SIZES, 0.1, 2);

    let a = Brain::crossover(&p1, &p2, 7);
    let b = Brain::crossover(&p1, &p2, 7);
    let c = Brain::crossover(&p1, &p2, 8);

    assert!(brains_equal(&a, &b));
    assert!(!brains_equal(&a, &c));
}

#[test]
fn test_crossover_of_incompatible_shapes_clones_first_parent() {
    let p1 = Brain::new_random(&LAYER_SIZES, 0.1, 1);
    let p2 = Brain::new_random(&[SENSOR_COUNT, 5, ACTION_COUNT], 0.1, 2);

    let child = Brain::crossover(&p1, &p2, 7);

    assert!(brains_equal(&child, &p1));
}
