#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use formicary::simulation::model::ModelFile;
use formicary::simulation::params::Params;
use formicary::simulation::sim::{Command, Simulation};
use std::fs;

fn create_test_params() -> Params {
    Params {
        world_width: 300.0,
        world_height: 300.0,
        population_size: 6,
        generation_length: 25,
        hidden_layers: vec![8],
        initial_food_sources: 3,
        ..Params::default()
    }
}

#[test]
fn test_save_and_load_roundtrip() {
    let params = create_test_params();
    let mut sim = Simulation::new(params.clone(), 1).expect("valid config");

    // Run past one generation so a best-ever genome exists.
    for _ in 0..30 {
        sim.advance(0.05);
    }

    let save_path = "test_model_roundtrip.json";
    sim.save_model_to(save_path).expect("save should succeed");

    let model = ModelFile::load_from_file(save_path).expect("load should succeed");
    assert_eq!(model.version, ModelFile::FORMAT_VERSION);
    assert_eq!(model.generation, sim.generation());
    assert_eq!(model.genomes.len(), params.population_size);
    assert!(model.best_ever.is_some());
    assert_eq!(model.hyper.generation_length, params.generation_length);

    // Loading into a fresh simulation restores generation and best fitness.
    let mut fresh = Simulation::new(params.clone(), 99).expect("valid config");
    fresh.load_model_from(save_path).expect("compatible model");
    assert_eq!(fresh.generation(), sim.generation());
    assert_eq!(fresh.stats().best_fitness, sim.stats().best_fitness);
    assert_eq!(fresh.stats().population, params.population_size);

    fs::remove_file(save_path).ok();
}

#[test]
fn test_loaded_population_keeps_genome_weights() {
    let params = create_test_params();
    let sim = Simulation::new(params.clone(), 2).expect("valid config");

    let model = sim.save_model();
    let mut fresh = Simulation::new(params, 55).expect("valid config");
    fresh.load_model(model.clone()).expect("compatible model");

    for (agent, genome) in fresh.colony().agents.iter().zip(&model.genomes) {
        for (loaded, saved) in agent.brain.layers.iter().zip(&genome.layers) {
            assert_eq!(loaded.weights, saved.weights);
            assert_eq!(loaded.biases, saved.biases);
        }
    }
}

#[test]
fn test_load_nonexistent_file_fails() {
    assert!(ModelFile::load_from_file("no_such_model_file.json").is_err());
}

#[test]
fn test_load_invalid_json_fails() {
    let invalid_path = "test_model_invalid.json";
    fs::write(invalid_path, "{ this is not valid json }").expect("write test file");

    assert!(ModelFile::load_from_file(invalid_path).is_err());

    fs::remove_file(invalid_path).ok();
}

#[test]
fn test_unknown_format_version_fails() {
    let params = create_test_params();
    let sim = Simulation::new(params, 3).expect("valid config");

    let model = ModelFile {
        version: 99,
        ..sim.save_model()
    };
    let versioned_path = "test_model_version.json";
    model.save_to_file(versioned_path).expect("save should succeed");

    assert!(ModelFile::load_from_file(versioned_path).is_err());

    fs::remove_file(versioned_path).ok();
}

#[test]
fn test_incompatible_shapes_leave_state_unchanged() {
    let params_a = create_test_params();
    let sim_a = Simulation::new(params_a, 4).expect("valid config");
    let model = sim_a.save_model();

    let params_b = Params {
        hidden_layers: vec![6],
        ..create_test_params()
    };
    let mut sim_b = Simulation::new(params_b, 5).expect("valid config");
    for _ in 0..10 {
        sim_b.advance(0.05);
    }

    let stats_before = sim_b.stats();
    let positions_before: Vec<_> = sim_b.agents().iter().map(|s| (s.id, s.x, s.y)).collect();

    assert!(sim_b.load_model(model).is_err(), "shape mismatch must fail");

    let stats_after = sim_b.stats();
    assert_eq!(stats_after.population, stats_before.population);
    assert_eq!(stats_after.generation, stats_before.generation);
    assert_eq!(stats_after.food_stored, stats_before.food_stored);
    let positions_after: Vec<_> = sim_b.agents().iter().map(|s| (s.id, s.x, s.y)).collect();
    assert_eq!(positions_before, positions_after);
}

#[test]
fn test_model_without_genomes_is_rejected() {
    let params = create_test_params();
    let sim = Simulation::new(params.clone(), 6).expect("valid config");

    let model = ModelFile {
        genomes: Vec::new(),
        ..sim.save_model()
    };

    let mut target = Simulation::new(params, 7).expect("valid config");
    assert!(target.load_model(model).is_err());
}

#[test]
fn test_resumed_training_is_deterministic_from_load() {
    let params = create_test_params();
    let source = Simulation::new(params.clone(), 8).expect("valid config");
    let model = source.save_model();

    let mut a = Simulation::new(params.clone(), 42).expect("valid config");
    let mut b = Simulation::new(params, 42).expect("valid config");
    a.load_model(model.clone()).expect("compatible model");
    b.load_model(model).expect("compatible model");

    for _ in 0..60 {
        a.advance(0.05);
        b.advance(0.05);
    }

    for (sa, sb) in a.agents().iter().zip(&b.agents()) {
        assert_eq!(sa.x, sb.x);
        assert_eq!(sa.y, sb.y);
    }
    assert_eq!(a.stats().best_fitness, b.stats().best_fitness);
    assert_eq!(a.generation(), b.generation());
}

#[test]
fn test_force_evolve_after_load_restores_population_size() {
    let params = create_test_params();
    let mut sim = Simulation::new(params.clone(), 9).expect("valid config");
    let model = sim.save_model();

    sim.load_model(model).expect("compatible model");
    sim.push_command(Command::ForceEvolve);
    sim.advance(0.05);

    assert_eq!(sim.stats().population, params.population_size);
    assert_eq!(sim.generation(), 1);
}
