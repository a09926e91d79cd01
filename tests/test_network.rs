//! Integration tests for HopfieldNetwork.
//!
//! Tests the network lifecycle end to end:
//! - Training and its failure modes
//! - Running against trained weights
//! - Save/load of learned state
//! - Training from a directory of PNG images

use hopfield::{
    BipolarVector, CancelToken, EventRecorder, HopfieldConfig, HopfieldError, HopfieldNetwork,
    NetworkState, NullObserver, PatternCodec, Result, RunMode,
};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hopfield_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn letter_patterns() -> Vec<BipolarVector> {
    // 4x4 "L", "T" and "O"
    let l = [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 1];
    let t = [1, 1, 1, 1, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0];
    let o = [1, 1, 1, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 1, 1, 1];
    [l, t, o]
        .iter()
        .map(|bits| BipolarVector::from_bools(bits.iter().map(|&b| b == 1)))
        .collect()
}

#[test]
fn test_network_new_is_untrained() {
    let net = HopfieldNetwork::new(16);
    assert_eq!(net.num_neurons(), 16);
    assert!(!net.is_trained());
    assert!(matches!(net.weights(), Err(HopfieldError::NotTrained)));
    assert!(matches!(net.num_patterns(), Err(HopfieldError::NotTrained)));
}

#[test]
fn test_run_untrained_fails() {
    let mut net = HopfieldNetwork::new(16);
    let probe = BipolarVector::filled(16, 1);
    let result = net.run(&probe, &mut NullObserver, &CancelToken::new());
    assert!(matches!(result, Err(HopfieldError::NotTrained)));
}

#[test]
fn test_train_empty_fails() {
    let mut net = HopfieldNetwork::new(16);
    assert!(matches!(
        net.train(&[]),
        Err(HopfieldError::EmptyTrainingSet)
    ));
    assert!(!net.is_trained());
}

#[test]
fn test_failed_train_clears_previous_model() {
    let mut net = HopfieldNetwork::new(16);
    net.train(&letter_patterns()).unwrap();
    assert!(net.is_trained());

    let bad = vec![BipolarVector::filled(16, 1), BipolarVector::filled(9, 1)];
    assert!(matches!(
        net.train(&bad),
        Err(HopfieldError::DimensionMismatch { expected: 16, actual: 9 })
    ));
    assert!(!net.is_trained());
}

#[test]
fn test_train_rejects_patterns_of_other_size() {
    let mut net = HopfieldNetwork::new(16);
    net.train(&letter_patterns()).unwrap();

    // Consistent among themselves, but not 16 neurons long
    let nine = vec![BipolarVector::filled(9, 1), BipolarVector::filled(9, -1)];
    assert!(matches!(
        net.train(&nine),
        Err(HopfieldError::DimensionMismatch { expected: 16, actual: 9 })
    ));
    assert!(!net.is_trained());
}

#[test]
fn test_retrain_replaces_weights() -> Result<()> {
    let patterns = letter_patterns();
    let mut net = HopfieldNetwork::new(16);

    net.train(&patterns)?;
    assert_eq!(net.num_patterns()?, 3);

    net.train(&patterns[..1])?;
    assert_eq!(net.num_patterns()?, 1);
    Ok(())
}

#[test]
fn test_trained_weights_are_symmetric() -> Result<()> {
    let mut net = HopfieldNetwork::new(16);
    net.train(&letter_patterns())?;

    let w = net.weights()?;
    assert!(w.is_symmetric());
    assert!(w.has_zero_diagonal());
    assert_eq!(net.threshold()?.len(), 16);
    Ok(())
}

#[test]
fn test_probe_length_mismatch() {
    let mut net = HopfieldNetwork::new(16);
    net.train(&letter_patterns()).unwrap();

    let probe = BipolarVector::filled(15, -1);
    assert!(matches!(
        net.run(&probe, &mut NullObserver, &CancelToken::new()),
        Err(HopfieldError::DimensionMismatch { expected: 16, actual: 15 })
    ));
    assert!(matches!(
        net.energy_of(&probe),
        Err(HopfieldError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_run_uses_configured_mode() -> Result<()> {
    let patterns = letter_patterns();
    let config = HopfieldConfig::new(4, 4).with_mode(RunMode::Instant);
    let mut net = HopfieldNetwork::with_config(config)?;
    net.train(&patterns)?;

    let mut recorder = EventRecorder::new();
    let outcome = net.run(&patterns[0], &mut recorder, &CancelToken::new())?;

    assert!(outcome.converged);
    // Instant mode never reports individual flips
    assert!(recorder.flips().is_empty());
    assert_eq!(recorder.terminations().len(), 1);
    Ok(())
}

#[test]
fn test_energy_of_matches_run_start() -> Result<()> {
    let patterns = letter_patterns();
    let mut net = HopfieldNetwork::new(16);
    net.train(&patterns)?;

    let probe = BipolarVector::filled(16, 1);
    let run = net.start_run(&probe)?;
    assert_eq!(run.trajectory().initial(), net.energy_of(&probe)?);
    Ok(())
}

#[test]
fn test_set_config_keeps_weights() -> Result<()> {
    let mut net = HopfieldNetwork::with_config(HopfieldConfig::new(4, 4))?;
    net.train(&letter_patterns())?;

    net.set_config(HopfieldConfig::new(4, 4).with_snapshot_interval(3))?;
    assert!(net.is_trained());
    assert_eq!(net.config().snapshot_interval, 3);

    // Same neuron count in another shape is fine, a different count is not
    net.set_config(HopfieldConfig::new(2, 8))?;
    assert!(matches!(
        net.set_config(HopfieldConfig::new(5, 5)),
        Err(HopfieldError::DimensionMismatch { expected: 16, actual: 25 })
    ));
    Ok(())
}

#[test]
fn test_with_config_rejects_zero_size() {
    assert!(matches!(
        HopfieldNetwork::with_config(HopfieldConfig::new(0, 4)),
        Err(HopfieldError::InvalidParameter(_))
    ));
}

#[test]
fn test_save_load_roundtrip() -> Result<()> {
    let patterns = letter_patterns();
    let mut net = HopfieldNetwork::with_config(HopfieldConfig::new(4, 4))?;
    net.train(&patterns)?;

    let dir = scratch_dir("save_load");
    let path = dir.join("model.bin");
    net.save(&path)?;

    let mut loaded = HopfieldNetwork::load(&path)?;
    assert!(loaded.is_trained());
    assert_eq!(loaded.num_patterns()?, 3);
    assert_eq!(loaded.weights()?, net.weights()?);
    assert_eq!(loaded.threshold()?, net.threshold()?);

    let mut probe = patterns[2].clone();
    probe.flip(5);
    let a = net.run(&probe, &mut NullObserver, &CancelToken::new())?;
    let b = loaded.run(&probe, &mut NullObserver, &CancelToken::new())?;
    assert_eq!(a, b);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_save_untrained_fails() {
    let net = HopfieldNetwork::new(4);
    let path = std::env::temp_dir().join("hopfield_never_written.bin");
    assert!(matches!(net.save(&path), Err(HopfieldError::NotTrained)));
}

#[test]
fn test_state_json_roundtrip() -> Result<()> {
    let mut net = HopfieldNetwork::new(16);
    net.train(&letter_patterns())?;

    let state = net.to_state()?.with_metadata("corpus", "letters");
    let restored = NetworkState::from_json(&state.to_json()?)?;
    assert_eq!(restored, state);
    assert_eq!(restored.metadata.get("corpus").map(String::as_str), Some("letters"));

    let rebuilt = HopfieldNetwork::from_state(&restored)?;
    assert_eq!(rebuilt.weights()?, net.weights()?);
    Ok(())
}

#[test]
fn test_from_state_rejects_asymmetric_weights() -> Result<()> {
    let mut net = HopfieldNetwork::new(4);
    net.train(&[BipolarVector::from_values(&[1, -1, 1, -1])?])?;

    let mut json: serde_json::Value = serde_json::from_str(&net.to_state()?.to_json()?)
        .map_err(|e| HopfieldError::Other(e.to_string()))?;
    json["weights"]["values"][1] = serde_json::json!(0.5);
    let tampered = NetworkState::from_json(&json.to_string())?;

    assert!(matches!(
        HopfieldNetwork::from_state(&tampered),
        Err(HopfieldError::InvalidParameter(_))
    ));
    Ok(())
}

#[test]
fn test_load_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("hopfield_does_not_exist.bin");
    assert!(matches!(
        HopfieldNetwork::load(&path),
        Err(HopfieldError::Io(_))
    ));
}

#[test]
fn test_train_from_dir_and_recall() -> Result<()> {
    let patterns = letter_patterns();
    let codec = PatternCodec::new(4, 4);
    let dir = scratch_dir("corpus");
    for (k, p) in patterns.iter().enumerate() {
        codec.save_png(dir.join(format!("{}.png", k)), p)?;
    }
    std::fs::write(dir.join("README.txt"), "not an image")?;

    let mut net = HopfieldNetwork::with_config(HopfieldConfig::new(4, 4))?;
    net.train_from_dir(&dir)?;
    assert_eq!(net.num_patterns()?, 3);

    let outcome = net.run(&patterns[0], &mut NullObserver, &CancelToken::new())?;
    assert!(outcome.converged);
    assert!(outcome.trajectory.is_non_increasing());

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_train_from_empty_dir_fails() {
    let dir = scratch_dir("empty_corpus");
    let mut net = HopfieldNetwork::with_config(HopfieldConfig::new(4, 4)).unwrap();

    assert!(matches!(
        net.train_from_dir(&dir),
        Err(HopfieldError::EmptyTrainingSet)
    ));
    assert!(!net.is_trained());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_memory_usage_grows_with_training() {
    let mut net = HopfieldNetwork::new(16);
    let before = net.memory_usage();
    net.train(&letter_patterns()).unwrap();
    assert!(net.memory_usage() >= before + 16 * 16 * std::mem::size_of::<f64>());
}
