use std::sync::Arc;

use super::common::*;
use crate::underwriting::artifacts::{ArtifactKind, ResourceError, ResourceLoader};

#[test]
fn initialize_reads_each_artifact_once() {
    let loader = ResourceLoader::new(MemorySource::complete());
    assert!(!loader.is_initialized());

    let first = loader.initialize().expect("artifacts load");
    let second = loader.initialize().expect("cached handles");

    assert!(Arc::ptr_eq(&first, &second));
    assert!(loader.is_initialized());
    assert_eq!(first.schema().width(), TRAINING_COLUMNS.len());
}

#[test]
fn second_initialize_does_not_touch_storage() {
    let loader = ResourceLoader::new(MemorySource::complete());

    loader.initialize().expect("artifacts load");
    let after_first = loader.source().reads();
    loader.initialize().expect("cached handles");

    assert_eq!(after_first, ArtifactKind::ALL.len());
    assert_eq!(loader.source().reads(), after_first);
}

#[test]
fn concurrent_first_calls_share_a_single_load() {
    let loader = ResourceLoader::new(MemorySource::complete());

    let handles: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| loader.initialize().expect("artifacts load")))
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("worker finishes"))
            .collect()
    });

    assert_eq!(loader.source().reads(), ArtifactKind::ALL.len());
    assert!(handles
        .windows(2)
        .all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn missing_artifact_is_unavailable() {
    let loader =
        ResourceLoader::new(MemorySource::complete().without(ArtifactKind::Classifier));

    let error = loader.initialize().expect_err("classifier missing");

    match error {
        ResourceError::Unavailable {
            artifact, location, ..
        } => {
            assert_eq!(artifact, ArtifactKind::Classifier);
            assert_eq!(location, "memory://classifier");
        }
        other => panic!("expected unavailable artifact, got {other:?}"),
    }
    assert!(!loader.is_initialized());
}

#[test]
fn corrupt_artifact_is_unavailable() {
    let loader = ResourceLoader::new(
        MemorySource::complete().with(ArtifactKind::Scaler, b"{\"kind\":\"standard\"".to_vec()),
    );

    assert!(matches!(
        loader.initialize(),
        Err(ResourceError::Unavailable {
            artifact: ArtifactKind::Scaler,
            ..
        })
    ));
}

#[test]
fn duplicate_schema_columns_are_rejected() {
    let loader = ResourceLoader::new(
        MemorySource::complete().with(ArtifactKind::TrainingSchema, br#"["Age","Age"]"#.to_vec()),
    );

    let error = loader.initialize().expect_err("duplicate column");

    assert!(error.to_string().contains("Age"));
}

#[test]
fn classifier_width_must_match_schema() {
    let narrow = classifier_artifact(crate::underwriting::artifacts::LogisticRegression {
        coefficients: vec![0.0; 10],
        intercept: 0.0,
    });
    let loader = ResourceLoader::new(MemorySource::complete().with(
        ArtifactKind::Classifier,
        serde_json::to_vec(&narrow).expect("classifier serializes"),
    ));

    assert!(matches!(
        loader.initialize(),
        Err(ResourceError::WidthMismatch {
            artifact: ArtifactKind::Classifier,
            expected: 25,
            found: 10,
        })
    ));
}

#[test]
fn failed_load_can_be_retried() {
    let loader = ResourceLoader::new(MemorySource::complete().without(ArtifactKind::Scaler));

    assert!(loader.initialize().is_err());
    assert!(loader.initialize().is_err());

    assert_eq!(loader.source().reads(), 4);
}
