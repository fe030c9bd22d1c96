use async_trait::async_trait;
use mockall::mock;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use traitqa_core::{
    BatchDriver, DescriptionRow, NamedModel, QaAnswer, QaCapability, QaError, TraitQaConfig,
    NO_DESCRIPTION, NO_NUMBER,
};
use traitqa_test_utils::{fixture_rows, StubQa};
use traitqa_units::{NormalizedMeasurement, ResolvedValue};

mock! {
    pub Qa {}

    #[async_trait]
    impl QaCapability for Qa {
        async fn infer(&self, question: &str, context: &str) -> Result<QaAnswer, QaError>;
    }
}

#[tokio::test]
async fn sentinel_rows_skip_the_model() {
    let stub = Arc::new(StubQa::new("8-12 x 6-10 cm", 0.9));
    let driver = BatchDriver::new(
        &TraitQaConfig::new(),
        vec![NamedModel::new("stub", stub.clone())],
    )
    .unwrap();

    let report = driver.run(fixture_rows()).await.unwrap();
    assert_eq!(report.rows.len(), 4);

    let moss = &report.rows[1];
    let height = moss.prediction("height", "stub").unwrap();
    assert_eq!(height.answer, NO_NUMBER);
    assert_eq!(height.normalized, Some(NormalizedMeasurement::NoMetric));
    assert_eq!(height.prediction, Some(ResolvedValue::Unresolved));

    let blank = &report.rows[2];
    assert!(blank
        .predictions
        .iter()
        .all(|p| p.answer == NO_DESCRIPTION && p.score == 0.0));

    let fern = &report.rows[3];
    assert!(fern.prediction("height", "stub").unwrap().is_excluded());
    assert!(!fern.prediction("leaf_width", "stub").unwrap().is_excluded());

    // acer: 4 + 3 + 3 questions; fern: 3 + 3; moss and blank: none
    assert_eq!(stub.calls(), 16);
    assert_eq!(report.stats.excluded_pairs, 1);
}

#[tokio::test]
async fn evaluation_uses_ground_truth() {
    let stub = StubQa::new("8-12 x 6-10 cm", 0.9)
        .with_reply("What is the height of the plant?", "to 20 m", 0.95);
    let driver = BatchDriver::new(
        &TraitQaConfig::new(),
        vec![NamedModel::new("stub", Arc::new(stub))],
    )
    .unwrap();

    let report = driver.run(fixture_rows()).await.unwrap();
    let evaluations = report.evaluate(0.1);

    let by_trait = |name: &str| {
        evaluations
            .iter()
            .find(|e| e.trait_name == name)
            .unwrap()
            .clone()
    };

    let height = by_trait("height");
    // acer resolved exactly, moss unresolved
    assert_eq!(height.rows_with_truth, 2);
    assert_eq!(height.resolved, 1);
    assert_eq!(height.mean_absolute_error, Some(0.0));

    let width = by_trait("leaf_width");
    assert_eq!(width.rows_with_truth, 1);
    assert_eq!(width.within_tolerance, 1.0);
}

#[tokio::test]
async fn retryable_failures_are_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&attempts);

    let mut qa = MockQa::new();
    qa.expect_infer().returning(move |_, _| {
        if seen.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(QaError::Transport("connection reset".to_string()))
        } else {
            Ok(QaAnswer::new("1.8 m", 0.9))
        }
    });

    let mut config = TraitQaConfig::new()
        .with_retry_attempts(1)
        .with_traits(vec![traitqa_test_utils::height_questions()]);
    config.retry_backoff_ms = 1;

    let driver = BatchDriver::new(&config, vec![NamedModel::new("mock", Arc::new(qa))]).unwrap();
    let result = driver
        .process_row(0, DescriptionRow::new("r", Some("to 1.8 m")))
        .await;

    assert!(!result.is_failed());
    assert_eq!(
        result.prediction("height", "mock").unwrap().prediction,
        Some(ResolvedValue::Value(1.8))
    );
    // one failed call, then the full question set
    assert_eq!(attempts.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn permanent_failures_fail_the_row() {
    let mut qa = MockQa::new();
    qa.expect_infer()
        .times(1)
        .returning(|_, _| Err(QaError::InvalidResponse("missing score".to_string())));

    let config = TraitQaConfig::new()
        .with_retry_attempts(3)
        .with_traits(vec![traitqa_test_utils::height_questions()]);
    let driver = BatchDriver::new(&config, vec![NamedModel::new("mock", Arc::new(qa))]).unwrap();

    let result = driver
        .process_row(0, DescriptionRow::new("r", Some("to 1.8 m")))
        .await;

    assert!(result.is_failed());
    assert!(result.error.unwrap().contains("missing score"));
}

#[tokio::test]
async fn multiple_models_produce_separate_fields() {
    let config = TraitQaConfig::new().with_traits(vec![traitqa_test_utils::height_questions()]);
    let driver = BatchDriver::new(
        &config,
        vec![
            NamedModel::new("a", Arc::new(StubQa::new("2 m", 0.5))),
            NamedModel::new("b", Arc::new(StubQa::new("150 cm", 0.5))),
        ],
    )
    .unwrap();

    let result = driver
        .process_row(0, DescriptionRow::new("r", Some("1.5-2 m")))
        .await;

    assert_eq!(result.predictions.len(), 2);
    assert_eq!(
        result.prediction("height", "a").unwrap().prediction,
        Some(ResolvedValue::Value(2.0))
    );
    assert_eq!(
        result.prediction("height", "b").unwrap().prediction,
        Some(ResolvedValue::Value(1.5))
    );
}

#[test]
fn config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "max_concurrent_rows = 2\n\n[[models]]\nname = \"qa\"\nendpoint = \"http://localhost:9000/qa\""
    )
    .unwrap();

    let config = TraitQaConfig::load(file.path()).unwrap();
    assert_eq!(config.max_concurrent_rows, 2);
    assert_eq!(config.models[0].name, "qa");

    let missing = file.path().with_extension("missing.toml");
    assert_eq!(
        TraitQaConfig::load_or_default(&missing).unwrap(),
        TraitQaConfig::default()
    );
}
