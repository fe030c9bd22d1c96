use async_trait::async_trait;
use mockall::mock;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use traitqa_core::{
    BestAnswerSelector, QaAnswer, QaCapability, QaError, SelectedAnswer, TraitQuestionSet,
    NO_NUMBER,
};
use traitqa_test_utils::{height_questions, StubQa};
use traitqa_units::TraitKind;

mock! {
    pub Qa {}

    #[async_trait]
    impl QaCapability for Qa {
        async fn infer(&self, question: &str, context: &str) -> Result<QaAnswer, QaError>;
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_no_digit_never_calls_model(
        description in "[^0-9]{1,80}",
        questions in proptest::collection::vec("[a-z ]{1,20}\\?", 1..5),
    ) {
        let set = TraitQuestionSet::new("height", TraitKind::Height, questions).unwrap();
        let selector = BestAnswerSelector::new(StubQa::new("2 m", 0.9));

        let selected = runtime()
            .block_on(selector.select(&set, Some(&description)))
            .unwrap();

        if description.trim().is_empty() {
            prop_assert_eq!(&selected, &SelectedAnswer::no_description());
        } else {
            prop_assert_eq!(selected.answer.as_str(), NO_NUMBER);
        }
        prop_assert_eq!(selected.score, 0.0);
        prop_assert_eq!(selector.capability().calls(), 0);
    }
}

#[tokio::test]
async fn asks_every_question_once_in_order() {
    let stub = StubQa::new("1 m", 0.1)
        .with_reply("How tall is the plant?", "up to 3 m", 0.87654);
    let selector = BestAnswerSelector::new(stub);
    let set = height_questions();

    let selected = selector.select(&set, Some("Herb 1-3 m tall.")).await.unwrap();

    assert_eq!(
        selected,
        SelectedAnswer {
            question: "How tall is the plant?".to_string(),
            answer: "up to 3 m".to_string(),
            score: 0.877,
        }
    );

    let asked: Vec<String> = selector
        .capability()
        .asked()
        .into_iter()
        .map(|(question, _)| question)
        .collect();
    assert_eq!(asked, set.questions().to_vec());
}

#[tokio::test]
async fn description_is_passed_as_context() {
    let mut qa = MockQa::new();
    qa.expect_infer()
        .withf(|_, context| context == "Leaves 4 cm long.")
        .times(3)
        .returning(|_, _| Ok(QaAnswer::new("4 cm", 0.7)));

    let selector = BestAnswerSelector::new(qa);
    let set = TraitQuestionSet::default_for(TraitKind::LeafLength);

    let selected = selector.select(&set, Some("Leaves 4 cm long.")).await.unwrap();
    assert_eq!(selected.question, set.questions()[0]);
}

#[tokio::test]
async fn failure_stops_selection() {
    let mut qa = MockQa::new();
    qa.expect_infer()
        .times(1)
        .returning(|_, _| Err(QaError::Timeout { secs: 30 }));

    let selector = BestAnswerSelector::new(qa);
    let result = selector.select(&height_questions(), Some("2 m")).await;

    assert_eq!(result, Err(QaError::Timeout { secs: 30 }));
}
