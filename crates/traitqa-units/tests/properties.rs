use proptest::prelude::*;
use traitqa_units::{NormalizedMeasurement, Unit};

fn any_unit() -> impl Strategy<Value = Unit> {
    proptest::sample::select(Unit::DETECTION_ORDER.to_vec())
}

/// Re-case `symbol` one character at a time
fn recase(symbol: &str, upper: &[bool]) -> String {
    symbol
        .chars()
        .zip(upper.iter().cycle())
        .map(|(c, &up)| if up { c.to_ascii_uppercase() } else { c })
        .collect()
}

proptest! {
    #[test]
    fn prop_detect_finds_symbol_through_punctuation_and_case(
        unit in any_unit(),
        upper in proptest::collection::vec(any::<bool>(), 1..8),
        before in "[(\\[\"',.;:!?]{0,3}",
        after in "[)\\]\"',.;:!?]{0,3}",
        value in 1u32..1000,
    ) {
        let text = format!("to {value} {before}{}{after} tall", recase(unit.symbol(), &upper));
        prop_assert_eq!(Unit::detect(&text), Some(unit));
    }

    #[test]
    fn prop_symbol_round_trips(unit in any_unit()) {
        prop_assert_eq!(unit.symbol().parse::<Unit>().unwrap(), unit);
        prop_assert_eq!(unit.to_string().to_uppercase().parse::<Unit>().unwrap(), unit);
    }

    #[test]
    fn prop_conversion_round_trips(from in any_unit(), to in any_unit()) {
        let there_and_back = from.factor_to(to) * to.factor_to(from);
        prop_assert!((there_and_back - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prop_measurement_text_round_trips(a in 0.0f64..1e6, b in 0.0f64..1e6) {
        for measurement in [NormalizedMeasurement::Single(a), NormalizedMeasurement::Range(a, b)] {
            let parsed: NormalizedMeasurement = measurement.to_string().parse().unwrap();
            prop_assert_eq!(parsed, measurement);
        }
    }
}
