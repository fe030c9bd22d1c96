//! Prediction evaluation against ground truth

use crate::driver::RowResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Accuracy summary for one (trait, model) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitEvaluation {
    /// Trait name
    pub trait_name: String,
    /// Model name
    pub model: String,
    /// Rows with a ground truth value for this trait
    pub rows_with_truth: usize,
    /// Of those, rows with a resolved prediction
    pub resolved: usize,
    /// `resolved / rows_with_truth`
    pub coverage: f64,
    /// Mean absolute error over resolved rows
    pub mean_absolute_error: Option<f64>,
    /// Share of rows with truth predicted within the relative tolerance
    pub within_tolerance: f64,
}

impl fmt::Display for TraitEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: {} rows, coverage {:.1}%, within tolerance {:.1}%",
            self.trait_name,
            self.model,
            self.rows_with_truth,
            self.coverage * 100.0,
            self.within_tolerance * 100.0,
        )?;
        if let Some(mae) = self.mean_absolute_error {
            write!(f, ", MAE {mae:.4}")?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Tally {
    rows_with_truth: usize,
    resolved: usize,
    within: usize,
    abs_error_sum: f64,
}

/// Summarize predictions of successful rows against their ground truth
///
/// Unresolved predictions count against coverage and tolerance accuracy but
/// not against the mean absolute error.
#[must_use]
pub fn evaluate(rows: &[RowResult], tolerance: f64) -> Vec<TraitEvaluation> {
    let mut tallies: BTreeMap<(&str, &str), Tally> = BTreeMap::new();

    for row in rows.iter().filter(|r| !r.is_failed()) {
        for prediction in &row.predictions {
            let (Some(resolved), Some(&truth)) =
                (prediction.prediction, row.truth.get(&prediction.trait_name))
            else {
                continue;
            };

            let tally = tallies
                .entry((prediction.trait_name.as_str(), prediction.model.as_str()))
                .or_default();
            tally.rows_with_truth += 1;

            if let Some(value) = resolved.value() {
                let error = (value - truth).abs();
                tally.resolved += 1;
                tally.abs_error_sum += error;
                if error <= tolerance * truth.abs() {
                    tally.within += 1;
                }
            }
        }
    }

    tallies
        .into_iter()
        .map(|((trait_name, model), tally)| {
            let rows = tally.rows_with_truth as f64;
            TraitEvaluation {
                trait_name: trait_name.to_string(),
                model: model.to_string(),
                rows_with_truth: tally.rows_with_truth,
                resolved: tally.resolved,
                coverage: tally.resolved as f64 / rows,
                mean_absolute_error: (tally.resolved > 0)
                    .then(|| tally.abs_error_sum / tally.resolved as f64),
                within_tolerance: tally.within as f64 / rows,
            }
        })
        .collect()
}
