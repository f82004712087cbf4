//! K-fold cross-validation with mean aggregation.

use core::ops::ControlFlow;

use crate::config::Configuration;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::evaluate::{EvalStrategy, EvaluationResult, check_step};
use crate::model::{Model, ModelBuilder};
use crate::objective::Objective;

/// Scores each candidate by k-fold cross-validation.
///
/// Row indices are shuffled once with a fixed seed, then split into `k`
/// near-equal folds (the remainder is spread over the first folds). Each
/// fold is scored by a model trained on the other `k - 1` folds; the
/// trial's objective is the arithmetic mean of the fold scores. Per-fold
/// scores and their standard deviation are reported as auxiliary metrics
/// (`fold_0` … `fold_{k-1}`, `score_std`).
///
/// No artifact is retained, since every fold model is a partial fit. Use the
/// orchestrator's refit option for a deployable model.
///
/// # Examples
///
/// ```
/// use tuner::evaluate::KFold;
///
/// let strategy = KFold::new(5, 42);
/// assert_eq!(strategy.k(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct KFold {
    k: usize,
    shuffle_seed: u64,
}

impl KFold {
    /// Creates a k-fold strategy with a fixed shuffle seed.
    #[must_use]
    pub fn new(k: usize, shuffle_seed: u64) -> Self {
        Self { k, shuffle_seed }
    }

    /// Returns the fold count.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Generates `(train_indices, test_indices)` pairs for `rows` rows.
    ///
    /// The shuffle is seeded, so the same strategy always partitions the
    /// same row count identically.
    pub(crate) fn splits(&self, rows: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.k < 2 {
            return Err(Error::Configuration(format!(
                "k-fold cross-validation requires at least 2 folds, got {}",
                self.k
            )));
        }
        if rows < self.k {
            return Err(Error::InsufficientData {
                rows,
                folds: self.k,
            });
        }

        let mut indices: Vec<usize> = (0..rows).collect();
        let mut rng = fastrand::Rng::with_seed(self.shuffle_seed);
        rng.shuffle(&mut indices);

        let fold_size = rows / self.k;
        let remainder = rows % self.k;

        let mut result = Vec::with_capacity(self.k);
        let mut start = 0;
        for i in 0..self.k {
            // Spread the remainder across the first folds
            let size = if i < remainder { fold_size + 1 } else { fold_size };
            let end = start + size;

            let test = indices[start..end].to_vec();
            let mut train = Vec::with_capacity(rows - size);
            train.extend_from_slice(&indices[..start]);
            train.extend_from_slice(&indices[end..]);

            result.push((train, test));
            start = end;
        }
        Ok(result)
    }
}

impl<X: Clone, Y: Clone> EvalStrategy<X, Y> for KFold {
    #[allow(clippy::cast_precision_loss)]
    fn evaluate<B: ModelBuilder<X, Y>>(
        &self,
        builder: &B,
        config: &Configuration,
        train: &Dataset<X, Y>,
        objective: &Objective,
    ) -> Result<EvaluationResult<B::Model>> {
        let splits = self.splits(train.len())?;

        let mut fold_scores = Vec::with_capacity(splits.len());
        for (train_indices, test_indices) in &splits {
            let fit_split = train.subset(train_indices);
            let held_out = train.subset(test_indices);

            let mut model = match check_step(builder.build(config), objective)? {
                ControlFlow::Continue(model) => model,
                ControlFlow::Break(failed) => return Ok(failed),
            };
            match check_step(model.fit(fit_split.inputs(), fit_split.targets()), objective)? {
                ControlFlow::Continue(()) => {}
                ControlFlow::Break(failed) => return Ok(failed),
            }
            let score = match check_step(
                model.score(held_out.inputs(), held_out.targets()),
                objective,
            )? {
                ControlFlow::Continue(score) => score,
                ControlFlow::Break(failed) => return Ok(failed),
            };
            fold_scores.push(score);
        }

        let n = fold_scores.len() as f64;
        let mean = fold_scores.iter().sum::<f64>() / n;
        let variance = fold_scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        let mut result = EvaluationResult::scored(objective, mean);
        for (i, score) in fold_scores.iter().enumerate() {
            result.metrics.insert(format!("fold_{i}"), *score);
        }
        result.metrics.insert("score_std".to_string(), variance.sqrt());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrainError;

    #[test]
    fn splits_partition_all_rows_exactly_once() {
        let strategy = KFold::new(5, 42);
        let splits = strategy.splits(100).unwrap();
        assert_eq!(splits.len(), 5);

        let mut all_test: Vec<usize> = Vec::new();
        for (train, test) in &splits {
            assert_eq!(test.len(), 20);
            assert_eq!(train.len(), 80);
            for index in test {
                assert!(!train.contains(index));
            }
            all_test.extend_from_slice(test);
        }
        all_test.sort_unstable();
        assert_eq!(all_test, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn splits_spread_the_remainder_over_the_first_folds() {
        let strategy = KFold::new(3, 0);
        let splits = strategy.splits(10).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|(_, test)| test.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn splits_are_reproducible_for_the_same_seed() {
        assert_eq!(
            KFold::new(5, 42).splits(20).unwrap(),
            KFold::new(5, 42).splits(20).unwrap()
        );
        assert_ne!(
            KFold::new(5, 42).splits(20).unwrap(),
            KFold::new(5, 43).splits(20).unwrap()
        );
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        let strategy = KFold::new(5, 42);
        assert!(matches!(
            strategy.splits(4),
            Err(Error::InsufficientData { rows: 4, folds: 5 })
        ));
    }

    #[test]
    fn fewer_than_two_folds_is_rejected() {
        assert!(matches!(
            KFold::new(1, 42).splits(10),
            Err(Error::Configuration(_))
        ));
    }

    /// Scores each fold by the mean of the held-out targets, so the
    /// aggregate objective is checkable by hand.
    struct FoldProbe;

    impl Model<usize, f64> for FoldProbe {
        fn fit(&mut self, _inputs: &[usize], _targets: &[f64]) -> core::result::Result<(), TrainError> {
            Ok(())
        }

        fn predict(&self, inputs: &[usize]) -> Vec<f64> {
            vec![0.0; inputs.len()]
        }

        #[allow(clippy::cast_precision_loss)]
        fn score(&self, _inputs: &[usize], targets: &[f64]) -> core::result::Result<f64, TrainError> {
            Ok(targets.iter().sum::<f64>() / targets.len() as f64)
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn objective_is_the_mean_of_fold_scores() {
        let rows = 100;
        let inputs: Vec<usize> = (0..rows).collect();
        let targets: Vec<f64> = (0..rows).map(|i| i as f64).collect();
        let data = Dataset::new(inputs, targets).unwrap();

        let strategy = KFold::new(5, 42);
        let objective = Objective::maximize("fold_mean");
        let builder =
            |_config: &Configuration| -> core::result::Result<FoldProbe, TrainError> { Ok(FoldProbe) };

        let result = strategy
            .evaluate(&builder, &Configuration::new(), &data, &objective)
            .unwrap();

        // Every row appears in exactly one held-out fold, so the mean of
        // the five fold means equals the global mean of 0..100.
        let expected = (0..rows).map(|i| i as f64).sum::<f64>() / rows as f64;
        assert!((result.objective - expected).abs() < 1e-9);

        assert_eq!(result.metrics.len(), 6);
        let fold_mean = (0..5)
            .map(|i| result.metrics[&format!("fold_{i}")])
            .sum::<f64>()
            / 5.0;
        assert!((fold_mean - result.objective).abs() < 1e-9);
        assert!(result.metrics.contains_key("score_std"));
        assert!(result.model.is_none());
    }

    #[test]
    fn numeric_failure_in_any_fold_becomes_a_sentinel_result() {
        struct Brittle;
        impl Model<usize, f64> for Brittle {
            fn fit(&mut self, inputs: &[usize], _targets: &[f64]) -> core::result::Result<(), TrainError> {
                // Fails whenever row 0 is part of the training split.
                if inputs.contains(&0) {
                    return Err(TrainError::Numeric("diverged".into()));
                }
                Ok(())
            }
            fn predict(&self, inputs: &[usize]) -> Vec<f64> {
                vec![0.0; inputs.len()]
            }
            fn score(&self, _inputs: &[usize], _targets: &[f64]) -> core::result::Result<f64, TrainError> {
                Ok(0.0)
            }
        }

        let data = Dataset::new((0..10).collect(), vec![0.0; 10]).unwrap();
        let strategy = KFold::new(5, 42);
        let objective = Objective::minimize("loss");
        let builder =
            |_config: &Configuration| -> core::result::Result<Brittle, TrainError> { Ok(Brittle) };

        let result = strategy
            .evaluate(&builder, &Configuration::new(), &data, &objective)
            .unwrap();
        assert!(result.is_failed());
        assert_eq!(result.objective, f64::INFINITY);
    }
}
