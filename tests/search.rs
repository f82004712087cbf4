//! End-to-end tests for the search engine.

use tuner::prelude::*;

/// A model whose score is a deterministic function of its configuration:
/// highest at depth = 2 with optimizer "adam" and rate near 0.1.
struct Synthetic {
    depth: i64,
    rate: f64,
    optimizer: String,
    fitted: bool,
}

impl Synthetic {
    fn from_config(config: &Configuration) -> Result<Self, TrainError> {
        Ok(Self {
            depth: config.get_int("depth")?,
            rate: config.get_float("rate").unwrap_or(0.1),
            optimizer: config
                .get_str("optimizer")
                .unwrap_or("adam")
                .to_string(),
            fitted: false,
        })
    }
}

impl Model<f64, f64> for Synthetic {
    fn fit(&mut self, _inputs: &[f64], _targets: &[f64]) -> Result<(), TrainError> {
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, inputs: &[f64]) -> Vec<f64> {
        vec![0.0; inputs.len()]
    }

    #[allow(clippy::cast_precision_loss)]
    fn score(&self, _inputs: &[f64], _targets: &[f64]) -> Result<f64, TrainError> {
        let depth_penalty = 0.1 * (self.depth - 2).pow(2) as f64;
        let rate_penalty = 0.05 * (self.rate.ln() - 0.1f64.ln()).powi(2);
        let optimizer_bonus = if self.optimizer == "adam" { 0.1 } else { 0.0 };
        Ok(1.0 + optimizer_bonus - depth_penalty - rate_penalty)
    }
}

fn synthetic_builder(config: &Configuration) -> Result<Synthetic, TrainError> {
    Synthetic::from_config(config)
}

fn tiny_data(rows: usize) -> Dataset<f64, f64> {
    Dataset::new(vec![0.0; rows], vec![0.0; rows]).unwrap()
}

fn depth_optimizer_space() -> SearchSpace {
    let mut space = SearchSpace::new();
    space.declare(ParamSpec::int("depth", 1, 3)).unwrap();
    space
        .declare(ParamSpec::categorical("optimizer", ["sgd", "adam"]))
        .unwrap();
    space
}

fn depth_rate_space() -> SearchSpace {
    let mut space = SearchSpace::new();
    space.declare(ParamSpec::int("depth", 1, 3)).unwrap();
    space
        .declare(ParamSpec::float("rate", 0.01, 1.0).log_scale())
        .unwrap();
    space
}

// =============================================================================
// Grid search over an enumerable space finds the known optimum
// =============================================================================

#[test]
fn grid_search_finds_the_known_best() {
    let space = depth_optimizer_space();
    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = GridGenerator::new(&space).unwrap();
    let strategy = Holdout::new(tiny_data(4));

    let summary = search
        .run(
            &mut generator,
            &synthetic_builder,
            &tiny_data(16),
            &strategy,
            &tracker,
        )
        .unwrap();

    assert_eq!(summary.status, SearchStatus::Completed);
    assert_eq!(summary.trials, 6);
    assert_eq!(tracker.len(), 6);

    let best = summary.best.unwrap();
    assert_eq!(best.config.get_int("depth").unwrap(), 2);
    assert_eq!(best.config.get_str("optimizer").unwrap(), "adam");
    assert!((best.result.objective - 1.1).abs() < 1e-9);
}

// =============================================================================
// Random search: non-enumerable space, seeded budgeted sampling
// =============================================================================

#[test]
fn float_ranges_reject_grid_but_allow_random_search() {
    let space = depth_rate_space();

    assert!(matches!(
        GridGenerator::new(&space),
        Err(Error::NotEnumerable { .. })
    ));

    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = RandomGenerator::new(space, 1, 5);
    let strategy = Holdout::new(tiny_data(4));

    let summary = search
        .run(
            &mut generator,
            &synthetic_builder,
            &tiny_data(16),
            &strategy,
            &tracker,
        )
        .unwrap();

    assert_eq!(summary.status, SearchStatus::Completed);
    assert_eq!(summary.trials, 5);

    for record in tracker.history() {
        assert!((1..=3).contains(&record.config.get_int("depth").unwrap()));
        let rate = record.config.get_float("rate").unwrap();
        assert!((0.01..=1.0).contains(&rate));
    }
}

#[test]
fn identical_seeds_reproduce_identical_histories() {
    let run_once = || {
        let search = Search::new(Objective::maximize("synthetic_score"));
        let tracker = TrialTracker::new(search.objective().direction());
        let mut generator = RandomGenerator::new(depth_rate_space(), 42, 8);
        let strategy = Holdout::new(tiny_data(4));
        search
            .run(
                &mut generator,
                &synthetic_builder,
                &tiny_data(16),
                &strategy,
                &tracker,
            )
            .unwrap();
        tracker
            .history()
            .into_iter()
            .map(|record| record.config)
            .collect::<Vec<_>>()
    };

    assert_eq!(run_once(), run_once());
}

// =============================================================================
// Edge cases: zero budget, empty space
// =============================================================================

#[test]
fn zero_budget_completes_with_empty_history() {
    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = RandomGenerator::new(depth_rate_space(), 7, 0);
    let strategy = Holdout::new(tiny_data(4));

    let summary = search
        .run(
            &mut generator,
            &synthetic_builder,
            &tiny_data(16),
            &strategy,
            &tracker,
        )
        .unwrap();

    assert_eq!(summary.status, SearchStatus::Completed);
    assert_eq!(summary.trials, 0);
    assert!(summary.best.is_none());
    assert!(tracker.is_empty());
    assert!(matches!(tracker.best(), Err(Error::NoTrials)));
}

#[test]
fn empty_space_runs_exactly_one_trial() {
    let builder = |_config: &Configuration| -> Result<Synthetic, TrainError> {
        Ok(Synthetic {
            depth: 2,
            rate: 0.1,
            optimizer: "adam".to_string(),
            fitted: false,
        })
    };

    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = RandomGenerator::new(SearchSpace::new(), 0, 10);
    let strategy = Holdout::new(tiny_data(4));

    let summary = search
        .run(&mut generator, &builder, &tiny_data(16), &strategy, &tracker)
        .unwrap();

    assert_eq!(summary.trials, 1);
    assert!(summary.best.unwrap().config.is_empty());
}

// =============================================================================
// Failure policy: sentinel trials vs aborting configuration errors
// =============================================================================

/// Fails numerically whenever depth is 2, the would-be best cell.
struct Flaky(Synthetic);

impl Model<f64, f64> for Flaky {
    fn fit(&mut self, inputs: &[f64], targets: &[f64]) -> Result<(), TrainError> {
        if self.0.depth == 2 {
            return Err(TrainError::Numeric("gradient overflow".into()));
        }
        self.0.fit(inputs, targets)
    }

    fn predict(&self, inputs: &[f64]) -> Vec<f64> {
        self.0.predict(inputs)
    }

    fn score(&self, inputs: &[f64], targets: &[f64]) -> Result<f64, TrainError> {
        self.0.score(inputs, targets)
    }
}

#[test]
fn numeric_failures_are_recorded_and_the_search_continues() {
    let builder = |config: &Configuration| -> Result<Flaky, TrainError> {
        Ok(Flaky(Synthetic::from_config(config)?))
    };

    let mut space = SearchSpace::new();
    space.declare(ParamSpec::int("depth", 1, 3)).unwrap();

    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = GridGenerator::new(&space).unwrap();
    let strategy = Holdout::new(tiny_data(4));

    let summary = search
        .run(&mut generator, &builder, &tiny_data(16), &strategy, &tracker)
        .unwrap();

    assert_eq!(summary.status, SearchStatus::Completed);
    assert_eq!(tracker.len(), 3);

    let history = tracker.history();
    let failed: Vec<_> = history.iter().filter(|r| r.result.is_failed()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].config.get_int("depth").unwrap(), 2);
    assert_eq!(failed[0].result.objective, f64::NEG_INFINITY);

    // The sentinel can never win: the best is a real score at depth 1 or 3.
    let best = summary.best.unwrap();
    assert!(!best.result.is_failed());
    assert_ne!(best.config.get_int("depth").unwrap(), 2);
}

#[test]
fn configuration_errors_abort_but_preserve_history() {
    let builder = |config: &Configuration| -> Result<Synthetic, TrainError> {
        if config.get_int("depth")? == 3 {
            return Err(TrainError::Configuration(
                "depth 3 exceeds the builder's layer table".into(),
            ));
        }
        Synthetic::from_config(config)
    };

    let mut space = SearchSpace::new();
    space.declare(ParamSpec::int("depth", 1, 3)).unwrap();

    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = GridGenerator::new(&space).unwrap();
    let strategy = Holdout::new(tiny_data(4));

    let err = search
        .run(&mut generator, &builder, &tiny_data(16), &strategy, &tracker)
        .unwrap_err();

    assert!(matches!(err, Error::Configuration(_)));
    // Depth 1 and 2 were evaluated before the abort; their history survives.
    assert_eq!(tracker.len(), 2);
    assert!(tracker.best().is_ok());
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn cancellation_takes_effect_at_the_trial_boundary() {
    let token = CancelToken::new();
    let search = Search::builder(Objective::maximize("synthetic_score"))
        .cancel_token(token.clone())
        .build();
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = RandomGenerator::new(depth_rate_space(), 3, 100);
    let strategy = Holdout::new(tiny_data(4));

    token.cancel();
    let summary = search
        .run(
            &mut generator,
            &synthetic_builder,
            &tiny_data(16),
            &strategy,
            &tracker,
        )
        .unwrap();

    assert_eq!(summary.status, SearchStatus::Aborted);
    assert_eq!(summary.trials, 0);
    assert!(tracker.is_empty());
}

// =============================================================================
// Artifact retention and refit
// =============================================================================

#[test]
fn artifacts_are_stripped_unless_retention_is_enabled() {
    let space = depth_optimizer_space();
    let strategy = Holdout::new(tiny_data(4));

    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = GridGenerator::new(&space).unwrap();
    search
        .run(
            &mut generator,
            &synthetic_builder,
            &tiny_data(16),
            &strategy,
            &tracker,
        )
        .unwrap();
    assert!(tracker.history().iter().all(|r| r.result.model.is_none()));

    let search = Search::builder(Objective::maximize("synthetic_score"))
        .keep_artifacts(true)
        .build();
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = GridGenerator::new(&space).unwrap();
    search
        .run(
            &mut generator,
            &synthetic_builder,
            &tiny_data(16),
            &strategy,
            &tracker,
        )
        .unwrap();
    for record in tracker.history() {
        let model = record.result.model.expect("holdout keeps the trained model");
        assert!(model.fitted);
    }
}

#[test]
fn refit_returns_a_model_trained_with_the_best_configuration() {
    let space = depth_optimizer_space();
    let search = Search::builder(Objective::maximize("synthetic_score"))
        .refit_best(true)
        .build();
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = GridGenerator::new(&space).unwrap();
    let strategy = Holdout::new(tiny_data(4));

    let summary = search
        .run(
            &mut generator,
            &synthetic_builder,
            &tiny_data(16),
            &strategy,
            &tracker,
        )
        .unwrap();

    let best = summary.best.unwrap();
    let refit = summary.refit.expect("refit was requested");
    assert!(refit.fitted);
    assert_eq!(refit.depth, best.config.get_int("depth").unwrap());
    assert_eq!(
        refit.optimizer,
        best.config.get_str("optimizer").unwrap()
    );
}

// =============================================================================
// K-fold cross-validation end to end
// =============================================================================

#[test]
fn kfold_search_aggregates_fold_scores() {
    let mut space = SearchSpace::new();
    space
        .declare(ParamSpec::float("rate", 0.01, 1.0).log_scale())
        .unwrap();
    space.declare(ParamSpec::int("depth", 1, 3)).unwrap();

    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = RandomGenerator::new(space, 11, 6);
    let strategy = KFold::new(5, 42);
    let data = tiny_data(100);

    let summary = search
        .run(&mut generator, &synthetic_builder, &data, &strategy, &tracker)
        .unwrap();

    assert_eq!(summary.status, SearchStatus::Completed);
    assert_eq!(summary.trials, 6);

    for record in tracker.history() {
        // Five fold scores plus their standard deviation.
        assert_eq!(record.result.metrics.len(), 6);
        assert!(record.result.metrics.contains_key("fold_0"));
        assert!(record.result.metrics.contains_key("fold_4"));
        assert!(record.result.metrics.contains_key("score_std"));
        assert!(record.result.model.is_none());
    }
}

#[test]
fn kfold_with_too_few_rows_aborts_with_insufficient_data() {
    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let mut generator = RandomGenerator::new(depth_rate_space(), 11, 3);
    let strategy = KFold::new(5, 42);

    let err = search
        .run(
            &mut generator,
            &synthetic_builder,
            &tiny_data(3),
            &strategy,
            &tracker,
        )
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientData { rows: 3, folds: 5 }));
}

// =============================================================================
// Trial indices and tracker reuse
// =============================================================================

#[test]
fn trial_indices_continue_across_runs_on_one_tracker() {
    let search = Search::new(Objective::maximize("synthetic_score"));
    let tracker = TrialTracker::new(search.objective().direction());
    let strategy = Holdout::new(tiny_data(4));

    for _ in 0..2 {
        let mut generator = RandomGenerator::new(depth_rate_space(), 5, 3);
        search
            .run(
                &mut generator,
                &synthetic_builder,
                &tiny_data(16),
                &strategy,
                &tracker,
            )
            .unwrap();
    }

    let indices: Vec<u64> = tracker.history().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
}
