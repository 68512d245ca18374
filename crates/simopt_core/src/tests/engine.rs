//! Tests for engine bookkeeping
//!
//! These tests verify that:
//! - The trace holds exactly one record per iteration, in order
//! - The objective is evaluated `2N - 1` times (`3N - 2` with fresh samples)
//! - Invalid settings fail before any evaluation
//! - Objective failures and non-finite values abort with a partial trace
//! - Cancellation stops at an iteration boundary

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{Counting, shifted_quadratic};
use crate::error::{ConfigError, ObjectiveError, OptimizationError};
use crate::objective::FnObjective;
use crate::optimization::{
    DerivativeEstimate, HarmonicStepSize, StochasticApproximation, TerminationReason,
};

fn engine(derivative_step: f64) -> StochasticApproximation<Counting, HarmonicStepSize> {
    StochasticApproximation::new(
        Counting::new(shifted_quadratic),
        HarmonicStepSize::new(1.0).unwrap(),
        derivative_step,
    )
}

#[test]
fn test_trace_length_matches_iterations() {
    for n in [1usize, 2, 7, 50] {
        let mut engine = engine(1e-3);
        let result = engine.minimize(n, 0.5).unwrap();

        let trace = engine.trace();
        assert_eq!(trace.len(), n);
        assert_eq!(trace.iterations().collect::<Vec<_>>(), (0..n).collect::<Vec<_>>());
        assert_eq!(result.iterations, n);
        assert_eq!(result.termination_reason, TerminationReason::MaxIterationsReached);
    }
}

#[test]
fn test_evaluation_count_is_two_n_minus_one() {
    for n in [1usize, 2, 10, 100] {
        let mut engine = engine(1e-3);
        let result = engine.minimize(n, 0.0).unwrap();
        assert_eq!(engine.model().calls, 2 * n - 1);
        assert_eq!(result.evaluations, 2 * n - 1);
    }
}

#[test]
fn test_fresh_samples_cost_one_extra_evaluation_per_iteration() {
    let n = 20;
    let mut engine = engine(1e-3).with_derivative_estimate(DerivativeEstimate::ForwardFresh);
    let result = engine.minimize(n, 0.0).unwrap();
    assert_eq!(engine.model().calls, 3 * n - 2);
    assert_eq!(
        result.evaluations,
        1 + (n - 1) * DerivativeEstimate::ForwardFresh.evaluations_per_iteration()
    );
}

#[test]
fn test_fresh_and_reused_agree_on_deterministic_objective() {
    let mut reuse = engine(1e-3);
    let mut fresh = engine(1e-3).with_derivative_estimate(DerivativeEstimate::ForwardFresh);
    let a = reuse.minimize(30, 0.0).unwrap();
    let b = fresh.minimize(30, 0.0).unwrap();
    assert_eq!(a.x_star, b.x_star);
    assert_eq!(reuse.trace(), fresh.trace());
}

#[test]
fn test_single_iteration_returns_start() {
    // The derivative step and schedule are irrelevant when no update happens
    for (h, a) in [(1e-3, 1.0), (-5.0, 0.1), (100.0, 10.0)] {
        let mut engine = StochasticApproximation::new(
            Counting::new(shifted_quadratic),
            HarmonicStepSize::new(a).unwrap(),
            h,
        );
        let result = engine.minimize(1, 1.0).unwrap();

        assert_eq!(result.x_star, 1.0);
        assert_eq!(result.f_star, 4.0);
        assert_eq!(engine.model().calls, 1);

        let records = engine.trace().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].iteration, 0);
        assert_eq!(records[0].parameter, 1.0);
        assert_eq!(records[0].objective_value, 4.0);
    }
}

#[test]
fn test_zero_derivative_step_fails_before_evaluating() {
    let mut engine = engine(0.0);
    let err = engine.minimize(10, 0.0).unwrap_err();

    assert_eq!(
        err,
        OptimizationError::InvalidConfiguration(ConfigError::InvalidDerivativeStep(0.0))
    );
    assert_eq!(engine.model().calls, 0);
    assert!(engine.trace().is_empty());
    assert!(engine.result().is_none());
}

#[test]
fn test_zero_iterations_fails_before_evaluating() {
    let mut engine = engine(1e-3);
    let err = engine.minimize(0, 0.0).unwrap_err();
    assert_eq!(
        err,
        OptimizationError::InvalidConfiguration(ConfigError::ZeroIterations)
    );
    assert_eq!(engine.model().calls, 0);
}

#[test]
fn test_non_finite_start_fails_before_evaluating() {
    let mut engine = engine(1e-3);
    assert!(matches!(
        engine.minimize(5, f64::NAN),
        Err(OptimizationError::InvalidConfiguration(
            ConfigError::NonFiniteStart(_)
        ))
    ));
    assert_eq!(engine.model().calls, 0);
}

#[test]
fn test_zero_step_scale_rejected_at_construction() {
    assert_eq!(
        HarmonicStepSize::new(0.0),
        Err(ConfigError::NonPositiveStepScale(0.0))
    );
}

#[test]
fn test_second_run_replaces_first() {
    let mut engine = engine(1e-3);
    engine.minimize(10, 0.0).unwrap();
    let result = engine.minimize(3, 5.0).unwrap();

    assert_eq!(engine.trace().len(), 3);
    assert_eq!(engine.trace().records()[0].parameter, 5.0);
    assert_eq!(result.evaluations, 5);
    assert_eq!(engine.result(), Some(&result));
}

#[test]
fn test_failed_validation_discards_previous_run() {
    let mut engine = engine(1e-3);
    engine.minimize(4, 0.0).unwrap();
    assert!(engine.minimize(0, 0.0).is_err());
    assert!(engine.trace().is_empty());
    assert!(engine.result().is_none());
}

#[test]
fn test_objective_error_aborts_with_partial_trace() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let model = FnObjective::new(move |x: f64| {
        // Calls: 1 = start, 2/3 = iteration 1, 4 = first call of iteration 2
        if counter.fetch_add(1, Ordering::Relaxed) + 1 == 4 {
            return Err(ObjectiveError::Simulation("replication crashed".to_string()));
        }
        Ok(x * x)
    });
    let mut engine = StochasticApproximation::new(model, HarmonicStepSize::new(0.1).unwrap(), 1e-3);

    let err = engine.minimize(10, 1.0).unwrap_err();
    assert_eq!(
        err,
        OptimizationError::ObjectiveEvaluation {
            iteration: 2,
            source: ObjectiveError::Simulation("replication crashed".to_string()),
        }
    );
    assert_eq!(calls.load(Ordering::Relaxed), 4);
    assert_eq!(engine.trace().len(), 2);
    assert_eq!(engine.evaluations(), 4);
    assert!(engine.result().is_none());
}

#[test]
fn test_out_of_domain_error_is_unmodified() {
    let model = FnObjective::new(|x: f64| {
        if x > 2.0 {
            Err(ObjectiveError::OutOfDomain {
                value: x,
                reason: "probability above one".to_string(),
            })
        } else {
            Ok((x - 3.0).powi(2))
        }
    });
    let mut engine = StochasticApproximation::new(model, HarmonicStepSize::new(1.0).unwrap(), 1e-3);

    match engine.minimize(10, 0.0) {
        Err(OptimizationError::ObjectiveEvaluation { iteration, source }) => {
            assert_eq!(iteration, 1);
            assert!(matches!(
                source,
                ObjectiveError::OutOfDomain { ref reason, .. } if reason == "probability above one"
            ));
        }
        other => panic!("expected objective failure, got {other:?}"),
    }
    assert_eq!(engine.trace().len(), 1);
}

#[test]
fn test_non_finite_objective_is_numerical_instability() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let model = FnObjective::new(move |x: f64| {
        if counter.fetch_add(1, Ordering::Relaxed) + 1 == 3 {
            return Ok(f64::NAN);
        }
        Ok(x * x)
    });
    let mut engine = StochasticApproximation::new(model, HarmonicStepSize::new(1.0).unwrap(), 1e-3);

    let err = engine.minimize(10, 1.0).unwrap_err();
    assert!(matches!(
        err,
        OptimizationError::NumericalInstability { iteration: 1, .. }
    ));
    assert_eq!(engine.trace().len(), 1);
}

#[test]
fn test_diverging_update_is_numerical_instability() {
    let model = FnObjective::new(|x: f64| Ok(if x > 0.0 { f64::MAX } else { 0.0 }));
    let mut engine = StochasticApproximation::new(model, HarmonicStepSize::new(1.0).unwrap(), 1e-300);

    // (MAX - 0) / 1e-300 overflows to +inf
    let err = engine.minimize(5, 0.0).unwrap_err();
    assert!(matches!(
        err,
        OptimizationError::NumericalInstability { iteration: 1, .. }
    ));
}

#[test]
fn test_cancel_flag_stops_between_iterations() {
    let cancelled = Arc::new(AtomicBool::new(false));
    let trigger = cancelled.clone();

    let mut engine = engine(1e-3)
        .with_cancel_flag(cancelled)
        .with_progress_callback(Box::new(move |iteration, _, _| {
            if iteration == 4 {
                trigger.store(true, Ordering::Relaxed);
            }
        }));

    let result = engine.minimize(100, 0.0).unwrap();
    assert_eq!(result.termination_reason, TerminationReason::UserCancelled);
    assert_eq!(result.iterations, 5);
    assert_eq!(result.evaluations, 9);
    assert_eq!(engine.trace().len(), 5);

    let last = engine.trace().last().unwrap();
    assert_eq!(last.parameter, result.x_star);
    assert_eq!(last.objective_value, result.f_star);
}

#[test]
fn test_progress_callback_sees_trace_records() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();

    let mut engine = engine(1e-3).with_progress_callback(Box::new(move |i, x, f| {
        sink.lock().unwrap().push((i, x, f));
    }));
    engine.minimize(6, 0.0).unwrap();

    let seen = seen.lock().unwrap();
    let expected: Vec<_> = engine
        .trace()
        .records()
        .iter()
        .map(|r| (r.iteration, r.parameter, r.objective_value))
        .collect();
    assert_eq!(*seen, expected);
}
