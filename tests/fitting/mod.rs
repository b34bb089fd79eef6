//! Integration tests for the estimation workflow: point optimization
//! followed by profile-likelihood confidence intervals.

use approx::assert_relative_eq;
use likefit::parameters::Parameters;
use likefit::{
    confidence, confidence_all, covariance, optimize, ConfidenceConfig, LikeFitError,
    OptimizeConfig, Result,
};

/// Unit parabola in the factor of `x`, minimum at 3.
fn parabola(params: &Parameters) -> Result<f64> {
    let x = params.get("x").unwrap().factor();
    Ok((x - 3.0).powi(2))
}

fn parabola_params() -> Parameters {
    let mut params = Parameters::new();
    params.add_param("x", 3.0).unwrap();
    params.get_mut("x").unwrap().set_stderr(Some(1.0));
    params
}

fn state_of(params: &Parameters) -> Vec<(String, f64, bool)> {
    params
        .iter()
        .map(|p| (p.name().to_string(), p.value(), p.vary()))
        .collect()
}

#[test]
fn optimize_then_confidence_workflow() {
    let mut params = parabola_params();
    params.get_mut("x").unwrap().set_value(0.5);

    let fit = optimize(&mut params, &parabola, &OptimizeConfig::default()).unwrap();
    assert!(fit.success, "{}", fit.message);
    assert_relative_eq!(fit.factors[0], 3.0, epsilon = 1e-4);

    // Move the set to the best-fit point before estimating the interval
    params.set_varying_factors(&fit.factors).unwrap();

    let interval =
        confidence(&mut params, "x", &parabola, 1.0, &ConfidenceConfig::default()).unwrap();
    assert!(interval.success_errn && interval.success_errp);
    assert_relative_eq!(interval.errn, 1.0, epsilon = 1e-4);
    assert_relative_eq!(interval.errp, 1.0, epsilon = 1e-4);
}

#[test]
fn confidence_scales_with_sigma() {
    let mut params = parabola_params();

    // ts_diff = sigma^2 = 4 crosses the unit parabola at a distance of 2
    let interval =
        confidence(&mut params, "x", &parabola, 2.0, &ConfidenceConfig::default()).unwrap();
    assert!(interval.success_errn && interval.success_errp);
    assert_relative_eq!(interval.errn, 2.0, epsilon = 1e-6);
    assert_relative_eq!(interval.errp, 2.0, epsilon = 1e-6);
    assert_relative_eq!(interval.loglike_ref, 0.0, epsilon = 1e-12);
}

#[test]
fn confidence_is_idempotent_and_leaves_no_trace() {
    let mut params = parabola_params();
    let before = state_of(&params);

    let first =
        confidence(&mut params, "x", &parabola, 1.0, &ConfidenceConfig::default()).unwrap();
    assert_eq!(state_of(&params), before);

    let second =
        confidence(&mut params, "x", &parabola, 1.0, &ConfidenceConfig::default()).unwrap();
    assert_eq!(state_of(&params), before);

    assert_eq!(first.errn, second.errn);
    assert_eq!(first.errp, second.errp);
    assert_eq!(first.success_errn, second.success_errn);
    assert_eq!(first.success_errp, second.success_errp);
    assert_eq!(first.nfev_errn, second.nfev_errn);
    assert_eq!(first.nfev_errp, second.nfev_errp);
}

#[test]
fn confidence_restores_state_after_failed_searches() {
    let mut params = parabola_params();
    let before = state_of(&params);

    // Flat objective: both searches fail to bracket, but the set must still
    // come back untouched
    let flat = |_: &Parameters| -> Result<f64> { Ok(0.0) };
    let interval = confidence(&mut params, "x", &flat, 1.0, &ConfidenceConfig::default()).unwrap();

    assert!(!interval.success_errn);
    assert!(!interval.success_errp);
    assert!(!interval.message_errn.is_empty());
    assert_eq!(state_of(&params), before);
}

#[test]
fn confidence_one_sided_bracketing_failure() {
    let mut params = parabola_params();

    // Monotonic objective: the threshold crossing exists above the
    // reference factor but not below it
    let linear = |params: &Parameters| -> Result<f64> {
        Ok(params.get("x").unwrap().factor())
    };
    let interval =
        confidence(&mut params, "x", &linear, 1.0, &ConfidenceConfig::default()).unwrap();

    assert!(!interval.success_errn);
    assert!(interval.message_errn.contains("Try setting the interval by hand"));
    assert!(interval.success_errp, "{}", interval.message_errp);
    assert_relative_eq!(interval.errp, 1.0, epsilon = 1e-6);
}

#[test]
fn confidence_uses_configured_bound_as_endpoint() {
    // Upper bound beyond the crossing: the search succeeds inside it
    let mut params = parabola_params();
    params
        .get_mut("x")
        .unwrap()
        .set_factor_bounds(None, Some(5.0))
        .unwrap();
    let interval =
        confidence(&mut params, "x", &parabola, 1.0, &ConfidenceConfig::default()).unwrap();
    assert!(interval.success_errp);
    assert_relative_eq!(interval.errp, 1.0, epsilon = 1e-6);

    // Upper bound short of the crossing: no sign change inside the interval
    let mut params = parabola_params();
    params
        .get_mut("x")
        .unwrap()
        .set_factor_bounds(None, Some(3.5))
        .unwrap();
    let interval =
        confidence(&mut params, "x", &parabola, 1.0, &ConfidenceConfig::default()).unwrap();
    assert!(!interval.success_errp);
    assert!(interval.message_errp.contains("bracketing interval"));
}

#[test]
fn confidence_endpoint_override() {
    let mut params = parabola_params();

    // Explicit interval handed in instead of the synthesized one
    let config = ConfidenceConfig {
        b: Some(10.0),
        ..ConfidenceConfig::default()
    };
    let interval = confidence(&mut params, "x", &parabola, 1.0, &config).unwrap();
    assert!(interval.success_errp);
    assert_relative_eq!(interval.errp, 1.0, epsilon = 1e-6);
}

/// Coupled two-parameter objective: the profile over `y` at fixed `x`
/// reduces to the unit parabola, so the interval on `x` is only correct if
/// the remaining free parameter really is re-optimized at each trial factor.
fn coupled(params: &Parameters) -> Result<f64> {
    let x = params.get("x").unwrap().factor();
    let y = params.get("y").unwrap().factor();
    Ok((x - 3.0).powi(2) + (x - y).powi(2))
}

#[test]
fn confidence_profiles_over_remaining_parameters() {
    let mut params = Parameters::new();
    params.add_param("x", 3.0).unwrap();
    params.add_param("y", 3.0).unwrap();
    params.get_mut("x").unwrap().set_stderr(Some(1.0));
    params.get_mut("y").unwrap().set_stderr(Some(1.0));

    let interval =
        confidence(&mut params, "x", &coupled, 1.0, &ConfidenceConfig::default()).unwrap();

    assert!(interval.success_errn, "{}", interval.message_errn);
    assert!(interval.success_errp, "{}", interval.message_errp);
    assert_relative_eq!(interval.errn, 1.0, epsilon = 1e-4);
    assert_relative_eq!(interval.errp, 1.0, epsilon = 1e-4);
}

#[test]
fn confidence_all_scans_every_free_parameter() {
    let mut params = Parameters::new();
    params.add_param("x", 3.0).unwrap();
    params.add_param("y", 3.0).unwrap();
    params.get_mut("x").unwrap().set_stderr(Some(1.0));
    params.get_mut("y").unwrap().set_stderr(Some(1.0));
    let before = state_of(&params);

    let results =
        confidence_all(&params, &coupled, 1.0, &ConfidenceConfig::default()).unwrap();

    assert_eq!(results.len(), 2);
    // Profile over y at fixed x: (x - 3)^2, crossing at distance 1
    assert_relative_eq!(results["x"].errp, 1.0, epsilon = 1e-4);
    // Profile over x at fixed y: (y - 3)^2 / 2, crossing at distance sqrt(2)
    assert_relative_eq!(results["y"].errp, std::f64::consts::SQRT_2, epsilon = 1e-4);

    // The input set is never touched: each scan works on its own clone
    assert_eq!(state_of(&params), before);
}

#[test]
fn covariance_always_fails() {
    let params = parabola_params();
    let err = covariance(&params, &parabola).unwrap_err();
    assert!(matches!(err, LikeFitError::NotImplemented(_)));

    let empty = Parameters::new();
    let err = covariance(&empty, &parabola).unwrap_err();
    assert!(matches!(err, LikeFitError::NotImplemented(_)));
}
