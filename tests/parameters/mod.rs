//! Integration tests for the parameter system.

use likefit::parameters::{Parameter, Parameters};

fn spectral_params() -> Parameters {
    let mut params = Parameters::new();
    params
        .add(Parameter::with_scale("norm", 3e-12, 1e-12).unwrap())
        .unwrap();
    params.add_param("index", 2.3).unwrap();
    params.add_param("reference", 1.0).unwrap();
    params.get_mut("reference").unwrap().set_vary(false);
    params
}

#[test]
fn free_parameter_order_matches_insertion_order() {
    let params = spectral_params();

    let names: Vec<&str> = params.varying().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["norm", "index"]);
    assert_eq!(params.varying_factors(), vec![3.0, 2.3]);
}

#[test]
fn factor_vector_roundtrip() {
    let mut params = spectral_params();

    params.set_varying_factors(&[4.5, 2.0]).unwrap();
    assert_eq!(params.get("norm").unwrap().value(), 4.5e-12);
    assert_eq!(params.get("index").unwrap().value(), 2.0);
    assert_eq!(params.get("reference").unwrap().value(), 1.0);
}

#[test]
fn restore_values_is_exception_safe() {
    let mut params = spectral_params();
    let before: Vec<(f64, bool)> = params.iter().map(|p| (p.value(), p.vary())).collect();

    let result: Result<(), likefit::LikeFitError> = params.restore_values(|params| {
        params.get_mut("norm").unwrap().set_factor(99.0);
        params.get_mut("index").unwrap().set_vary(false);
        Err(likefit::LikeFitError::InvalidInput("boom".to_string()))
    });
    assert!(result.is_err());

    let after: Vec<(f64, bool)> = params.iter().map(|p| (p.value(), p.vary())).collect();
    assert_eq!(before, after);
}

#[test]
fn nested_restore_scopes_are_independent() {
    let mut params = spectral_params();

    params.restore_values(|params| {
        params.get_mut("index").unwrap().set_value(5.0);

        params.restore_values(|params| {
            params.get_mut("index").unwrap().set_value(7.0);
        });

        // Inner scope restored to the outer scope's state
        assert_eq!(params.get("index").unwrap().value(), 5.0);
    });

    assert_eq!(params.get("index").unwrap().value(), 2.3);
}

#[test]
fn json_file_roundtrip() {
    let mut params = spectral_params();
    params.get_mut("norm").unwrap().set_stderr(Some(0.2));
    params
        .get_mut("index")
        .unwrap()
        .set_factor_bounds(Some(0.0), Some(5.0))
        .unwrap();

    let path = std::env::temp_dir().join("likefit_params_roundtrip.json");
    params.save_json(&path).unwrap();
    let loaded = Parameters::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.names(), params.names());
    assert_eq!(loaded.get("norm").unwrap().stderr(), Some(0.2));
    assert_eq!(loaded.get("norm").unwrap().scale(), 1e-12);
    assert_eq!(loaded.get("index").unwrap().factor_max(), Some(5.0));
    assert!(!loaded.get("reference").unwrap().vary());
}
