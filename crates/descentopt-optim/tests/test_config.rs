//! Loading run configurations and turning them into solvers.

#![cfg(feature = "serde")]

use descentopt_core::prelude::*;
use descentopt_optim::{
    AdamConfig, ConfigError, GradientDescentConfig, HeavyBallConfig, MethodConfig, MinimumReport,
    NesterovConfig, RunConfig,
};
use pretty_assertions::assert_eq;

fn demo_objective() -> ScalarFunction<f64> {
    scalar_function(|x: &DVector<f64>| {
        4.0 * x[0].powi(4) + 2.0 * x[1] * x[1] + 2.0 * x[0] * x[1] + 2.0 * x[0]
    })
}

#[test]
fn test_methods_follow_configured_rules() {
    let config = RunConfig::from_json_str(
        r#"{
            "mu": 0.05,
            "eta": 0.5,
            "eta_nest": 0.7,
            "sigma": 0.3,
            "gradient_method_t": "Inverse decay",
            "heavy_ball_t": "Constant",
            "heavy_ball_s": "Dynamic",
            "nesterov_t": "Inverse decay",
            "adam_t": "Constant",
            "beta1": 0.8
        }"#,
    )
    .unwrap();

    assert_eq!(
        config.methods(),
        vec![
            MethodConfig::GradientDescent(GradientDescentConfig {
                rule: DescentRule::InverseDecay,
                sigma: 0.3,
                mu: 0.05,
            }),
            MethodConfig::HeavyBall(HeavyBallConfig {
                rule: MomentumStepRule::Constant,
                strategy: MomentumStrategy::Dynamic,
                mu: 0.05,
                eta: 0.5,
            }),
            MethodConfig::Nesterov(NesterovConfig {
                rule: MomentumStepRule::InverseDecay,
                strategy: MomentumStrategy::Constant,
                mu: 0.05,
                eta: 0.7,
            }),
            MethodConfig::Adam(AdamConfig {
                rule: AdamRule::Constant,
                mu: 0.05,
                beta1: 0.8,
                beta2: 0.999,
                epsilon: 1e-8,
            }),
        ]
    );
}

#[test]
fn test_disabled_methods_are_skipped() {
    let config = RunConfig::from_json_str(r#"{ "gradient_descent": false, "nesterov": false }"#).unwrap();
    let names: Vec<_> = config.methods().iter().map(MethodConfig::name).collect();
    assert_eq!(names, vec!["Heavy Ball", "Adam"]);
}

#[test]
fn test_unknown_rule_is_a_parse_error() {
    let err = RunConfig::from_json_str(r#"{ "heavy_ball_t": "Armijo rule" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = RunConfig::from_json_str(r#"{ "fd_t": "Sideways" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_serialised_config_round_trips_rule_names() {
    let json = serde_json::to_value(RunConfig::default()).unwrap();
    assert_eq!(json["gradient_method_t"], "Armijo rule");
    assert_eq!(json["heavy_ball_t"], "Exponential decay");
    assert_eq!(json["heavy_ball_s"], "Constant");
    assert_eq!(json["adam_t"], "Dynamic");
    assert_eq!(json["fd_t"], "Centered");
}

#[test]
fn test_invalid_method_setting_surfaces_when_building_solvers() {
    let config = RunConfig::from_json_str(r#"{ "eta": 1.5 }"#).unwrap();
    let err = config.solvers(demo_objective(), None).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid(OptimizerError::InvalidConfiguration { ref parameter, .. }) if parameter == "eta"
    ));
}

#[test]
fn test_default_run_of_demo_objective() {
    let config = RunConfig::from_json_str(r#"{ "heavy_ball": false, "nesterov": false, "adam": false }"#).unwrap();
    let solvers = config.solvers(demo_objective(), None).unwrap();
    assert_eq!(solvers.len(), 1);

    let solver = &solvers[0];
    let result = solver.minimize().unwrap();
    let report = MinimumReport::from_result(solver.parameters(), &result);

    assert!(result.converged);
    assert!((report.point[0] + 0.5416).abs() < 1e-3);
    assert!((report.point[1] - 0.2708).abs() < 1e-3);
    assert!(report.to_string().starts_with("Computed minimum: (-0.54"));
}
