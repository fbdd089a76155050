//! Convergence tests for every method and rule combination.

use approx::assert_relative_eq;
use descentopt_core::prelude::*;
use descentopt_optim::{
    Adam, AdamConfig, GradientDescent, GradientDescentConfig, HeavyBall, HeavyBallConfig,
    MethodConfig, Nesterov, NesterovConfig, Solver,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// `q(x) = ½(x₀² + 4x₁²) + ½x₀x₁ − x₀`, minimised at `(16/15, −2/15)`.
fn skewed_quadratic(x0: &[f64]) -> Parameters<f64> {
    Parameters::new(
        scalar_function(|x: &DVector<f64>| {
            0.5 * (x[0] * x[0] + 4.0 * x[1] * x[1]) + 0.5 * x[0] * x[1] - x[0]
        }),
        vector_function(|x: &DVector<f64>| {
            DVector::from_vec(vec![x[0] + 0.5 * x[1] - 1.0, 4.0 * x[1] + 0.5 * x[0]])
        }),
        DVector::from_row_slice(x0),
    )
    .with_max_iterations(10_000)
}

fn quadratic_minimizer() -> DVector<f64> {
    DVector::from_vec(vec![16.0 / 15.0, -2.0 / 15.0])
}

const STARTS: [[f64; 2]; 3] = [[3.0, -2.0], [-1.0, 4.0], [0.0, 0.0]];

/// One method with its step settings.
struct Case {
    label: &'static str,
    method: MethodConfig<f64>,
    initial_step: f64,
    minimum_step: f64,
    tolerance_s: f64,
}

impl Case {
    fn new(label: &'static str, method: impl Into<MethodConfig<f64>>, initial_step: f64) -> Self {
        Self {
            label,
            method: method.into(),
            initial_step,
            minimum_step: 1e-12,
            tolerance_s: 1e-6,
        }
    }

    fn minimum_step(mut self, step: f64) -> Self {
        self.minimum_step = step;
        self
    }

    fn tolerance_s(mut self, tolerance: f64) -> Self {
        self.tolerance_s = tolerance;
        self
    }

    fn solver(&self, x0: &[f64]) -> Solver<f64> {
        let params = skewed_quadratic(x0)
            .with_initial_step(self.initial_step)
            .with_minimum_step(self.minimum_step)
            .with_tolerance_s(self.tolerance_s);
        self.method.into_solver(params).unwrap()
    }
}

fn momentum(rule: MomentumStepRule, strategy: MomentumStrategy, mu: f64, eta: f64) -> HeavyBallConfig<f64> {
    HeavyBallConfig::new()
        .with_rule(rule)
        .with_strategy(strategy)
        .with_mu(mu)
        .with_eta(eta)
}

fn nesterov(rule: MomentumStepRule, strategy: MomentumStrategy, mu: f64, eta: f64) -> NesterovConfig<f64> {
    NesterovConfig::new()
        .with_rule(rule)
        .with_strategy(strategy)
        .with_mu(mu)
        .with_eta(eta)
}

fn converging_cases() -> Vec<Case> {
    use MomentumStepRule::{Constant, ExponentialDecay, InverseDecay};
    use MomentumStrategy::{Constant as Fixed, Dynamic};

    vec![
        Case::new("gd armijo", GradientDescentConfig::<f64>::new().with_armijo(0.1), 1.0).minimum_step(1e-2),
        Case::new("gd exponential", GradientDescentConfig::<f64>::new().with_exponential_decay(0.05), 1.0),
        Case::new("gd inverse", GradientDescentConfig::<f64>::new().with_inverse_decay(0.05), 1.0),
        Case::new("hb exponential/constant", momentum(ExponentialDecay, Fixed, 0.05, 0.5), 0.5),
        Case::new("hb inverse/constant", momentum(InverseDecay, Fixed, 0.05, 0.5), 1.0),
        Case::new("hb inverse/dynamic", momentum(InverseDecay, Dynamic, 0.01, 0.5), 1.0)
            .minimum_step(1e-6)
            .tolerance_s(1e-3),
        Case::new("hb constant/constant", momentum(Constant, Fixed, 0.2, 0.2), 1e-3).tolerance_s(1e-3),
        Case::new("nesterov exponential/dynamic", nesterov(ExponentialDecay, Dynamic, 0.01, 0.5), 1.0),
        Case::new("nesterov exponential/constant", nesterov(ExponentialDecay, Fixed, 0.01, 0.5), 0.1),
        Case::new("nesterov inverse/dynamic", nesterov(InverseDecay, Dynamic, 0.01, 0.5), 0.5),
        Case::new("nesterov inverse/constant", nesterov(InverseDecay, Fixed, 0.05, 0.5), 1.0),
        Case::new("nesterov constant/constant", nesterov(Constant, Fixed, 0.2, 0.5), 1e-3),
        Case::new("adam dynamic", AdamConfig::<f64>::new(), 1.0),
        Case::new("adam constant", AdamConfig::<f64>::new().with_rule(AdamRule::Constant), 0.1)
            .minimum_step(1e-2),
    ]
}

#[test]
fn test_every_variant_converges_on_convex_quadratic() {
    let minimizer = quadratic_minimizer();

    for case in converging_cases() {
        for x0 in &STARTS {
            let result = case.solver(x0).minimize().unwrap();
            let distance = (&result.point - &minimizer).norm();

            assert!(result.converged, "{} from {x0:?}: {}", case.label, result.status);
            assert!(distance < 1e-2, "{} from {x0:?}: distance {distance}", case.label);
            assert!(result.iterations < 10_000);
        }
    }
}

#[test]
fn test_undamped_dynamic_momentum_reports_max_iterations() {
    use MomentumStepRule::{Constant, ExponentialDecay};
    use MomentumStrategy::Dynamic;

    let methods: [MethodConfig<f64>; 3] = [
        HeavyBallConfig::<f64>::new().with_rule(ExponentialDecay).with_strategy(Dynamic).into(),
        HeavyBallConfig::<f64>::new().with_rule(Constant).with_strategy(Dynamic).into(),
        NesterovConfig::<f64>::new().with_rule(Constant).with_strategy(Dynamic).into(),
    ];

    for method in methods {
        for x0 in &STARTS[..2] {
            let params = skewed_quadratic(x0).with_max_iterations(2000);
            let result = method.into_solver(params).unwrap().minimize().unwrap();

            assert_eq!(result.status, ConvergenceStatus::MaxIterationsReached, "{}", method.name());
            assert!(!result.converged);
            assert_eq!(result.iterations, 2000);
            assert!(result.point.iter().all(|xi| xi.is_finite()));
        }
    }
}

#[test]
fn test_inverse_decay_converges_with_default_floor() {
    let minimizer = quadratic_minimizer();

    for x0 in &STARTS {
        let params = skewed_quadratic(x0).with_max_iterations(1000);
        let config = GradientDescentConfig::new().with_inverse_decay(0.2);
        let result = GradientDescent::new(params, config).unwrap().minimize().unwrap();

        assert!(result.converged, "from {x0:?}: {}", result.status);
        assert!(result.iterations < 100);
        assert!((&result.point - &minimizer).norm() < 1e-4, "from {x0:?}");
    }
}

/// `f = 4x₀⁴ + 2x₁² + 2x₀x₁ + 2x₀` with a centered-difference gradient.
fn demo_problem() -> Parameters<f64> {
    let f = scalar_function(|x: &DVector<f64>| {
        4.0 * x[0].powi(4) + 2.0 * x[1] * x[1] + 2.0 * x[0] * x[1] + 2.0 * x[0]
    });
    let grad_f = gradient(f.clone(), 1e-2, DifferenceStencil::Centered);
    Parameters::new(f, grad_f, DVector::zeros(2))
}

/// Root of `16x³ − x + 2 = 0` with `x₁ = −x₀/2`.
fn demo_minimizer() -> DVector<f64> {
    DVector::from_vec(vec![-0.5415781868494473, 0.2707890934247236])
}

#[test]
fn test_demo_scenario_with_finite_differences() {
    let optimizer = GradientDescent::with_default_config(demo_problem()).unwrap();
    let result = optimizer.minimize().unwrap();

    // Armijo settles at its floor near the minimum, so the step criterion ends the run.
    assert_eq!(result.status, ConvergenceStatus::ConvergedStep);
    assert!(result.iterations < 1000);
    assert!((&result.point - demo_minimizer()).norm() < 1e-3);
}

#[test]
fn test_demo_scenario_reaches_residual_tolerance_with_tight_step_tolerance() {
    let params = demo_problem().with_tolerance_s(1e-9);
    let result = GradientDescent::with_default_config(params).unwrap().minimize().unwrap();

    assert_eq!(result.status, ConvergenceStatus::ConvergedResidual);
    assert!(result.gradient_norm.unwrap() < 1e-6);
    assert!((&result.point - demo_minimizer()).norm() < 1e-3);
}

#[test]
fn test_reruns_are_deterministic() {
    let params = skewed_quadratic(&[3.0, -2.0]).with_initial_step(0.5).with_minimum_step(1e-12);
    let config = HeavyBallConfig::new().with_mu(0.05).with_eta(0.5);
    let optimizer = HeavyBall::new(params, config).unwrap();

    let first = optimizer.minimize().unwrap();
    let second = optimizer.minimize().unwrap();

    assert_eq!(first.point, second.point);
    assert_eq!(first.iterations, second.iterations);
    assert_eq!(first.status, second.status);
    assert_eq!(first.gradient_evaluations, second.gradient_evaluations);
}

#[test]
fn test_minimize_from_replaces_problem() {
    let mut optimizer = Nesterov::new(
        skewed_quadratic(&[0.0, 0.0]).with_minimum_step(1e-12),
        NesterovConfig::new()
            .with_rule(MomentumStepRule::InverseDecay)
            .with_mu(0.05)
            .with_eta(0.5),
    )
    .unwrap();

    // Shifted bowl `(x₀ − 2)² + (x₁ + 1)²`.
    let result = optimizer
        .minimize_from(
            scalar_function(|x: &DVector<f64>| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2)),
            vector_function(|x: &DVector<f64>| {
                DVector::from_vec(vec![2.0 * (x[0] - 2.0), 2.0 * (x[1] + 1.0)])
            }),
            DVector::from_vec(vec![-1.0, 3.0]),
        )
        .unwrap();

    assert!(result.converged);
    assert!((&result.point - DVector::from_vec(vec![2.0, -1.0])).norm() < 1e-2);
    assert_eq!(optimizer.parameters().initial_condition, DVector::from_vec(vec![-1.0, 3.0]));
}

#[test]
fn test_random_starting_points() {
    let mut rng = StdRng::seed_from_u64(42);
    let minimizer = quadratic_minimizer();
    let optimizer = GradientDescent::with_default_config(skewed_quadratic(&[0.0, 0.0])).unwrap();

    for _ in 0..16 {
        let x0 = [rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)];
        let mut optimizer = optimizer.clone();
        let params = skewed_quadratic(&x0);
        let result = optimizer
            .minimize_from(params.f, params.grad_f, params.initial_condition)
            .unwrap();

        assert!(result.converged, "from {x0:?}: {}", result.status);
        assert!((&result.point - &minimizer).norm() < 1e-4, "from {x0:?}");
    }
}

#[test]
fn test_armijo_takes_exact_step_on_separable_quadratic() {
    // (x₀ − 1)² + 2x₁² from (3, −1): α = ½ hits x₀ exactly, α = ¼ hits x₁.
    let params = Parameters::new(
        scalar_function(|x: &DVector<f64>| (x[0] - 1.0).powi(2) + 2.0 * x[1] * x[1]),
        vector_function(|x: &DVector<f64>| DVector::from_vec(vec![2.0 * (x[0] - 1.0), 4.0 * x[1]])),
        DVector::from_vec(vec![3.0, -1.0]),
    );
    let result = GradientDescent::new(params, GradientDescentConfig::new()).unwrap().minimize().unwrap();

    assert!(result.converged);
    assert_relative_eq!(result.point, DVector::from_vec(vec![1.0, 0.0]), epsilon = 1e-12);
}

#[test]
fn test_adam_counts_one_gradient_per_iteration() {
    let params = skewed_quadratic(&[3.0, -2.0]).with_initial_step(1.0).with_minimum_step(1e-12);
    let result = Adam::with_default_config(params).unwrap().minimize().unwrap();

    // One per update plus the final residual check, when it stopped on the residual.
    let n = result.iterations;
    assert!(result.gradient_evaluations == n || result.gradient_evaluations == n + 1);
    assert_eq!(result.function_evaluations, 1);
}

proptest! {
    #[test]
    fn prop_armijo_descent_finds_parabola_vertex(
        a in 0.5f64..5.0,
        c in -3.0f64..3.0,
        x0 in -5.0f64..5.0,
    ) {
        let params = Parameters::new(
            scalar_function(move |x: &DVector<f64>| a * (x[0] - c).powi(2)),
            vector_function(move |x: &DVector<f64>| DVector::from_vec(vec![2.0 * a * (x[0] - c)])),
            DVector::from_vec(vec![x0]),
        );
        let result = GradientDescent::with_default_config(params).unwrap().minimize().unwrap();

        prop_assert!(result.converged);
        prop_assert!((result.point[0] - c).abs() < 1e-4);
    }
}
