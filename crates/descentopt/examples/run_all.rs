//! Runs every enabled method on `f = 4x₀⁴ + 2x₁² + 2x₀x₁ + 2x₀`.
//!
//! ```text
//! cargo run --example run_all -- [config.json]
//! ```
//!
//! Without an argument the default configuration is used: start at the
//! origin, centered differences with `h = 0.01`, all four methods.

use descentopt::prelude::*;
use std::process::ExitCode;

fn run() -> Result<(), ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_path(path)?,
        None => RunConfig::default(),
    };

    let f = scalar_function(|x: &DVector<f64>| {
        4.0 * x[0].powi(4) + 2.0 * x[1] * x[1] + 2.0 * x[0] * x[1] + 2.0 * x[0]
    });
    let grad_f = vector_function(|x: &DVector<f64>| {
        DVector::from_vec(vec![16.0 * x[0].powi(3) + 2.0 * x[1] + 2.0, 4.0 * x[1] + 2.0 * x[0]])
    });

    if config.fd {
        println!("Finite differences type: {} (h = {})", config.fd_t, config.h);
    }
    println!();

    for solver in config.solvers(f, Some(grad_f))? {
        println!("{solver}");
        println!();

        let mut progress = PrintProgressCallback::new(10);
        let result = solver.minimize_with_callback(&mut progress)?;
        println!("{}", MinimumReport::from_result(solver.parameters(), &result));
        println!();
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
