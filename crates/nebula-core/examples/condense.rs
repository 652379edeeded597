//! Condensation example: sample a nebular position and condense molecules.
//!
//! Samples an orbital distance and equilibrium temperature, condenses
//! molecules that stay solid at that temperature until the target count is
//! reached, and prints each molecule's share of the condensed mass.
//!
//! The tables come from `nebula_core::test_utils`, an in-code copy of the
//! data files shipped by `nebula-data` (the core crate cannot depend on the
//! data crate). `nebula-integration-tests` keeps the two copies equal.
//!
//! Run with: `cargo run -p nebula-core --example condense -- [seed]`
//! Set `RUST_LOG=nebula_core=debug` to follow individual rounds.

use nebula_core::condensation::CondensationEngine;
use nebula_core::rng;
use nebula_core::scenario::{ScenarioConfig, ScenarioParams, condense_until};
use nebula_core::test_utils::nebula_registry;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 42,
    };

    let registry = nebula_registry();
    let mut rng = rng::seeded(seed);
    let params = ScenarioParams::sample(&mut rng, &ScenarioConfig::default())?;

    let mut engine = CondensationEngine::new(&registry, params.condensation_config(), &mut rng)?;
    let census = condense_until(&mut engine, params.target_molecules, params.max_idle_rounds);

    println!(
        "==== Dist ({:.2} AU) ==== Temp ({:.1}K) ==== Flux ({:.1} Da) ====",
        params.orbital_distance_au, params.temperature_k, params.min_mass
    );
    for share in &census.shares {
        println!(
            "  {:>7}: {:>7.2}%  ({})",
            share.formula, share.percent, share.units
        );
    }
    println!(
        "  {} units in {} rounds{}",
        census.total_units,
        engine.rounds(),
        if census.reached_target { "" } else { " (target not reached)" }
    );
    Ok(())
}
