//! Mineral example: a full scenario from condensation to classified minerals.
//!
//! Runs one sampled scenario on the nebular tables and prints every mineral
//! that formed with its realized formulas and silica class. Pass `--json` to
//! print the whole outcome instead.
//!
//! The tables come from `nebula_core::test_utils`, an in-code copy of the
//! data files shipped by `nebula-data`; `nebula-integration-tests` keeps the
//! two copies equal.
//!
//! Run with: `cargo run -p nebula-core --example minerals -- [seed] [--json]`

use nebula_core::scenario::{self, ScenarioConfig};
use nebula_core::test_utils::nebula_registry;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let mut seed = 7;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            seed = arg.parse()?;
        }
    }

    let registry = nebula_registry();
    let config = ScenarioConfig {
        // Keep the example quick: cold enough for ices to count.
        reference_temperature_k: 60.0,
        target_max: 5000,
        ..Default::default()
    };
    let outcome = scenario::run_seeded(&registry, &config, seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "==== Dist ({:.2} AU) ==== Temp ({:.1}K) ==== {} molecules ====",
        outcome.params.orbital_distance_au,
        outcome.params.temperature_k,
        outcome.census.total_units
    );
    for (name, record) in &outcome.minerals {
        let class = record
            .composition
            .as_ref()
            .map_or("-", |c| c.class.name());
        println!("  {name:<12} x{:<6} {class}", record.draws);
        for (formula, count) in &record.formulas {
            println!("      {formula:<16} {count}");
        }
    }
    let leftover: u64 = outcome.leftover.values().sum();
    println!("  {leftover} molecule units unused");
    Ok(())
}
