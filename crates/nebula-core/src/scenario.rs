//! Scenario driver: sample nebular parameters, condense molecules up to a
//! target count, then assemble minerals from the resulting inventory.
//!
//! The orbital distance is the magnitude of two independent Gaussian draws,
//! and the equilibrium temperature follows `T = sqrt(T_ref^2 / d)` (so that
//! `d * T^2` is constant), floored at the background temperature. The
//! temperature doubles as the triple-point cutoff: only molecules that stay
//! solid at that temperature are counted.

use crate::assembler::{MineralRecord, assemble};
use crate::condensation::{CondensationConfig, CondensationEngine, CondensationError};
use crate::pool::MoleculeInventory;
use crate::registry::{Registry, RegistryError};
use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::info;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Ranges and constants for parameter sampling. Every field has a default,
/// so partial config files are valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Standard deviation of each Gaussian component of the orbital distance.
    pub distance_sigma_au: f64,
    /// Sampled distances are clamped to at least this.
    pub min_distance_au: f64,
    /// Equilibrium temperature at 1 AU.
    pub reference_temperature_k: f64,
    /// Lower bound on the equilibrium temperature.
    pub temperature_floor_k: f64,
    /// Atoms drawn per round, sampled from `[min, max)`.
    pub draw_size_min: u32,
    pub draw_size_max: u32,
    /// Molecule units to condense, sampled from `[min, max)`.
    pub target_min: u64,
    pub target_max: u64,
    /// Mass cutoff for emitted molecules.
    pub min_mass: f64,
    /// Consecutive rounds without an emission before a run gives up.
    pub max_idle_rounds: u64,
    /// Seed for runs that do not supply their own.
    pub seed: Option<u64>,
}

/// Default idle-round budget for condensation runs.
pub const DEFAULT_MAX_IDLE_ROUNDS: u64 = 10_000;

fn default_max_idle_rounds() -> u64 {
    DEFAULT_MAX_IDLE_ROUNDS
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            distance_sigma_au: (2.06 + 3.27) / 2.0,
            min_distance_au: 0.01,
            reference_temperature_k: 250.0,
            temperature_floor_k: 3.2,
            draw_size_min: 1000,
            draw_size_max: 10000,
            target_min: 1000,
            target_max: 20000,
            min_mass: 0.0,
            max_idle_rounds: DEFAULT_MAX_IDLE_ROUNDS,
            seed: None,
        }
    }
}

impl ScenarioConfig {
    /// Check that every range is non-empty and every constant is usable.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for (field, value) in [
            ("distance_sigma_au", self.distance_sigma_au),
            ("min_distance_au", self.min_distance_au),
            ("reference_temperature_k", self.reference_temperature_k),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScenarioError::InvalidValue { field, value });
            }
        }
        for (field, value) in [
            ("temperature_floor_k", self.temperature_floor_k),
            ("min_mass", self.min_mass),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioError::InvalidValue { field, value });
            }
        }
        if self.draw_size_min == 0 || self.draw_size_min >= self.draw_size_max {
            return Err(ScenarioError::EmptyRange {
                field: "draw_size",
                min: u64::from(self.draw_size_min),
                max: u64::from(self.draw_size_max),
            });
        }
        if self.max_idle_rounds == 0 {
            return Err(ScenarioError::InvalidValue {
                field: "max_idle_rounds",
                value: 0.0,
            });
        }
        if self.target_min >= self.target_max {
            return Err(ScenarioError::EmptyRange {
                field: "target",
                min: self.target_min,
                max: self.target_max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("{field} must be finite and in range, got {value}")]
    InvalidValue { field: &'static str, value: f64 },
    #[error("{field} range [{min}, {max}) is empty")]
    EmptyRange {
        field: &'static str,
        min: u64,
        max: u64,
    },
    #[error(transparent)]
    Condensation(#[from] CondensationError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// The concrete parameters of one scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub orbital_distance_au: f64,
    pub temperature_k: f64,
    pub draw_size: u32,
    pub target_molecules: u64,
    pub min_mass: f64,
    #[serde(default = "default_max_idle_rounds")]
    pub max_idle_rounds: u64,
}

impl ScenarioParams {
    /// Draw a parameter set from the configured distributions.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, config: &ScenarioConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        let x = sample_gaussian(rng, 0.0, config.distance_sigma_au);
        let y = sample_gaussian(rng, 0.0, config.distance_sigma_au);
        let orbital_distance_au = x.hypot(y).max(config.min_distance_au);
        let temperature_k = equilibrium_temperature(
            orbital_distance_au,
            config.reference_temperature_k,
            config.temperature_floor_k,
        );
        let draw_size = rng.random_range(config.draw_size_min..config.draw_size_max);
        let target_molecules = rng.random_range(config.target_min..config.target_max);
        Ok(Self {
            orbital_distance_au,
            temperature_k,
            draw_size,
            target_molecules,
            min_mass: config.min_mass,
            max_idle_rounds: config.max_idle_rounds,
        })
    }

    /// Engine settings: the temperature is the triple-point cutoff.
    pub fn condensation_config(&self) -> CondensationConfig {
        CondensationConfig {
            draw_size: self.draw_size,
            min_mass: self.min_mass,
            min_triple_point: self.temperature_k,
        }
    }
}

/// Sample from N(mean, std_dev^2) using the Box-Muller transform.
pub fn sample_gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    // 1 - u keeps the logarithm argument in (0, 1].
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z
}

/// `max(sqrt(reference^2 / distance), floor)`.
pub fn equilibrium_temperature(distance_au: f64, reference_k: f64, floor_k: f64) -> f64 {
    (reference_k * reference_k / distance_au).sqrt().max(floor_k)
}

// ---------------------------------------------------------------------------
// Census
// ---------------------------------------------------------------------------

/// One molecule's share of a census.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassShare {
    pub formula: String,
    pub units: u64,
    pub mass: f64,
    /// Percentage of the census' total mass.
    pub percent: f64,
}

/// Molecules collected from a condensation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    /// Units collected per formula.
    pub counts: BTreeMap<String, u64>,
    /// Mass shares, heaviest first.
    pub shares: Vec<MassShare>,
    pub total_units: u64,
    pub total_mass: f64,
    /// False when the engine stopped emitting before the target was reached.
    pub reached_target: bool,
}

impl Census {
    /// Convert the collected units into an inventory for mineral assembly.
    pub fn to_inventory(&self, registry: &Registry) -> Result<MoleculeInventory, RegistryError> {
        MoleculeInventory::from_formulas(
            registry.molecules(),
            self.counts.iter().map(|(formula, &units)| (formula.as_str(), units)),
        )
    }
}

/// Pull emissions until the running total reaches `target`.
///
/// The last emission is taken whole, so the total usually overshoots. The
/// run stops early, with `reached_target` false, once `max_idle_rounds`
/// consecutive rounds pass without an emission.
pub fn condense_until<R: Rng>(
    engine: &mut CondensationEngine<'_, R>,
    target: u64,
    max_idle_rounds: u64,
) -> Census {
    let registry = engine.registry();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_units = 0u64;

    while total_units < target {
        let Some(emission) = engine.next_within(max_idle_rounds) else {
            break;
        };
        *counts.entry(emission.formula.to_string()).or_insert(0) += emission.multiplicity;
        total_units += emission.multiplicity;
    }

    let molecules = registry.molecules();
    let mut shares: Vec<MassShare> = counts
        .iter()
        .map(|(formula, &units)| {
            let unit_mass = molecules
                .id(formula)
                .and_then(|id| molecules.get(id))
                .map_or(0.0, |spec| spec.mass);
            MassShare {
                formula: formula.clone(),
                units,
                mass: unit_mass * units as f64,
                percent: 0.0,
            }
        })
        .collect();
    let total_mass: f64 = shares.iter().map(|s| s.mass).sum();
    if total_mass > 0.0 {
        for share in &mut shares {
            share.percent = share.mass * 100.0 / total_mass;
        }
    }
    shares.sort_by(|a, b| b.mass.total_cmp(&a.mass));

    Census {
        counts,
        shares,
        total_units,
        total_mass,
        reached_target: total_units >= target,
    }
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// Everything produced by one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub params: ScenarioParams,
    pub census: Census,
    pub minerals: BTreeMap<String, MineralRecord>,
    /// Molecule units no recipe could use, by formula.
    pub leftover: BTreeMap<String, u64>,
    pub rounds: u64,
}

/// Condense with `params`, then assemble minerals from the census.
pub fn run_scenario<R: Rng>(
    registry: &Registry,
    params: &ScenarioParams,
    rng: &mut R,
) -> Result<ScenarioOutcome, ScenarioError> {
    let mut engine = CondensationEngine::new(registry, params.condensation_config(), &mut *rng)?;
    let census = condense_until(&mut engine, params.target_molecules, params.max_idle_rounds);
    let rounds = engine.rounds();
    drop(engine);

    let mut inventory = census.to_inventory(registry)?;
    let minerals = assemble(registry, &mut inventory, rng);

    let molecules = registry.molecules();
    let leftover = inventory
        .iter()
        .filter(|&(_, units)| units > 0)
        .filter_map(|(id, units)| molecules.formula(id).map(|f| (f.to_string(), units)))
        .collect();

    info!(
        distance_au = params.orbital_distance_au,
        temperature_k = params.temperature_k,
        rounds,
        molecules = census.total_units,
        minerals = minerals.len(),
        "scenario finished"
    );

    Ok(ScenarioOutcome {
        params: *params,
        census,
        minerals,
        leftover,
        rounds,
    })
}

/// Sample parameters and run one scenario from a seed.
pub fn run_seeded(
    registry: &Registry,
    config: &ScenarioConfig,
    seed: u64,
) -> Result<ScenarioOutcome, ScenarioError> {
    let mut rng = rng::seeded(seed);
    let params = ScenarioParams::sample(&mut rng, config)?;
    run_scenario(registry, &params, &mut rng)
}

/// `count` well-separated seeds derived from `base`.
pub fn batch_seeds(base: u64, count: usize) -> Vec<u64> {
    (0..count as u64).map(|i| rng::derive_seed(base, i)).collect()
}

/// Run one independent scenario per seed in parallel. The registry is
/// shared read-only; every run owns its generator, pool and inventory.
#[cfg(feature = "parallel")]
pub fn run_batch(
    registry: &Registry,
    seeds: &[u64],
    config: &ScenarioConfig,
) -> Vec<Result<ScenarioOutcome, ScenarioError>> {
    use rayon::prelude::*;

    seeds
        .par_iter()
        .map(|&seed| run_seeded(registry, config, seed))
        .collect()
}
