//! Nebula Core -- stochastic condensation of molecules and minerals from a
//! weighted element source.
//!
//! This crate provides the reference tables (elements, molecules, mineral
//! recipes), the formula parser, the molecule condensation engine, the
//! transactional mineral assembler, and a scenario driver tying them
//! together.
//!
//! # Pipeline
//!
//! 1. **Registry** -- Elements, molecules and mineral recipes are registered
//!    on a [`registry::RegistryBuilder`], then validated and frozen by
//!    `build()`. Formulas are parsed and recipe references resolved here, so
//!    malformed data fails at load time and never at run time.
//! 2. **Condensation** -- A [`condensation::CondensationEngine`] draws atoms
//!    by abundance into an element pool and greedily forms molecules in a
//!    fixed energy priority order. It is an unbounded iterator of
//!    `(molecule, multiplicity)` emissions; the caller decides when to stop.
//! 3. **Assembly** -- [`assembler::assemble`] matches randomly chosen
//!    recipes against a molecule inventory until every recipe has failed
//!    once. Each Sequence either consumes all of its molecules or none.
//! 4. **Classification** -- Every assembled mineral gets a bulk composition
//!    and a [`silica::SilicaClass`] from its SiO2 mass fraction.
//!
//! ```rust,ignore
//! let registry = builder.build()?;
//! let mut rng = rng::seeded(42);
//! let params = ScenarioParams::sample(&mut rng, &ScenarioConfig::default())?;
//! let outcome = scenario::run_scenario(&registry, &params, &mut rng)?;
//! ```
//!
//! # Key Types
//!
//! - [`registry::Registry`] -- Immutable reference tables, shareable across
//!   threads.
//! - [`formula::Composition`] -- Element counts in display order.
//! - [`pool::ElementPool`] / [`pool::MoleculeInventory`] -- The mutable
//!   state each run owns exclusively.
//! - [`mineral::MineralForm`] -- Atom / Alternation / Sequence recipe tree.
//! - [`scenario::Census`] -- Condensed molecule counts and mass shares.

pub mod assembler;
pub mod condensation;
pub mod element;
pub mod formula;
pub mod id;
pub mod mineral;
pub mod molecule;
pub mod pool;
pub mod registry;
pub mod rng;
pub mod scenario;
pub mod silica;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
