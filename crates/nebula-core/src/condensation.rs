//! Stochastic molecule synthesis from a weighted element source.
//!
//! Each round draws `draw_size` atoms (with replacement, weighted by
//! abundance) into the element pool, then walks the molecule table in
//! condensation priority order. Every molecule the pool can currently
//! build is formed at its maximum integer multiplicity and its atoms are
//! removed from the pool. Molecules passing the mass and triple-point gates
//! are emitted; the rest still consume their atoms.
//!
//! The engine is an unbounded [`Iterator`]: the caller decides when to stop.
//! A molecule that passes the gates can still be starved forever by
//! higher-priority molecules sharing its atoms, so callers that need to
//! terminate should pull with [`CondensationEngine::next_within`].

use crate::id::{ElementId, MoleculeId};
use crate::molecule::MoleculeSpec;
use crate::pool::ElementPool;
use crate::registry::Registry;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CondensationConfig {
    /// Atoms drawn per round.
    pub draw_size: u32,
    /// Inclusive lower bound on emitted molecule mass.
    pub min_mass: f64,
    /// Inclusive lower bound on emitted molecule triple point. 0 disables it.
    pub min_triple_point: f64,
}

impl Default for CondensationConfig {
    fn default() -> Self {
        Self {
            draw_size: 1000,
            min_mass: 0.0,
            min_triple_point: 0.0,
        }
    }
}

impl CondensationConfig {
    fn passes(&self, spec: &MoleculeSpec) -> bool {
        spec.mass >= self.min_mass && spec.gate_temperature() >= self.min_triple_point
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CondensationError {
    #[error("draw size must be positive")]
    ZeroDrawSize,
    #[error("{field} cutoff must be finite, got {value}")]
    InvalidCutoff { field: &'static str, value: f64 },
    #[error("element weights cannot be sampled: {0}")]
    Weights(#[from] rand::distr::weighted::Error),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One emitted batch of identical molecules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission<'a> {
    pub molecule: MoleculeId,
    pub formula: &'a str,
    pub multiplicity: u64,
}

/// Condensation run state. Owns its element pool exclusively.
#[derive(Debug)]
pub struct CondensationEngine<'a, R> {
    registry: &'a Registry,
    config: CondensationConfig,
    sampler: WeightedIndex<f64>,
    rng: R,
    pool: ElementPool,
    drawn: Vec<u64>,
    formed: Vec<u64>,
    rounds: u64,
    pending: VecDeque<Emission<'a>>,
    can_emit: bool,
}

impl<'a, R: Rng> CondensationEngine<'a, R> {
    pub fn new(
        registry: &'a Registry,
        config: CondensationConfig,
        rng: R,
    ) -> Result<Self, CondensationError> {
        if config.draw_size == 0 {
            return Err(CondensationError::ZeroDrawSize);
        }
        for (field, value) in [
            ("mass", config.min_mass),
            ("triple point", config.min_triple_point),
        ] {
            if !value.is_finite() {
                return Err(CondensationError::InvalidCutoff { field, value });
            }
        }

        let elements = registry.elements();
        let sampler = WeightedIndex::new(elements.weights())?;

        // A molecule can only ever be emitted if it passes the gates and
        // every element it needs can actually be drawn.
        let can_emit = registry.molecules().iter().any(|(_, spec)| {
            config.passes(spec)
                && spec.composition.iter().all(|(e, _)| {
                    elements.get(e).is_some_and(|element| element.weight > 0.0)
                })
        });

        Ok(Self {
            registry,
            config,
            sampler,
            rng,
            pool: ElementPool::new(elements.len()),
            drawn: vec![0; elements.len()],
            formed: vec![0; registry.molecules().len()],
            rounds: 0,
            pending: VecDeque::new(),
            can_emit,
        })
    }

    /// Run exactly one draw-and-condense round and return its emissions,
    /// which may be empty.
    pub fn round(&mut self) -> Vec<Emission<'a>> {
        let mut batch = vec![0u64; self.drawn.len()];
        for _ in 0..self.config.draw_size {
            batch[self.sampler.sample(&mut self.rng)] += 1;
        }
        for (index, &count) in batch.iter().enumerate() {
            if count > 0 {
                self.pool.deposit(ElementId(index as u16), count);
                self.drawn[index] += count;
            }
        }

        let registry: &'a Registry = self.registry;
        let molecules = registry.molecules();
        let mut emissions = Vec::new();
        for &id in molecules.priority() {
            let Some(spec) = molecules.get(id) else {
                continue;
            };
            let multiplicity = self.pool.capacity_for(&spec.composition);
            if multiplicity == 0 || !self.pool.withdraw(&spec.composition, multiplicity) {
                continue;
            }
            self.formed[id.0 as usize] += multiplicity;

            if self.config.passes(spec) {
                emissions.push(Emission {
                    molecule: id,
                    formula: spec.formula.as_str(),
                    multiplicity,
                });
            } else {
                trace!(molecule = %spec.formula, multiplicity, "formed below cutoff");
            }
        }

        self.rounds += 1;
        debug!(
            round = self.rounds,
            emitted = emissions.len(),
            pool = self.pool.total(),
            "condensation round"
        );
        emissions
    }
}

impl<'a, R> CondensationEngine<'a, R> {
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn config(&self) -> &CondensationConfig {
        &self.config
    }

    /// Atoms currently available.
    pub fn pool(&self) -> &ElementPool {
        &self.pool
    }

    /// Cumulative atoms drawn of one element.
    pub fn drawn(&self, element: ElementId) -> u64 {
        self.drawn.get(element.0 as usize).copied().unwrap_or(0)
    }

    /// Cumulative units formed of one molecule, including gate-filtered ones.
    pub fn formed(&self, molecule: MoleculeId) -> u64 {
        self.formed.get(molecule.0 as usize).copied().unwrap_or(0)
    }

    /// Rounds run so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Whether any molecule passes the emission gates with every element
    /// drawable. False means nothing will ever be emitted; true does not
    /// guarantee an emission, since priority can starve the molecule.
    pub fn can_emit(&self) -> bool {
        self.can_emit
    }
}

impl<'a, R: Rng> CondensationEngine<'a, R> {
    /// Like [`Iterator::next`], but gives up after `max_idle_rounds`
    /// consecutive rounds without an emission.
    pub fn next_within(&mut self, max_idle_rounds: u64) -> Option<Emission<'a>> {
        if let Some(emission) = self.pending.pop_front() {
            return Some(emission);
        }
        if !self.can_emit {
            return None;
        }
        for _ in 0..max_idle_rounds {
            let batch = self.round();
            self.pending.extend(batch);
            if let Some(emission) = self.pending.pop_front() {
                return Some(emission);
            }
        }
        debug!(
            rounds = self.rounds,
            max_idle_rounds, "no emission within idle budget"
        );
        None
    }
}

impl<'a, R: Rng> Iterator for CondensationEngine<'a, R> {
    type Item = Emission<'a>;

    /// Pull the next emission, running as many rounds as needed.
    ///
    /// Returns `None` when no molecule passes the gates with drawable
    /// elements ([`CondensationEngine::can_emit`] is false). Otherwise this
    /// keeps running rounds and does not return if priority starves every
    /// gated molecule.
    fn next(&mut self) -> Option<Self::Item> {
        if !self.can_emit {
            return None;
        }
        loop {
            if let Some(emission) = self.pending.pop_front() {
                return Some(emission);
            }
            let batch = self.round();
            self.pending.extend(batch);
        }
    }
}
