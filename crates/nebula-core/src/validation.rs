//! Invariant checks for condensation runs: atom conservation and
//! reproducibility from a seed.

use crate::condensation::{CondensationConfig, CondensationEngine, CondensationError};
use crate::id::ElementId;
use crate::registry::Registry;
use crate::rng;
use rand::Rng;

// ---------------------------------------------------------------------------
// Conservation
// ---------------------------------------------------------------------------

/// Per-element mismatch between atoms drawn and atoms accounted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementImbalance {
    pub element: ElementId,
    pub drawn: u64,
    pub pooled: u64,
    pub bound: u64,
}

/// Result of a conservation check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConservationReport {
    pub imbalances: Vec<ElementImbalance>,
}

impl ConservationReport {
    pub fn is_balanced(&self) -> bool {
        self.imbalances.is_empty()
    }
}

/// Verify `drawn == pooled + bound in formed molecules` for every element.
pub fn check_conservation<R>(engine: &CondensationEngine<'_, R>) -> ConservationReport {
    let registry = engine.registry();
    let mut bound = vec![0u64; registry.elements().len()];
    for (id, spec) in registry.molecules().iter() {
        let formed = engine.formed(id);
        if formed == 0 {
            continue;
        }
        for (element, need) in spec.composition.iter() {
            if let Some(slot) = bound.get_mut(element.0 as usize) {
                *slot += formed * u64::from(need);
            }
        }
    }

    let imbalances = registry
        .elements()
        .iter()
        .filter_map(|(element, _)| {
            let drawn = engine.drawn(element);
            let pooled = engine.pool().count(element);
            let bound = bound[element.0 as usize];
            (drawn != pooled + bound).then_some(ElementImbalance {
                element,
                drawn,
                pooled,
                bound,
            })
        })
        .collect();

    ConservationReport { imbalances }
}

// ---------------------------------------------------------------------------
// Determinism validation
// ---------------------------------------------------------------------------

/// Result of a determinism validation run.
#[derive(Debug)]
pub struct DeterminismResult {
    /// Whether the two runs produced identical results.
    pub is_deterministic: bool,
    /// Round at which divergence was first detected (if any).
    pub divergence_round: Option<u64>,
    /// Emissions compared, summed over both runs' matching rounds.
    pub emissions_compared: usize,
}

/// Run two engines from the same seed for `rounds` rounds and compare
/// emissions and pools after every round.
pub fn validate_determinism(
    registry: &Registry,
    config: CondensationConfig,
    seed: u64,
    rounds: u64,
) -> Result<DeterminismResult, CondensationError> {
    let mut a = CondensationEngine::new(registry, config, rng::seeded(seed))?;
    let mut b = CondensationEngine::new(registry, config, rng::seeded(seed))?;
    Ok(compare_runs(&mut a, &mut b, rounds))
}

fn compare_runs<R: Rng>(
    a: &mut CondensationEngine<'_, R>,
    b: &mut CondensationEngine<'_, R>,
    rounds: u64,
) -> DeterminismResult {
    let mut emissions_compared = 0;
    for _ in 0..rounds {
        let ea = a.round();
        let eb = b.round();
        if ea != eb || a.pool() != b.pool() {
            return DeterminismResult {
                is_deterministic: false,
                divergence_round: Some(a.rounds()),
                emissions_compared,
            };
        }
        emissions_compared += ea.len();
    }
    DeterminismResult {
        is_deterministic: true,
        divergence_round: None,
        emissions_compared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn fresh_engine_is_balanced() {
        let reg = nebula_registry();
        let engine =
            CondensationEngine::new(&reg, CondensationConfig::default(), rng::seeded(1)).unwrap();
        assert!(check_conservation(&engine).is_balanced());
    }

    #[test]
    fn engine_stays_balanced_over_rounds() {
        let reg = nebula_registry();
        let mut engine =
            CondensationEngine::new(&reg, CondensationConfig::default(), rng::seeded(2)).unwrap();
        for _ in 0..25 {
            engine.round();
            let report = check_conservation(&engine);
            assert!(report.is_balanced(), "{:?}", report.imbalances);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let reg = nebula_registry();
        let result = validate_determinism(&reg, CondensationConfig::default(), 42, 30).unwrap();
        assert!(result.is_deterministic);
        assert_eq!(result.divergence_round, None);
        assert!(result.emissions_compared > 0);
    }

    #[test]
    fn different_seeds_diverge() {
        let reg = nebula_registry();
        let config = CondensationConfig::default();
        let mut a = CondensationEngine::new(&reg, config, rng::seeded(1)).unwrap();
        let mut b = CondensationEngine::new(&reg, config, rng::seeded(2)).unwrap();
        let result = compare_runs(&mut a, &mut b, 10);
        assert!(!result.is_deterministic);
        assert!(matches!(result.divergence_round, Some(r) if (1..=10).contains(&r)));
    }

    #[test]
    fn invalid_config_propagates() {
        let reg = nebula_registry();
        let config = CondensationConfig {
            draw_size: 0,
            ..Default::default()
        };
        assert!(validate_determinism(&reg, config, 0, 1).is_err());
    }
}
