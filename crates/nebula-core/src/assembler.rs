//! Mineral assembly: repeatedly match randomly chosen recipes against a
//! molecule inventory until every recipe has failed once.

use crate::formula::{self, Composition};
use crate::id::MoleculeId;
use crate::mineral::draw_from;
use crate::pool::MoleculeInventory;
use crate::registry::Registry;
use crate::silica::SilicaClass;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Bulk composition of everything drawn for one mineral kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateComposition {
    pub mass: f64,
    pub atoms: u64,
    pub atomic_number: u64,
    /// SiO2 mass fraction in `[0, 1]`.
    pub silica_fraction: f64,
    pub class: SilicaClass,
}

/// Accrued results for one mineral kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MineralRecord {
    /// Successful draws.
    pub draws: u64,
    /// Consumed molecule units by formula.
    pub molecules: BTreeMap<String, u64>,
    /// Occurrences of each realized aggregate formula.
    pub formulas: BTreeMap<String, u64>,
    /// Set once assembly halts.
    pub composition: Option<AggregateComposition>,
}

/// Run mineral assembly over `inventory` with the registry's catalog.
///
/// Recipes are picked uniformly at random from a working set; a recipe is
/// dropped from the set the first time it fails to draw. The loop ends when
/// the set is empty. Recipes that never succeed are absent from the result.
pub fn assemble<R: Rng + ?Sized>(
    registry: &Registry,
    inventory: &mut MoleculeInventory,
    rng: &mut R,
) -> BTreeMap<String, MineralRecord> {
    let recipes = registry.minerals().recipes();
    let mut working: Vec<usize> = (0..recipes.len()).collect();
    let mut records: BTreeMap<String, MineralRecord> = BTreeMap::new();

    while !working.is_empty() {
        let slot = rng.random_range(0..working.len());
        let recipe = &recipes[working[slot]];

        match draw_from(&recipe.form, inventory, rng) {
            Some(units) => {
                let record = records.entry(recipe.name.clone()).or_default();
                let formula = accrue(registry, record, &units);
                trace!(mineral = %recipe.name, %formula, "drew mineral");
            }
            None => {
                debug!(mineral = %recipe.name, remaining = working.len() - 1, "recipe exhausted");
                working.swap_remove(slot);
            }
        }
    }

    for record in records.values_mut() {
        record.composition = finalize(registry, record);
    }
    debug!(minerals = records.len(), leftover = inventory.total(), "assembly finished");
    records
}

/// Record one successful draw. Returns the rendered aggregate formula.
fn accrue(registry: &Registry, record: &mut MineralRecord, units: &[MoleculeId]) -> String {
    let molecules = registry.molecules();
    let mut aggregate = Composition::new();
    for &unit in units {
        if let Some(spec) = molecules.get(unit) {
            *record.molecules.entry(spec.formula.clone()).or_insert(0) += 1;
            aggregate.merge(&spec.composition);
        }
    }
    let rendered = formula::render(&aggregate, registry.elements());
    *record.formulas.entry(rendered.clone()).or_insert(0) += 1;
    record.draws += 1;
    rendered
}

/// Bulk composition over every occurrence of every rendered formula.
///
/// Each distinct formula is parsed once and scaled by its occurrence count,
/// which is the same as parsing all occurrences concatenated.
fn finalize(registry: &Registry, record: &MineralRecord) -> Option<AggregateComposition> {
    let elements = registry.elements();
    let mut mass = 0.0;
    let mut atoms = 0u64;
    let mut atomic_number = 0u64;
    let mut silicon = 0u64;
    let mut oxygen = 0u64;
    let si = elements.id("Si");
    let o = elements.id("O");

    for (rendered, &occurrences) in &record.formulas {
        // Rendered from known elements, so this only fails on an empty draw.
        let Ok(scalars) = formula::parse(rendered, elements) else {
            continue;
        };
        mass += scalars.mass * occurrences as f64;
        atoms += u64::from(scalars.atoms) * occurrences;
        atomic_number += u64::from(scalars.atomic_number) * occurrences;
        silicon += si.map_or(0, |id| u64::from(scalars.composition.count(id))) * occurrences;
        oxygen += o.map_or(0, |id| u64::from(scalars.composition.count(id))) * occurrences;
    }

    if atoms == 0 {
        return None;
    }

    let silica_units = silicon.min(oxygen / 2);
    let silica_fraction = match registry.silica_mass() {
        Some(silica_mass) if mass > 0.0 => silica_mass * silica_units as f64 / mass,
        _ => 0.0,
    };

    Some(AggregateComposition {
        mass,
        atoms,
        atomic_number,
        silica_fraction,
        class: SilicaClass::classify(silica_fraction),
    })
}
