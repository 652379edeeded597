//! Mutable counters: the element pool fed by condensation draws and the
//! molecule inventory consumed by mineral assembly.

use crate::formula::Composition;
use crate::id::{ElementId, MoleculeId};
use crate::molecule::MoleculeTable;
use crate::registry::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// ElementPool
// ---------------------------------------------------------------------------

/// Atoms available for molecule synthesis, indexed by element id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementPool {
    counts: Vec<u64>,
}

impl ElementPool {
    /// A pool with every one of `element_count` elements at zero.
    pub fn new(element_count: usize) -> Self {
        Self {
            counts: vec![0; element_count],
        }
    }

    pub fn count(&self, element: ElementId) -> u64 {
        self.counts.get(element.0 as usize).copied().unwrap_or(0)
    }

    /// Add atoms of one element. Ids outside the pool are ignored.
    pub fn deposit(&mut self, element: ElementId, quantity: u64) {
        if let Some(slot) = self.counts.get_mut(element.0 as usize) {
            *slot += quantity;
        }
    }

    /// Largest multiplicity of `composition` the pool can supply right now.
    /// Zero if any required element is short, or if the composition is empty.
    pub fn capacity_for(&self, composition: &Composition) -> u64 {
        let mut capacity: Option<u64> = None;
        for (element, need) in composition.iter() {
            if need == 0 {
                continue;
            }
            let h = self.count(element) / u64::from(need);
            if h == 0 {
                return 0;
            }
            capacity = Some(capacity.map_or(h, |c| c.min(h)));
        }
        capacity.unwrap_or(0)
    }

    /// Remove `times` formula units of `composition`. Returns false and
    /// leaves the pool untouched if that would drive any count negative.
    #[must_use = "false means nothing was withdrawn"]
    pub fn withdraw(&mut self, composition: &Composition, times: u64) -> bool {
        if self.capacity_for(composition) < times {
            return false;
        }
        for (element, need) in composition.iter() {
            if let Some(slot) = self.counts.get_mut(element.0 as usize) {
                *slot -= u64::from(need) * times;
            }
        }
        true
    }

    /// Total atoms across all elements.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &n)| (ElementId(i as u16), n))
    }
}

// ---------------------------------------------------------------------------
// MoleculeInventory
// ---------------------------------------------------------------------------

/// Molecule units available for mineral assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoleculeInventory {
    counts: BTreeMap<MoleculeId, u64>,
}

impl MoleculeInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory from `(formula, quantity)` pairs.
    pub fn from_formulas<'a, I>(molecules: &MoleculeTable, entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut inventory = Self::new();
        for (formula, quantity) in entries {
            let id = molecules
                .id(formula)
                .ok_or_else(|| RegistryError::UnknownMolecule(formula.to_string()))?;
            inventory.add(id, quantity);
        }
        Ok(inventory)
    }

    pub fn add(&mut self, molecule: MoleculeId, quantity: u64) {
        if quantity > 0 {
            *self.counts.entry(molecule).or_insert(0) += quantity;
        }
    }

    pub fn quantity(&self, molecule: MoleculeId) -> u64 {
        self.counts.get(&molecule).copied().unwrap_or(0)
    }

    /// Take a single unit. Returns false (inventory unchanged) if none left.
    #[must_use = "false means no unit was taken"]
    pub fn take_one(&mut self, molecule: MoleculeId) -> bool {
        match self.counts.get_mut(&molecule) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }

    /// Return one unit for each entry of an undo log.
    pub fn restore(&mut self, taken: &[MoleculeId]) {
        for &molecule in taken {
            *self.counts.entry(molecule).or_insert(0) += 1;
        }
    }

    /// Total units across all molecules.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate `(molecule, quantity)` pairs, including exhausted entries.
    pub fn iter(&self) -> impl Iterator<Item = (MoleculeId, u64)> + '_ {
        self.counts.iter().map(|(&m, &n)| (m, n))
    }
}
