//! Molecule reference table with derived energies and condensation priority.

use crate::formula::{Composition, MoleculeScalars};
use crate::id::MoleculeId;
use std::collections::HashMap;

/// A molecule definition in the registry, with scalars precomputed by the
/// formula parser.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeSpec {
    pub formula: String,
    pub composition: Composition,
    /// Molar mass in daltons.
    pub mass: f64,
    /// Atom count `n`.
    pub atoms: u32,
    pub atomic_number: u32,
    /// Triple-point temperature in kelvin (melting point where unknown).
    pub triple_point: Option<f64>,
    /// Standard enthalpy of formation in kJ/mol.
    pub enthalpy: Option<f64>,
    /// `Hf / n`.
    pub energy_per_atom: f64,
    /// `Hf / (n - 1)`, or 0 for single atoms.
    pub energy_per_bond: f64,
}

impl MoleculeSpec {
    pub(crate) fn new(
        formula: String,
        scalars: MoleculeScalars,
        triple_point: Option<f64>,
        enthalpy: Option<f64>,
    ) -> Self {
        let hf = enthalpy.unwrap_or(0.0);
        let n = f64::from(scalars.atoms);
        let energy_per_atom = if scalars.atoms > 0 { hf / n } else { 0.0 };
        let energy_per_bond = if scalars.atoms > 1 { hf / (n - 1.0) } else { 0.0 };
        Self {
            formula,
            composition: scalars.composition,
            mass: scalars.mass,
            atoms: scalars.atoms,
            atomic_number: scalars.atomic_number,
            triple_point,
            enthalpy,
            energy_per_atom,
            energy_per_bond,
        }
    }

    /// Triple point used by the emission gate; an unknown value counts as 0 K.
    pub fn gate_temperature(&self) -> f64 {
        self.triple_point.unwrap_or(0.0)
    }
}

/// Immutable molecule table.
#[derive(Debug, Clone)]
pub struct MoleculeTable {
    molecules: Vec<MoleculeSpec>,
    formula_to_id: HashMap<String, MoleculeId>,
    priority: Vec<MoleculeId>,
}

impl MoleculeTable {
    pub(crate) fn new(molecules: Vec<MoleculeSpec>) -> Self {
        let formula_to_id = molecules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.formula.clone(), MoleculeId(i as u32)))
            .collect();
        let priority = condensation_order(&molecules);
        Self {
            molecules,
            formula_to_id,
            priority,
        }
    }

    pub fn get(&self, id: MoleculeId) -> Option<&MoleculeSpec> {
        self.molecules.get(id.0 as usize)
    }

    pub fn id(&self, formula: &str) -> Option<MoleculeId> {
        self.formula_to_id.get(formula).copied()
    }

    pub fn formula(&self, id: MoleculeId) -> Option<&str> {
        self.get(id).map(|m| m.formula.as_str())
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoleculeId, &MoleculeSpec)> {
        self.molecules
            .iter()
            .enumerate()
            .map(|(i, m)| (MoleculeId(i as u32), m))
    }

    /// Condensation priority: ascending energy per atom, then descending
    /// mass. Computed once at build time.
    pub fn priority(&self) -> &[MoleculeId] {
        &self.priority
    }
}

fn condensation_order(molecules: &[MoleculeSpec]) -> Vec<MoleculeId> {
    let mut order: Vec<MoleculeId> = (0..molecules.len() as u32).map(MoleculeId).collect();
    // Stable: equal keys keep registration order.
    order.sort_by(|&a, &b| {
        let (ma, mb) = (&molecules[a.0 as usize], &molecules[b.0 as usize]);
        ma.energy_per_atom
            .total_cmp(&mb.energy_per_atom)
            .then_with(|| mb.mass.total_cmp(&ma.mass))
    });
    order
}
