//! Serde data file structs for nebular reference tables.
//!
//! These structs define the on-disk format for elements, molecules and
//! mineral recipes. They are deserialized from RON, JSON, or TOML data files
//! and then registered on a `RegistryBuilder` by the loader. TOML files hold
//! each list under a top-level key (`[[elements]]`, `[[molecules]]`,
//! `[[minerals]]`).

use nebula_core::mineral::FormSpec;
use serde::Deserialize;

// ===========================================================================
// Elements
// ===========================================================================

/// An element definition in a data file. File order is display order.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementData {
    pub symbol: String,
    /// Relative sampling weight (the built-in table uses Si = 1000).
    pub abundance: f64,
    /// Atomic mass in Da.
    pub mass: f64,
    pub atomic_number: u32,
}

// ===========================================================================
// Molecules
// ===========================================================================

/// A molecule definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct MoleculeData {
    pub formula: String,
    /// Triple point (or melting point) in K.
    #[serde(default)]
    pub triple_point: Option<f64>,
    /// Standard enthalpy of formation in kJ/mol.
    #[serde(default)]
    pub enthalpy: Option<f64>,
}

// ===========================================================================
// Minerals
// ===========================================================================

/// A mineral recipe in a data file. Forms reference molecules by formula:
/// `Sequence([Alternation([Atom("MgO"), Atom("MnO")]), Atom("Cr2O3")])`.
#[derive(Debug, Clone, Deserialize)]
pub struct MineralData {
    pub name: String,
    pub form: FormSpec,
}

impl MineralData {
    /// Every molecule formula the form references, in tree order.
    pub fn molecule_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        collect_refs(&self.form, &mut refs);
        refs
    }
}

fn collect_refs<'a>(form: &'a FormSpec, out: &mut Vec<&'a str>) {
    match form {
        FormSpec::Atom(formula) => out.push(formula),
        FormSpec::Alternation(branches) | FormSpec::Sequence(branches) => {
            for branch in branches {
                collect_refs(branch, out);
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
