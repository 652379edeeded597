//! Molecular formula parsing and rendering.
//!
//! A formula is a run of element symbols, each optionally followed by a
//! decimal count (`Mg2SiO4`). Symbols are matched longest-first against the
//! element table, so `Co` is cobalt rather than carbon + oxygen whenever
//! cobalt is registered. Repeated symbols are summed.

use crate::element::ElementTable;
use crate::id::ElementId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty formula")]
    Empty,
    #[error("cannot parse formula '{formula}': no element matches at offset {offset}")]
    UnknownSymbol { formula: String, offset: usize },
    #[error("zero count in formula '{formula}' at offset {offset}")]
    ZeroCount { formula: String, offset: usize },
    #[error("count overflow in formula '{formula}'")]
    CountOverflow { formula: String },
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Element counts of a formula unit, keyed by element id (display order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition(BTreeMap<ElementId, u32>);

impl Composition {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn count(&self, element: ElementId) -> u32 {
        self.0.get(&element).copied().unwrap_or(0)
    }

    /// Add `count` atoms of `element`. Saturates rather than wrapping.
    pub fn add(&mut self, element: ElementId, count: u32) {
        if count == 0 {
            return;
        }
        let slot = self.0.entry(element).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Add every atom of `other` to this composition.
    pub fn merge(&mut self, other: &Composition) {
        self.add_scaled(other, 1);
    }

    /// Add `times` copies of `other`.
    pub fn add_scaled(&mut self, other: &Composition, times: u32) {
        for (&element, &count) in &other.0 {
            self.add(element, count.saturating_mul(times));
        }
    }

    /// Iterate `(element, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, u32)> + '_ {
        self.0.iter().map(|(&e, &n)| (e, n))
    }

    /// Number of distinct elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total atom count.
    pub fn atoms(&self) -> u64 {
        self.0.values().map(|&n| u64::from(n)).sum()
    }
}

impl FromIterator<(ElementId, u32)> for Composition {
    fn from_iter<I: IntoIterator<Item = (ElementId, u32)>>(iter: I) -> Self {
        let mut c = Composition::new();
        for (element, count) in iter {
            c.add(element, count);
        }
        c
    }
}

/// Result of parsing a formula.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeScalars {
    pub composition: Composition,
    /// Molar mass: sum of element mass times count.
    pub mass: f64,
    /// Atom count `n`.
    pub atoms: u32,
    /// Sum of atomic numbers over all atoms.
    pub atomic_number: u32,
}

// ---------------------------------------------------------------------------
// Parse / render
// ---------------------------------------------------------------------------

/// Parse a formula against the element table.
pub fn parse(formula: &str, elements: &ElementTable) -> Result<MoleculeScalars, ParseError> {
    if formula.is_empty() {
        return Err(ParseError::Empty);
    }
    let overflow = || ParseError::CountOverflow {
        formula: formula.to_string(),
    };

    let mut composition = Composition::new();
    let mut mass = 0.0;
    let mut atoms: u32 = 0;
    let mut atomic_number: u32 = 0;
    let mut pos = 0;

    while pos < formula.len() {
        let (id, width) =
            match_symbol(&formula[pos..], elements).ok_or_else(|| ParseError::UnknownSymbol {
                formula: formula.to_string(),
                offset: pos,
            })?;
        pos += width;

        let digits = formula[pos..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        let count = if digits == 0 {
            1
        } else {
            let n: u32 = formula[pos..pos + digits].parse().map_err(|_| overflow())?;
            if n == 0 {
                return Err(ParseError::ZeroCount {
                    formula: formula.to_string(),
                    offset: pos,
                });
            }
            n
        };
        pos += digits;

        // match_symbol only returns ids present in the table.
        if let Some(element) = elements.get(id) {
            mass += element.mass * f64::from(count);
            let z = element.atomic_number.checked_mul(count).ok_or_else(overflow)?;
            atomic_number = atomic_number.checked_add(z).ok_or_else(overflow)?;
        }
        atoms = atoms.checked_add(count).ok_or_else(overflow)?;
        composition.add(id, count);
    }

    Ok(MoleculeScalars {
        composition,
        mass,
        atoms,
        atomic_number,
    })
}

fn match_symbol(rest: &str, elements: &ElementTable) -> Option<(ElementId, usize)> {
    [2, 1].into_iter().find_map(|width| {
        rest.get(..width)
            .and_then(|candidate| elements.id(candidate))
            .map(|id| (id, width))
    })
}

/// Render a composition in display order. A count of 1 is implicit and
/// elements with a zero count are skipped.
pub fn render(composition: &Composition, elements: &ElementTable) -> String {
    let mut out = String::new();
    for (id, count) in composition.iter() {
        if count == 0 {
            continue;
        }
        let Some(symbol) = elements.symbol(id) else {
            continue;
        };
        out.push_str(symbol);
        if count != 1 {
            let _ = write!(out, "{count}");
        }
    }
    out
}
