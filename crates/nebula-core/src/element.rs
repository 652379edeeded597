//! Element reference table: symbols, abundance weights, masses.

use crate::id::ElementId;
use std::collections::HashMap;

/// An element definition in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub symbol: String,
    /// Relative abundance. Sampling probability is proportional to this.
    pub weight: f64,
    /// Atomic mass in daltons.
    pub mass: f64,
    pub atomic_number: u32,
}

/// Immutable element table. Ids follow registration order, which is also
/// the display order used when rendering formulas.
#[derive(Debug, Clone)]
pub struct ElementTable {
    elements: Vec<Element>,
    symbol_to_id: HashMap<String, ElementId>,
}

impl ElementTable {
    pub(crate) fn new(elements: Vec<Element>) -> Self {
        let symbol_to_id = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.symbol.clone(), ElementId(i as u16)))
            .collect();
        Self {
            elements,
            symbol_to_id,
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    pub fn id(&self, symbol: &str) -> Option<ElementId> {
        self.symbol_to_id.get(symbol).copied()
    }

    pub fn symbol(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|e| e.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate elements in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u16), e))
    }

    /// Abundance weights in id order, for weighted sampling.
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.elements.iter().map(|e| e.weight)
    }
}

/// Checks that a symbol looks like an element symbol: one uppercase ASCII
/// letter, optionally followed by one lowercase ASCII letter.
pub(crate) fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), None, None) => a.is_ascii_uppercase(),
        (Some(a), Some(b), None) => a.is_ascii_uppercase() && b.is_ascii_lowercase(),
        _ => false,
    }
}
