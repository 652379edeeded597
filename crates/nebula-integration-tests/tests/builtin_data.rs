//! The embedded data set against the in-code fixture tables.
//!
//! `nebula_core::test_utils` carries the same tables as Rust constants so
//! that core tests do not depend on the data crate. These tests keep the two
//! copies from drifting apart.

use nebula_core::registry::Registry;
use nebula_core::test_utils::*;
use nebula_data::builtin_registry;

fn formulas_in_priority_order(registry: &Registry) -> Vec<String> {
    let molecules = registry.molecules();
    molecules
        .priority()
        .iter()
        .filter_map(|&id| molecules.formula(id).map(str::to_string))
        .collect()
}

#[test]
fn elements_match_fixture_table() {
    let registry = builtin_registry().unwrap();
    let elements = registry.elements();
    assert_eq!(elements.len(), NEBULA_ELEMENTS.len());

    for (i, ((id, element), &(symbol, weight, mass, z))) in
        elements.iter().zip(NEBULA_ELEMENTS).enumerate()
    {
        assert_eq!(element.symbol, symbol, "element {i} out of display order");
        assert_eq!(elements.id(symbol), Some(id));
        assert_eq!(element.weight, weight, "{symbol} abundance");
        assert_eq!(element.mass, mass, "{symbol} mass");
        assert_eq!(element.atomic_number, z, "{symbol} atomic number");
    }
}

#[test]
fn molecules_match_fixture_table() {
    let registry = builtin_registry().unwrap();
    let molecules = registry.molecules();
    assert_eq!(molecules.len(), 58);

    for &(formula, t3, hf) in NEBULA_MOLECULES {
        let id = molecules
            .id(formula)
            .unwrap_or_else(|| panic!("{formula} missing from built-in data"));
        let spec = molecules.get(id).unwrap();
        assert_eq!(spec.triple_point, Some(t3), "{formula} triple point");
        assert_eq!(spec.enthalpy, Some(hf), "{formula} enthalpy");
    }
}

#[test]
fn priority_order_matches_fixture_registry() {
    let builtin = builtin_registry().unwrap();
    let fixture = nebula_registry();
    assert_eq!(
        formulas_in_priority_order(&builtin),
        formulas_in_priority_order(&fixture)
    );
}

#[test]
fn mineral_catalog_matches_fixture() {
    let builtin = builtin_registry().unwrap();
    let fixture = nebula_registry();
    assert_eq!(builtin.minerals().len(), fixture.minerals().len());

    for recipe in fixture.minerals().iter() {
        let loaded = builtin
            .minerals()
            .get(&recipe.name)
            .unwrap_or_else(|| panic!("{} missing from built-in catalog", recipe.name));
        assert_eq!(loaded.form, recipe.form, "{} recipe differs", recipe.name);
    }
}

#[test]
fn silica_mass_is_available() {
    let registry = builtin_registry().unwrap();
    let silica = registry.silica_mass().unwrap();
    assert!((silica - (28.09 + 2.0 * 16.00)).abs() < 1e-9);
}

#[test]
fn every_formula_renders_back_to_a_parseable_formula() {
    let registry = builtin_registry().unwrap();
    let elements = registry.elements();
    for (_, spec) in registry.molecules().iter() {
        let rendered = nebula_core::formula::render(&spec.composition, elements);
        let reparsed = registry.parse(&rendered).unwrap();
        assert_eq!(reparsed.composition, spec.composition, "{}", spec.formula);
    }
}

#[test]
fn sodium_carries_its_full_atomic_mass() {
    let registry = builtin_registry().unwrap();
    let elements = registry.elements();
    let na = elements.id("Na").unwrap();
    assert_eq!(elements.get(na).unwrap().mass, 22.99);

    let halite = registry.parse("NaCl").unwrap();
    assert!(
        (halite.mass - (22.99 + 35.45)).abs() < 1e-9,
        "NaCl mass {}",
        halite.mass
    );
}
