//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::mineral::FormSpec;
use crate::pool::MoleculeInventory;
use crate::registry::{Registry, RegistryBuilder};

// ===========================================================================
// Reference tables
// ===========================================================================

/// `(symbol, abundance relative to Si = 1000, atomic mass, atomic number)`,
/// in display order.
pub const NEBULA_ELEMENTS: &[(&str, f64, f64, u32)] = &[
    ("K", 4.0, 39.10, 19),
    // 22.99 Da, not the 2.99 of older tables.
    ("Na", 57.0, 22.99, 11),
    ("Ca", 61.0, 40.08, 20),
    ("Mg", 1074.0, 24.31, 12),
    ("Fe", 900.0, 55.85, 26),
    ("Mn", 10.0, 54.94, 25),
    ("Ni", 49.0, 58.69, 28),
    ("Co", 2.0, 58.93, 27),
    ("Cu", 1.0, 63.55, 29),
    ("Zn", 1.0, 65.38, 30),
    ("Cr", 14.0, 52.00, 24),
    ("Ti", 2.0, 47.87, 22),
    ("Al", 85.0, 26.98, 13),
    ("Si", 1000.0, 28.09, 14),
    ("P", 10.0, 30.97, 15),
    ("C", 10100.0, 12.01, 6),
    ("N", 3130.0, 14.01, 7),
    ("S", 515.0, 32.06, 16),
    ("H", 27_900_000.0, 1.000, 1),
    ("He", 2_720_000.0, 4.003, 2),
    ("Ne", 3440.0, 20.18, 10),
    ("Ar", 101.0, 39.95, 18),
    ("O", 23800.0, 16.00, 8),
    ("F", 1.0, 19.00, 9),
    ("Cl", 5.0, 35.45, 17),
];

/// `(formula, triple point K, enthalpy of formation kJ/mol)`.
pub const NEBULA_MOLECULES: &[(&str, f64, f64)] = &[
    ("H2", 13.80, 0.0),
    ("N2", 63.15, 0.0),
    ("O2", 54.36, 0.0),
    ("F2", 53.48, 0.0),
    ("He", 2.18, 0.0),
    ("Ne", 24.56, 0.0),
    ("Ar", 83.81, 0.0),
    ("C", 3915.0, 0.0),
    ("Al", 933.47, 0.0),
    ("Mg", 923.0, 0.0),
    ("Si", 1687.0, 0.0),
    ("Ti", 1941.0, 0.0),
    ("Cr", 2180.0, 0.0),
    ("Mn", 1519.0, 0.0),
    ("Fe", 1811.0, 0.0),
    ("Co", 1768.0, 0.0),
    ("Ni", 1728.0, 0.0),
    ("Cu", 1358.0, 0.0),
    ("Zn", 693.0, 0.0),
    ("CH4", 90.67, -74.6),
    ("NH3", 195.4, -46.0),
    ("H2O", 273.16, -291.83),
    ("HF", 190.0, -13.66),
    ("H2S", 187.66, -21.0),
    ("HCl", 161.15, -92.31),
    ("CO", 67.9, -110.5),
    ("CO2", 216.58, -393.5),
    ("P2O5", 613.0, -1452.0),
    ("SO2", 197.64, -296.81),
    ("H3PO4", 314.0, -1271.7),
    ("MgO", 3125.0, -601.6),
    ("Al2O3", 2345.0, -1675.7),
    ("SiO2", 3220.0, -911.0),
    ("CaO", 2886.0, -635.0),
    ("TiO2", 2116.0, -945.0),
    ("Cr2O3", 2708.0, -1128.0),
    ("MnO", 2218.0, -385.0),
    ("Fe3O4", 1870.0, -1120.89),
    ("CoO", 2206.0, -237.74),
    ("NiO", 2228.0, -240.0),
    ("Cu2O", 1505.0, -170.0),
    ("ZnO", 2247.0, -350.5),
    ("MnS", 1983.0, -345.72),
    ("FeS", 1467.0, -101.67),
    ("CoS", 1468.0, -190.0),
    ("NiS", 1070.0, -87.86),
    ("Cu2S", 1400.0, -120.0),
    ("ZnS", 2120.0, -204.6),
    ("NaF", 1266.0, -573.6),
    ("NaCl", 1073.0, -411.12),
    ("Mg2F", 1536.0, -1124.2),
    ("Mg2Cl", 987.0, -641.1),
    ("CaF2", 1691.0, -1225.91),
    ("CaCl2", 1046.0, -795.42),
    ("KF", 1131.0, -568.61),
    ("KCl", 1040.0, -436.0),
    ("Mg2SiO4", 2163.0, -2056.0),
    ("Fe2SiO4", 1473.0, -1379.0),
];

fn atoms(formulas: &[&str]) -> Vec<FormSpec> {
    formulas.iter().map(|f| FormSpec::atom(f)).collect()
}

/// The nebular mineral catalog. Periclase is the only recipe that can be
/// satisfied by MgO alone.
pub fn nebula_minerals() -> Vec<(&'static str, FormSpec)> {
    vec![
        (
            "Olivine",
            FormSpec::seq(vec![FormSpec::alt(vec![
                FormSpec::seq(atoms(&["MgO", "MgO", "SiO2"])),
                FormSpec::atom("Mg2SiO4"),
                FormSpec::atom("Fe2SiO4"),
            ])]),
        ),
        ("Enstatite", FormSpec::seq(atoms(&["MgO", "SiO2"]))),
        ("Diopside", FormSpec::seq(atoms(&["CaO", "MgO", "SiO2", "SiO2"]))),
        (
            "Anorthite",
            FormSpec::seq(atoms(&["CaO", "Al2O3", "SiO2", "SiO2"])),
        ),
        ("Spinel", FormSpec::seq(atoms(&["MgO", "Al2O3"]))),
        ("Gehlenite", FormSpec::seq(atoms(&["CaO", "CaO", "Al2O3", "SiO2"]))),
        ("Perovskite", FormSpec::seq(atoms(&["CaO", "TiO2"]))),
        (
            "Chromite",
            FormSpec::seq(vec![
                FormSpec::alt(atoms(&["MgO", "MnO"])),
                FormSpec::atom("Cr2O3"),
            ]),
        ),
        ("Corundum", FormSpec::seq(atoms(&["Al2O3"]))),
        ("Periclase", FormSpec::seq(atoms(&["MgO"]))),
        ("Quartz", FormSpec::seq(atoms(&["SiO2"]))),
        ("Rutile", FormSpec::seq(atoms(&["TiO2"]))),
        ("Magnetite", FormSpec::seq(atoms(&["Fe3O4"]))),
        ("Troilite", FormSpec::seq(atoms(&["FeS"]))),
        (
            "Sulfide",
            FormSpec::seq(vec![FormSpec::alt(atoms(&["NiS", "CoS", "MnS", "ZnS", "Cu2S"]))]),
        ),
        (
            "Halide",
            FormSpec::seq(vec![FormSpec::alt(atoms(&["NaCl", "KCl", "NaF", "KF", "CaF2"]))]),
        ),
        (
            "Ice",
            FormSpec::seq(vec![FormSpec::alt(atoms(&["H2O", "NH3", "CH4", "CO2"]))]),
        ),
    ]
}

// ===========================================================================
// Registries
// ===========================================================================

/// Full nebular registry: 25 elements, 58 molecules, the mineral catalog.
pub fn nebula_registry() -> Registry {
    let mut b = RegistryBuilder::new();
    for &(symbol, weight, mass, z) in NEBULA_ELEMENTS {
        b.register_element(symbol, weight, mass, z);
    }
    for &(formula, t3, hf) in NEBULA_MOLECULES {
        b.register_molecule(formula, Some(t3), Some(hf));
    }
    for (name, form) in nebula_minerals() {
        b.register_mineral(name, form);
    }
    b.build().unwrap()
}

/// Mg/Si/O only, with a single two-MgO-per-SiO2 Olivine recipe.
pub fn olivine_registry() -> Registry {
    let mut b = RegistryBuilder::new();
    b.register_element("Mg", 1074.0, 24.31, 12);
    b.register_element("Si", 1000.0, 28.09, 14);
    b.register_element("O", 23800.0, 16.00, 8);
    b.register_molecule("MgO", Some(3125.0), Some(-601.6));
    b.register_molecule("SiO2", Some(3220.0), Some(-911.0));
    b.register_molecule("Mg", None, None);
    b.register_molecule("O2", Some(54.36), Some(0.0));
    b.register_mineral(
        "Olivine",
        FormSpec::seq(vec![
            FormSpec::alt(vec![FormSpec::atom("MgO")]),
            FormSpec::alt(vec![FormSpec::atom("MgO")]),
            FormSpec::atom("SiO2"),
        ]),
    );
    b.build().unwrap()
}

/// Hydrogen only: every round turns pairs of atoms into H2.
pub fn hydrogen_registry() -> Registry {
    let mut b = RegistryBuilder::new();
    b.register_element("H", 1.0, 1.000, 1);
    b.register_molecule("H2", Some(13.80), Some(0.0));
    b.build().unwrap()
}

// ===========================================================================
// Inventories
// ===========================================================================

/// Inventory from `(formula, quantity)` pairs. Panics on unknown formulas.
pub fn inventory(registry: &Registry, entries: &[(&str, u64)]) -> MoleculeInventory {
    MoleculeInventory::from_formulas(registry.molecules(), entries.iter().copied()).unwrap()
}
