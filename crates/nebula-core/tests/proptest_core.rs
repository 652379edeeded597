//! Property-based tests for the Nebula core engines.
//!
//! Uses proptest to generate random compositions, inventories and recipe
//! trees, then verify the conservation and transactionality invariants.

use nebula_core::assembler::assemble;
use nebula_core::condensation::{CondensationConfig, CondensationEngine};
use nebula_core::formula::{Composition, parse, render};
use nebula_core::id::{ElementId, MoleculeId};
use nebula_core::mineral::{MineralForm, draw_from};
use nebula_core::pool::MoleculeInventory;
use nebula_core::rng;
use nebula_core::test_utils::*;
use nebula_core::validation::check_conservation;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

const ELEMENT_COUNT: u16 = 25;
const MOLECULE_POOL: u32 = 4;

fn arb_composition() -> impl Strategy<Value = Composition> {
    proptest::collection::vec((0..ELEMENT_COUNT, 1..500u32), 1..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(e, n)| (ElementId(e), n))
            .collect()
    })
}

/// Recipe trees over a small molecule pool, nested up to three levels.
fn arb_form() -> impl Strategy<Value = MineralForm> {
    let leaf = (0..MOLECULE_POOL).prop_map(|m| MineralForm::Atom(MoleculeId(m)));
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 1..4).prop_map(MineralForm::Alternation),
            proptest::collection::vec(inner, 1..5).prop_map(MineralForm::Sequence),
        ]
    })
}

fn arb_stock() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(0..4u64, MOLECULE_POOL as usize)
}

fn stock_inventory(stock: &[u64]) -> MoleculeInventory {
    let mut inv = MoleculeInventory::new();
    for (m, &n) in stock.iter().enumerate() {
        inv.add(MoleculeId(m as u32), n);
    }
    inv
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Rendering then re-parsing recovers the composition.
    #[test]
    fn formula_round_trip(composition in arb_composition()) {
        let reg = nebula_registry();
        let rendered = render(&composition, reg.elements());
        let parsed = parse(&rendered, reg.elements()).unwrap();
        prop_assert_eq!(&parsed.composition, &composition);
        prop_assert_eq!(u64::from(parsed.atoms), composition.atoms());
    }

    /// Drawn atoms are always in the pool or bound in formed molecules.
    #[test]
    fn condensation_conserves_atoms(seed in any::<u64>(), draw_size in 1..3000u32, rounds in 1..15usize) {
        let reg = nebula_registry();
        let config = CondensationConfig { draw_size, ..Default::default() };
        let mut engine = CondensationEngine::new(&reg, config, rng::seeded(seed)).unwrap();
        for _ in 0..rounds {
            engine.round();
            let report = check_conservation(&engine);
            prop_assert!(report.is_balanced(), "{:?}", report.imbalances);
        }
    }

    /// Identical seeds give identical emission sequences.
    #[test]
    fn condensation_is_deterministic(seed in any::<u64>()) {
        let reg = nebula_registry();
        let config = CondensationConfig::default();
        let a: Vec<_> = CondensationEngine::new(&reg, config, rng::seeded(seed)).unwrap().take(50).collect();
        let b: Vec<_> = CondensationEngine::new(&reg, config, rng::seeded(seed)).unwrap().take(50).collect();
        prop_assert_eq!(a, b);
    }

    /// A draw either consumes exactly what it returns or changes nothing,
    /// wherever inside the tree the failure happens.
    #[test]
    fn draw_is_all_or_nothing(form in arb_form(), stock in arb_stock(), seed in any::<u64>()) {
        let mut inv = stock_inventory(&stock);
        let before = inv.clone();
        let mut rng = rng::seeded(seed);
        match draw_from(&form, &mut inv, &mut rng) {
            None => prop_assert_eq!(inv, before),
            Some(units) => {
                let mut restored = inv.clone();
                restored.restore(&units);
                prop_assert_eq!(restored, before);
                prop_assert!(!units.is_empty());
            }
        }
    }

    /// Assembly halts and every molecule unit is accounted for.
    #[test]
    fn assembly_terminates_and_conserves(
        stock in proptest::collection::vec(0..30u64, 58),
        seed in any::<u64>(),
    ) {
        let reg = nebula_registry();
        let mut inv = MoleculeInventory::new();
        for (m, &n) in stock.iter().enumerate() {
            inv.add(MoleculeId(m as u32), n);
        }
        let start = inv.total();
        let mut rng = rng::seeded(seed);
        let records = assemble(&reg, &mut inv, &mut rng);

        let used: u64 = records.values().flat_map(|r| r.molecules.values()).sum();
        prop_assert_eq!(used + inv.total(), start);
        let draws: u64 = records.values().map(|r| r.draws).sum();
        prop_assert!(draws <= start);
        for record in records.values() {
            prop_assert!(record.draws > 0);
            prop_assert_eq!(record.formulas.values().sum::<u64>(), record.draws);
        }
    }
}
