#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nebula_core::assembler::assemble;
use nebula_core::id::MoleculeId;
use nebula_core::pool::MoleculeInventory;
use nebula_core::rng;
use nebula_core::test_utils::*;

/// Top-level fuzz input: a seed and a sparse molecule inventory.
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    seed: u64,
    stock: Vec<(u8, u8)>,
}

fuzz_target!(|input: FuzzInput| {
    let registry = nebula_registry();
    let molecule_count = registry.molecules().len() as u32;

    let mut inventory = MoleculeInventory::new();
    // Limit entries to prevent timeouts.
    for &(molecule, quantity) in input.stock.iter().take(64) {
        inventory.add(MoleculeId(u32::from(molecule) % molecule_count), u64::from(quantity));
    }
    let start = inventory.total();

    let mut rng = rng::seeded(input.seed);
    let records = assemble(&registry, &mut inventory, &mut rng);

    // Every unit is either in a mineral or still in the inventory.
    let used: u64 = records.values().flat_map(|r| r.molecules.values()).sum();
    assert_eq!(used + inventory.total(), start);
    for record in records.values() {
        assert!(record.draws > 0);
        assert!(record.composition.is_some());
    }
});
