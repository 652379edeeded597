//! Mineral recipe grammar and the transactional matcher.
//!
//! A recipe is a tree of three node kinds:
//!
//! - **Atom** consumes one unit of a named molecule.
//! - **Alternation** succeeds with exactly one branch, tried in a freshly
//!   shuffled order on every attempt.
//! - **Sequence** succeeds only if every branch succeeds in order. On the
//!   first failing branch, every unit consumed by the earlier branches is
//!   put back, so a failed Sequence leaves the inventory exactly as found.
//!
//! Repetition is spelled out by repeating a node inside a Sequence.

use crate::id::MoleculeId;
use crate::pool::MoleculeInventory;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

/// A recipe as written in data files, referencing molecules by formula.
/// Resolved into a [`MineralForm`] when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormSpec {
    Atom(String),
    Alternation(Vec<FormSpec>),
    Sequence(Vec<FormSpec>),
}

impl FormSpec {
    pub fn atom(formula: &str) -> Self {
        FormSpec::Atom(formula.to_string())
    }

    pub fn alt(branches: Vec<FormSpec>) -> Self {
        FormSpec::Alternation(branches)
    }

    pub fn seq(branches: Vec<FormSpec>) -> Self {
        FormSpec::Sequence(branches)
    }
}

/// A resolved recipe node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MineralForm {
    Atom(MoleculeId),
    Alternation(Vec<MineralForm>),
    Sequence(Vec<MineralForm>),
}

/// A named mineral recipe in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineralRecipe {
    pub name: String,
    pub form: MineralForm,
}

/// Immutable mineral recipe catalog.
#[derive(Debug, Clone, Default)]
pub struct MineralCatalog {
    recipes: Vec<MineralRecipe>,
    name_to_index: HashMap<String, usize>,
}

impl MineralCatalog {
    pub(crate) fn new(recipes: Vec<MineralRecipe>) -> Self {
        let name_to_index = recipes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        Self {
            recipes,
            name_to_index,
        }
    }

    pub fn get(&self, name: &str) -> Option<&MineralRecipe> {
        self.name_to_index.get(name).map(|&i| &self.recipes[i])
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MineralRecipe> {
        self.recipes.iter()
    }

    pub(crate) fn recipes(&self) -> &[MineralRecipe] {
        &self.recipes
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Try to draw one instance of `form` from the inventory.
///
/// On success the consumed molecules are returned in grammar order and are
/// already removed from the inventory. On failure the inventory is unchanged.
pub fn draw_from<R: Rng + ?Sized>(
    form: &MineralForm,
    inventory: &mut MoleculeInventory,
    rng: &mut R,
) -> Option<Vec<MoleculeId>> {
    match form {
        MineralForm::Atom(molecule) => inventory.take_one(*molecule).then(|| vec![*molecule]),
        MineralForm::Alternation(branches) => {
            let mut order: Vec<&MineralForm> = branches.iter().collect();
            order.shuffle(rng);
            order
                .into_iter()
                .find_map(|branch| draw_from(branch, inventory, rng))
        }
        MineralForm::Sequence(branches) => {
            // The consumed list doubles as the undo log.
            let mut taken = Vec::new();
            for branch in branches {
                match draw_from(branch, inventory, rng) {
                    Some(units) => taken.extend(units),
                    None => {
                        inventory.restore(&taken);
                        return None;
                    }
                }
            }
            Some(taken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    const MGO: MoleculeId = MoleculeId(0);
    const SIO2: MoleculeId = MoleculeId(1);
    const FEO: MoleculeId = MoleculeId(2);

    fn inventory(entries: &[(MoleculeId, u64)]) -> MoleculeInventory {
        let mut inv = MoleculeInventory::new();
        for &(m, n) in entries {
            inv.add(m, n);
        }
        inv
    }

    #[test]
    fn atom_consumes_one_unit() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        let mut inv = inventory(&[(MGO, 2)]);
        let drawn = draw_from(&MineralForm::Atom(MGO), &mut inv, &mut rng);
        assert_eq!(drawn, Some(vec![MGO]));
        assert_eq!(inv.quantity(MGO), 1);
    }

    #[test]
    fn atom_fails_on_empty() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        let mut inv = inventory(&[(SIO2, 2)]);
        assert_eq!(draw_from(&MineralForm::Atom(MGO), &mut inv, &mut rng), None);
        assert_eq!(inv.quantity(SIO2), 2);
    }

    #[test]
    fn sequence_consumes_in_order() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        let mut inv = inventory(&[(MGO, 5), (SIO2, 5)]);
        let form = MineralForm::Sequence(vec![
            MineralForm::Atom(MGO),
            MineralForm::Atom(MGO),
            MineralForm::Atom(SIO2),
        ]);
        assert_eq!(draw_from(&form, &mut inv, &mut rng), Some(vec![MGO, MGO, SIO2]));
        assert_eq!(inv.quantity(MGO), 3);
        assert_eq!(inv.quantity(SIO2), 4);
    }

    #[test]
    fn sequence_rolls_back_on_late_failure() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        let mut inv = inventory(&[(MGO, 1), (SIO2, 3)]);
        let before = inv.clone();
        let form = MineralForm::Sequence(vec![
            MineralForm::Atom(SIO2),
            MineralForm::Atom(MGO),
            MineralForm::Atom(MGO),
        ]);
        assert_eq!(draw_from(&form, &mut inv, &mut rng), None);
        assert_eq!(inv, before);
    }

    #[test]
    fn nested_failure_unwinds_inner_alternation() {
        let mut rng = ChaChaRng::seed_from_u64(9);
        let mut inv = inventory(&[(MGO, 1), (FEO, 1), (SIO2, 0)]);
        let before = inv.clone();
        let form = MineralForm::Sequence(vec![
            MineralForm::Sequence(vec![
                MineralForm::Alternation(vec![MineralForm::Atom(MGO), MineralForm::Atom(FEO)]),
                MineralForm::Alternation(vec![MineralForm::Atom(MGO), MineralForm::Atom(FEO)]),
            ]),
            MineralForm::Atom(SIO2),
        ]);
        assert_eq!(draw_from(&form, &mut inv, &mut rng), None);
        assert_eq!(inv, before);
    }

    #[test]
    fn alternation_falls_through_to_feasible_branch() {
        let mut inv = inventory(&[(FEO, 3)]);
        let form = MineralForm::Alternation(vec![
            MineralForm::Atom(MGO),
            MineralForm::Atom(FEO),
            MineralForm::Atom(SIO2),
        ]);
        for seed in 0..3 {
            let mut rng = ChaChaRng::seed_from_u64(seed);
            assert_eq!(draw_from(&form, &mut inv, &mut rng), Some(vec![FEO]));
        }
        assert_eq!(inv.quantity(FEO), 0);
        let mut rng = ChaChaRng::seed_from_u64(0);
        assert_eq!(draw_from(&form, &mut inv, &mut rng), None);
    }

    #[test]
    fn alternation_has_no_fixed_priority() {
        let form = MineralForm::Alternation(vec![MineralForm::Atom(MGO), MineralForm::Atom(FEO)]);
        let mut saw_mgo = false;
        let mut saw_feo = false;
        for seed in 0..64 {
            let mut rng = ChaChaRng::seed_from_u64(seed);
            let mut inv = inventory(&[(MGO, 1), (FEO, 1)]);
            match draw_from(&form, &mut inv, &mut rng).as_deref() {
                Some([MGO]) => saw_mgo = true,
                Some([FEO]) => saw_feo = true,
                other => panic!("unexpected draw {other:?}"),
            }
        }
        assert!(saw_mgo && saw_feo);
    }

    #[test]
    fn catalog_lookup() {
        let reg = olivine_registry();
        let olivine = reg.minerals().get("Olivine").unwrap();
        assert_eq!(olivine.name, "Olivine");
        assert!(matches!(olivine.form, MineralForm::Sequence(_)));
        assert!(reg.minerals().get("Unobtainium").is_none());
    }
}
