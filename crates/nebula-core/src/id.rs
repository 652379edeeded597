use serde::{Deserialize, Serialize};

/// Identifies an element in the registry. Also its display rank: elements
/// render in ascending id order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ElementId(pub u16);

/// Identifies a molecule in the registry. Cheap to copy and compare.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MoleculeId(pub u32);
