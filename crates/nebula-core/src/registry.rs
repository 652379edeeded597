use crate::element::{Element, ElementTable, is_valid_symbol};
use crate::formula::{self, MoleculeScalars, ParseError};
use crate::id::{ElementId, MoleculeId};
use crate::mineral::{FormSpec, MineralCatalog, MineralForm, MineralRecipe};
use crate::molecule::{MoleculeSpec, MoleculeTable};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// A molecule as registered, before its formula is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeDef {
    pub formula: String,
    pub triple_point: Option<f64>,
    pub enthalpy: Option<f64>,
}

/// A mineral recipe as registered, before molecule references are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineralDef {
    pub name: String,
    pub form: FormSpec,
}

/// Builder for constructing an immutable Registry.
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug)]
pub struct RegistryBuilder {
    elements: Vec<Element>,
    element_symbol_to_id: HashMap<String, ElementId>,
    molecules: Vec<MoleculeDef>,
    molecule_formula_to_id: HashMap<String, MoleculeId>,
    minerals: Vec<MineralDef>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            element_symbol_to_id: HashMap::new(),
            molecules: Vec::new(),
            molecule_formula_to_id: HashMap::new(),
            minerals: Vec::new(),
        }
    }

    /// Phase 1: Register an element. Registration order is display order.
    pub fn register_element(
        &mut self,
        symbol: &str,
        weight: f64,
        mass: f64,
        atomic_number: u32,
    ) -> ElementId {
        let id = ElementId(self.elements.len() as u16);
        self.elements.push(Element {
            symbol: symbol.to_string(),
            weight,
            mass,
            atomic_number,
        });
        self.element_symbol_to_id.entry(symbol.to_string()).or_insert(id);
        id
    }

    /// Phase 1: Register a molecule by formula. The formula is parsed at build.
    pub fn register_molecule(
        &mut self,
        formula: &str,
        triple_point: Option<f64>,
        enthalpy: Option<f64>,
    ) -> MoleculeId {
        let id = MoleculeId(self.molecules.len() as u32);
        self.molecules.push(MoleculeDef {
            formula: formula.to_string(),
            triple_point,
            enthalpy,
        });
        self.molecule_formula_to_id.entry(formula.to_string()).or_insert(id);
        id
    }

    /// Phase 1: Register a mineral recipe.
    pub fn register_mineral(&mut self, name: &str, form: FormSpec) {
        self.minerals.push(MineralDef {
            name: name.to_string(),
            form,
        });
    }

    /// Phase 2: Mutate an existing molecule by formula.
    pub fn mutate_molecule<F>(&mut self, formula: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut MoleculeDef),
    {
        let id = self
            .molecule_formula_to_id
            .get(formula)
            .ok_or(RegistryError::NotFound(formula.to_string()))?;
        f(&mut self.molecules[id.0 as usize]);
        Ok(())
    }

    /// Phase 2: Replace the form of an existing mineral recipe.
    pub fn mutate_mineral<F>(&mut self, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut MineralDef),
    {
        let def = self
            .minerals
            .iter_mut()
            .find(|m| m.name == name)
            .ok_or(RegistryError::NotFound(name.to_string()))?;
        f(def);
        Ok(())
    }

    pub fn element_id(&self, symbol: &str) -> Option<ElementId> {
        self.element_symbol_to_id.get(symbol).copied()
    }

    pub fn molecule_id(&self, formula: &str) -> Option<MoleculeId> {
        self.molecule_formula_to_id.get(formula).copied()
    }

    /// Phase 3: Validate and build the immutable registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        validate_elements(&self.elements)?;
        let elements = ElementTable::new(self.elements);

        let mut seen = HashSet::new();
        let mut specs = Vec::with_capacity(self.molecules.len());
        for def in self.molecules {
            if !seen.insert(def.formula.clone()) {
                return Err(RegistryError::Duplicate {
                    kind: "molecule",
                    name: def.formula,
                });
            }
            check_optional(&def.formula, "triple point", def.triple_point)?;
            check_optional(&def.formula, "enthalpy", def.enthalpy)?;
            let scalars = parse_with_context(&def.formula, &elements)?;
            specs.push(MoleculeSpec::new(
                def.formula,
                scalars,
                def.triple_point,
                def.enthalpy,
            ));
        }
        let molecules = MoleculeTable::new(specs);

        let mut seen = HashSet::new();
        let mut recipes = Vec::with_capacity(self.minerals.len());
        for def in self.minerals {
            if !seen.insert(def.name.clone()) {
                return Err(RegistryError::Duplicate {
                    kind: "mineral",
                    name: def.name,
                });
            }
            let form = resolve_form(&def.name, &def.form, &molecules)?;
            recipes.push(MineralRecipe {
                name: def.name,
                form,
            });
        }
        let minerals = MineralCatalog::new(recipes);

        let silica_mass = match (elements.id("Si"), elements.id("O")) {
            (Some(_), Some(_)) => Some(parse_with_context("SiO2", &elements)?.mass),
            _ => None,
        };

        info!(
            elements = elements.len(),
            molecules = molecules.len(),
            minerals = minerals.len(),
            "registry built"
        );

        Ok(Registry {
            elements,
            molecules,
            minerals,
            silica_mass,
        })
    }
}

fn validate_elements(elements: &[Element]) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for e in elements {
        if !is_valid_symbol(&e.symbol) {
            return Err(RegistryError::InvalidSymbol(e.symbol.clone()));
        }
        if !seen.insert(e.symbol.as_str()) {
            return Err(RegistryError::Duplicate {
                kind: "element",
                name: e.symbol.clone(),
            });
        }
        if !e.weight.is_finite() || e.weight < 0.0 {
            return Err(RegistryError::InvalidValue {
                name: e.symbol.clone(),
                field: "weight",
                value: e.weight,
            });
        }
        if !e.mass.is_finite() || e.mass <= 0.0 {
            return Err(RegistryError::InvalidValue {
                name: e.symbol.clone(),
                field: "mass",
                value: e.mass,
            });
        }
    }
    Ok(())
}

fn check_optional(name: &str, field: &'static str, value: Option<f64>) -> Result<(), RegistryError> {
    match value {
        Some(v) if !v.is_finite() => Err(RegistryError::InvalidValue {
            name: name.to_string(),
            field,
            value: v,
        }),
        _ => Ok(()),
    }
}

fn parse_with_context(formula: &str, elements: &ElementTable) -> Result<MoleculeScalars, RegistryError> {
    formula::parse(formula, elements).map_err(|source| RegistryError::Parse {
        formula: formula.to_string(),
        source,
    })
}

fn resolve_form(
    mineral: &str,
    spec: &FormSpec,
    molecules: &MoleculeTable,
) -> Result<MineralForm, RegistryError> {
    let resolve_all = |branches: &[FormSpec]| -> Result<Vec<MineralForm>, RegistryError> {
        if branches.is_empty() {
            return Err(RegistryError::EmptyForm(mineral.to_string()));
        }
        branches
            .iter()
            .map(|b| resolve_form(mineral, b, molecules))
            .collect()
    };
    match spec {
        FormSpec::Atom(formula) => molecules
            .id(formula)
            .map(MineralForm::Atom)
            .ok_or_else(|| RegistryError::UnknownMolecule(formula.clone())),
        FormSpec::Alternation(branches) => Ok(MineralForm::Alternation(resolve_all(branches)?)),
        FormSpec::Sequence(branches) => Ok(MineralForm::Sequence(resolve_all(branches)?)),
    }
}

/// Immutable reference data. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Registry {
    elements: ElementTable,
    molecules: MoleculeTable,
    minerals: MineralCatalog,
    silica_mass: Option<f64>,
}

impl Registry {
    pub fn elements(&self) -> &ElementTable {
        &self.elements
    }

    pub fn molecules(&self) -> &MoleculeTable {
        &self.molecules
    }

    pub fn minerals(&self) -> &MineralCatalog {
        &self.minerals
    }

    /// Molar mass of SiO2, if both Si and O are registered.
    pub fn silica_mass(&self) -> Option<f64> {
        self.silica_mass
    }

    /// Parse a formula against this registry's elements.
    pub fn parse(&self, formula: &str) -> Result<MoleculeScalars, ParseError> {
        formula::parse(formula, &self.elements)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid element symbol '{0}'")]
    InvalidSymbol(String),
    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },
    #[error("invalid {field} for '{name}': {value}")]
    InvalidValue {
        name: String,
        field: &'static str,
        value: f64,
    },
    #[error("molecule '{formula}': {source}")]
    Parse {
        formula: String,
        #[source]
        source: ParseError,
    },
    #[error("unknown molecule reference: {0}")]
    UnknownMolecule(String),
    #[error("mineral '{0}' has an empty alternation or sequence")]
    EmptyForm(String),
}
