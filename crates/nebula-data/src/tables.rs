//! Reference table loading: reads element, molecule and mineral data,
//! checks names and cross-references, and builds a `Registry`.

use crate::loader::{
    DataLoadError, Format, check_duplicate, deserialize_list, deserialize_list_str,
    find_data_file, require_data_file, resolve_name,
};
use crate::schema::{ElementData, MineralData, MoleculeData};
use nebula_core::registry::{Registry, RegistryBuilder};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BUILTIN_ELEMENTS: &str = include_str!("../data/elements.ron");
const BUILTIN_MOLECULES: &str = include_str!("../data/molecules.ron");
const BUILTIN_MINERALS: &str = include_str!("../data/minerals.ron");

/// Raw tables as read from disk, before registry validation.
#[derive(Debug, Clone, Default)]
pub struct DataTables {
    pub elements: Vec<ElementData>,
    pub molecules: Vec<MoleculeData>,
    pub minerals: Vec<MineralData>,
}

/// Where each table came from. Only used for error context.
#[derive(Debug, Clone)]
struct TableSources {
    elements: PathBuf,
    molecules: PathBuf,
    minerals: PathBuf,
}

/// Read the tables from `dir`.
///
/// `elements` and `molecules` are required; `minerals` is optional and an
/// absent file means an empty catalog.
pub fn read_tables(dir: &Path) -> Result<DataTables, DataLoadError> {
    let elements_path = require_data_file(dir, "elements")?;
    let molecules_path = require_data_file(dir, "molecules")?;
    let minerals_path = find_data_file(dir, "minerals")?;

    let elements = deserialize_list(&elements_path, "elements")?;
    let molecules = deserialize_list(&molecules_path, "molecules")?;
    let minerals = match &minerals_path {
        Some(path) => deserialize_list(path, "minerals")?,
        None => Vec::new(),
    };

    Ok(DataTables {
        elements,
        molecules,
        minerals,
    })
}

/// Load a registry from the data files in `dir`.
pub fn load_registry(dir: &Path) -> Result<Registry, DataLoadError> {
    let tables = read_tables(dir)?;
    let sources = TableSources {
        elements: data_path(dir, "elements")?,
        molecules: data_path(dir, "molecules")?,
        minerals: data_path(dir, "minerals")?,
    };
    let registry = build_registry(tables, &sources)?;
    info!(
        dir = %dir.display(),
        elements = registry.elements().len(),
        molecules = registry.molecules().len(),
        minerals = registry.minerals().len(),
        "loaded reference data"
    );
    Ok(registry)
}

/// The built-in nebular data set, embedded at compile time.
pub fn builtin_tables() -> Result<DataTables, DataLoadError> {
    let sources = builtin_sources();
    Ok(DataTables {
        elements: deserialize_list_str(BUILTIN_ELEMENTS, Format::Ron, &sources.elements, "elements")?,
        molecules: deserialize_list_str(
            BUILTIN_MOLECULES,
            Format::Ron,
            &sources.molecules,
            "molecules",
        )?,
        minerals: deserialize_list_str(BUILTIN_MINERALS, Format::Ron, &sources.minerals, "minerals")?,
    })
}

/// Registry built from the embedded nebular data set: 25 elements, the
/// molecule table, and the mineral catalog.
pub fn builtin_registry() -> Result<Registry, DataLoadError> {
    let registry = build_registry(builtin_tables()?, &builtin_sources())?;
    debug!(
        molecules = registry.molecules().len(),
        minerals = registry.minerals().len(),
        "built-in registry ready"
    );
    Ok(registry)
}

/// Register `tables` on a fresh builder and validate the result.
pub fn registry_from_tables(tables: DataTables) -> Result<Registry, DataLoadError> {
    let sources = TableSources {
        elements: PathBuf::from("elements"),
        molecules: PathBuf::from("molecules"),
        minerals: PathBuf::from("minerals"),
    };
    build_registry(tables, &sources)
}

fn builtin_sources() -> TableSources {
    TableSources {
        elements: PathBuf::from("<builtin>/elements.ron"),
        molecules: PathBuf::from("<builtin>/molecules.ron"),
        minerals: PathBuf::from("<builtin>/minerals.ron"),
    }
}

/// The file backing `base_name`, or a bare `dir/base_name` when it is
/// optional and absent.
fn data_path(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    Ok(find_data_file(dir, base_name)?.unwrap_or_else(|| dir.join(base_name)))
}

fn build_registry(tables: DataTables, sources: &TableSources) -> Result<Registry, DataLoadError> {
    let mut builder = RegistryBuilder::new();

    let mut symbols: HashMap<String, ()> = HashMap::new();
    for element in &tables.elements {
        check_duplicate(&symbols, &element.symbol, &sources.elements)?;
        symbols.insert(element.symbol.clone(), ());
        builder.register_element(
            &element.symbol,
            element.abundance,
            element.mass,
            element.atomic_number,
        );
    }

    let mut formulas = HashMap::new();
    for molecule in &tables.molecules {
        check_duplicate(&formulas, &molecule.formula, &sources.molecules)?;
        let id = builder.register_molecule(
            &molecule.formula,
            molecule.triple_point,
            molecule.enthalpy,
        );
        formulas.insert(molecule.formula.clone(), id);
    }

    let mut names: HashMap<String, ()> = HashMap::new();
    for mineral in tables.minerals {
        check_duplicate(&names, &mineral.name, &sources.minerals)?;
        for formula in mineral.molecule_refs() {
            resolve_name(&formulas, formula, &sources.minerals, "molecule")?;
        }
        names.insert(mineral.name.clone(), ());
        builder.register_mineral(&mineral.name, mineral.form);
    }

    Ok(builder.build()?)
}

// ===========================================================================
// Tests
// ===========================================================================
