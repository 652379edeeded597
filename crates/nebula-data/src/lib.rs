pub mod loader;
pub mod scenario_config;
pub mod schema;
pub mod tables;

pub use loader::DataLoadError;
pub use scenario_config::load_scenario_config;
pub use tables::{DataTables, builtin_registry, builtin_tables, load_registry, read_tables};
