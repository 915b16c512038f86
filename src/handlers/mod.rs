pub mod list;
pub mod run;

use anyhow::{Result, bail};
use log::{debug, warn};
use std::path::Path;
use jt_cmd::cmd::manager::ManagerRef;
use jt_cmd::cmd::managers::{DEFAULT_DESCRIPTOR, register_all_builtins};
use jt_cmd::config::JtConfig;
use jt_cmd::loader::registry::PluginRegistry;
use jt_cmd::loader::{ManagerLoader, Registration};
use jt_cmd::logger::DiagnosticLog;

/// Discovers the command managers named on the configured search path,
/// falling back to the built-in set when no descriptor is found.
pub fn load_managers(config: &JtConfig, diagnostics: Option<&Path>) -> Result<Vec<Registration<ManagerRef>>> {
    let mut registry = PluginRegistry::new();
    register_all_builtins(&mut registry);

    let mut loader = ManagerLoader::new(registry, config.managers.search_path.clone());
    if let Some(args) = &config.managers.args {
        loader.set_manager_constructor_args(args.clone());
    }
    if let Some(path) = diagnostics {
        loader.set_log(DiagnosticLog::to_file(path)?);
    }

    let mut loaded = loader.discover::<ManagerRef>(&config.managers.resource);
    if loaded.is_empty() {
        debug!("No '{}' descriptors found, using the built-in managers", config.managers.resource);
        loaded = loader.discover_text::<ManagerRef>(Path::new("<builtin>"), DEFAULT_DESCRIPTOR);
    }

    if let Some(log) = loader.log() {
        if !log.is_empty() {
            warn!("{} problem(s) while loading managers, see diagnostics", log.entries().len());
        }
    }
    if loaded.is_empty() {
        bail!("No command managers could be loaded");
    }
    Ok(loaded)
}
