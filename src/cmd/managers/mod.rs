pub mod config;
pub mod desktop;
pub mod help;

use crate::cmd::manager::{CommandManager, ManagerRef};
use crate::loader::registry::{Factory, PluginRegistry};
use std::sync::Arc;

pub const HELP_MANAGER: &str = "jt.manager.help";
pub const CONFIG_MANAGER: &str = "jt.manager.config";
pub const DESKTOP_MANAGER: &str = "jt.manager.desktop";

/// Descriptor used when no descriptor resource is found on the search path.
pub const DEFAULT_DESCRIPTOR: &str = "\
# Built-in command managers, in dispatch order
jt.manager.help
jt.manager.config
jt.manager.desktop
";

fn product<M: CommandManager + 'static>(manager: M) -> Box<dyn std::any::Any> {
    Box::new(Arc::new(manager) as ManagerRef)
}

/// Registers every built-in manager under its identifier.
pub fn register_all_builtins(registry: &mut PluginRegistry) {
    registry.register_manager::<help::HelpManager>(HELP_MANAGER);
    registry.register_manager::<config::ConfigManager>(CONFIG_MANAGER);
    registry.register(
        DESKTOP_MANAGER,
        Factory::plain(|| Ok(product(desktop::DesktopManager::default())))
            .and_args(|args| Ok(product(desktop::DesktopManager::with_args(args)))),
    );
}
