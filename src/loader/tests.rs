use super::registry::{Factory, PluginRegistry, Product};
use super::*;
use crate::cmd::context::CommandContext;
use crate::cmd::cursor::ArgCursor;
use crate::cmd::error::CommandError;
use crate::cmd::manager::{CommandManager, HelpNode, ManagerRef};
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

struct Probe(&'static str);

impl CommandManager for Probe {
    fn help(&self) -> HelpNode {
        HelpNode::new(self.0, "probe")
    }

    fn parse_command(&self, _: &str, _: &mut ArgCursor, _: &mut CommandContext) -> Result<bool, CommandError> {
        Ok(false)
    }
}

fn probe(name: &'static str) -> Factory {
    Factory::plain(move || Ok(Box::new(Arc::new(Probe(name)) as ManagerRef) as Product))
}

fn registry() -> PluginRegistry {
    let mut r = PluginRegistry::new();
    r.register("good.alpha", probe("alpha"));
    r.register("good.beta", probe("beta"));
    r.register("not.a.manager", Factory::plain(|| Ok(Box::new("just a string".to_string()) as Product)));
    r.register("broken", Factory::plain(|| anyhow::bail!("out of handles")));
    r
}

const RESOURCE: &str = "jt-managers.list";

fn descriptor_dir(root: &TempDir, name: &str, content: &str) -> String {
    let dir = root.path().join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(RESOURCE), content).unwrap();
    dir.to_string_lossy().into_owned()
}

fn names(loaded: &[Registration<ManagerRef>]) -> Vec<String> {
    loaded.iter().map(|r| r.manager.help().name).collect()
}

#[test]
fn bad_entry_in_one_resource_does_not_stop_another() {
    let root = tempdir().unwrap();
    let a = descriptor_dir(&root, "a", "com.example.Missing\n");
    let b = descriptor_dir(&root, "b", "# the real one\n\ngood.alpha\n");

    let mut loader = ManagerLoader::new(registry(), vec![a, b]);
    loader.set_log(DiagnosticLog::new());
    let managers = loader.load_managers::<ManagerRef>(RESOURCE);

    assert_eq!(managers.len(), 1);
    assert_eq!(managers[0].help().name, "alpha");
    let log = loader.log().unwrap();
    assert_eq!(log.entries().len(), 1);
    assert!(log.entries()[0].message.contains("com.example.Missing"));
}

#[test]
fn wrong_type_and_failing_factory_are_skipped() {
    let root = tempdir().unwrap();
    let a = descriptor_dir(&root, "a", "not.a.manager\nbroken\ngood.beta\n");

    let mut loader = ManagerLoader::new(registry(), vec![a]);
    loader.set_log(DiagnosticLog::new());
    let loaded = loader.discover::<ManagerRef>(RESOURCE);

    assert_eq!(names(&loaded), vec!["beta"]);
    assert!(loaded[0].source.ends_with(RESOURCE));
    let messages: Vec<&str> = loader.log().unwrap().entries().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("is not a"));
    assert!(messages[1].contains("out of handles"));
}

#[test]
fn duplicates_collapse_in_discovery_order() {
    let root = tempdir().unwrap();
    let a = descriptor_dir(&root, "a", "good.beta\ngood.alpha\n");
    let b = descriptor_dir(&root, "b", "good.alpha\ngood.beta\n");

    let mut loader = ManagerLoader::new(registry(), vec![a.clone(), b]);
    let loaded = loader.discover::<ManagerRef>(RESOURCE);

    assert_eq!(names(&loaded), vec!["beta", "alpha"]);
    assert!(loaded.iter().all(|r| r.source.starts_with(&a)));
}

#[test]
fn classpath_directive_enables_addons_for_later_entries() {
    let mut extra = PluginRegistry::new();
    extra.register("addon.gamma", probe("gamma"));
    let mut other = PluginRegistry::new();
    other.register("addon.delta", probe("delta"));

    let text = "\
addon.gamma
# classpath=lib/extra.jar:lib/missing.jar
addon.gamma
addon.delta
# classpath=lib/other.jar
addon.delta
";
    let mut loader = ManagerLoader::new(registry(), Vec::new());
    loader.add_addon("lib/extra.jar", extra);
    loader.add_addon("lib/other.jar", other);
    loader.set_log(DiagnosticLog::new());

    let loaded = loader.discover_text::<ManagerRef>(Path::new("inline"), text);
    assert_eq!(names(&loaded), vec!["gamma", "delta"]);

    let messages: Vec<String> = loader.log().unwrap().entries().iter().map(|e| e.message.clone()).collect();
    // first gamma (no directive yet), the unknown location, the first delta
    assert_eq!(messages.len(), 3, "{messages:?}");
    assert!(messages[1].contains("lib/missing.jar"));
}

#[test]
fn constructor_args_need_an_argument_taking_factory() {
    let mut r = registry();
    r.register(
        "args.only",
        Factory::with_args(|a| {
            let name = if a.contains_key("fast") { "fast" } else { "slow" };
            Ok(Box::new(Arc::new(Probe(name)) as ManagerRef) as Product)
        }),
    );

    let mut loader = ManagerLoader::new(r, Vec::new());
    let mut args = ManagerArgs::new();
    args.insert("fast".into(), "yes".into());
    loader.set_manager_constructor_args(args);

    let loaded = loader.discover_text::<ManagerRef>(Path::new("x"), "good.alpha\nargs.only\n");
    assert_eq!(names(&loaded), vec!["fast"]);
}

#[test]
fn glob_entries_and_unreadable_descriptors() {
    let root = tempdir().unwrap();
    descriptor_dir(&root, "plugins/one", "good.alpha\n");
    let bad = root.path().join("plugins/two");
    fs::create_dir_all(&bad).unwrap();
    fs::write(bad.join(RESOURCE), [0xffu8, 0xfe, 0x00]).unwrap();

    let pattern = root.path().join("plugins/*").to_string_lossy().into_owned();
    let mut loader = ManagerLoader::new(registry(), vec![pattern]);
    loader.set_log(DiagnosticLog::new());

    assert_eq!(loader.find_resources(RESOURCE).len(), 2);
    let managers = loader.load_managers::<ManagerRef>(RESOURCE);
    assert_eq!(managers.len(), 1);
    assert!(loader.log().unwrap().entries()[0].message.contains("cannot read descriptor"));
}

#[test]
fn builtin_descriptor_loads_all_builtins() {
    let mut r = PluginRegistry::new();
    crate::cmd::managers::register_all_builtins(&mut r);
    let mut loader = ManagerLoader::new(r, Vec::new());
    let loaded = loader.discover_text::<ManagerRef>(
        Path::new("<builtin>"),
        crate::cmd::managers::DEFAULT_DESCRIPTOR,
    );
    assert_eq!(names(&loaded), vec!["help", "config", "desktop"]);
}
