use crate::loader::ManagerArgs;
use crate::utils::split_path_list;
use anyhow::{Context, Result};
use colored::*;
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "jt.toml";
pub const DEFAULT_RESOURCE: &str = "jt-managers.list";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct JtConfig {
    pub managers: ManagersConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ManagersConfig {
    /// File name of the manager descriptor looked up in each search entry.
    pub resource: String,
    pub search_path: Vec<String>,
    /// Constructor arguments handed to every manager.
    pub args: Option<ManagerArgs>,
}

impl Default for ManagersConfig {
    fn default() -> Self {
        Self {
            resource: DEFAULT_RESOURCE.to_string(),
            search_path: Vec::new(),
            args: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DefaultsConfig {
    pub look_and_feel: Option<String>,
    pub verbose: Vec<String>,
}

/// Loads `jt.toml` from `dir`; a missing file gives the defaults.
pub fn load_config(dir: &Path) -> Result<JtConfig> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        load_config_file(&config_path)
    } else {
        debug!("No {} in {}, using defaults", CONFIG_FILE, dir.display());
        let mut config = JtConfig::default();
        apply_env_overrides(&mut config, dir)?;
        Ok(config)
    }
}

pub fn load_config_file(path: &Path) -> Result<JtConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    // 1. Parse jt.toml (Base Layer)
    let mut config: JtConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    config.managers.search_path = resolve_entries(dir, &config.managers.search_path);

    // 2. Environment (Override Layer)
    apply_env_overrides(&mut config, dir)?;
    Ok(config)
}

/// `.env` (or `.env.$JT_ENV`) first, then the process environment.
fn apply_env_overrides(config: &mut JtConfig, dir: &Path) -> Result<()> {
    let env_filename = env::var("JT_ENV")
        .map(|v| format!(".env.{}", v))
        .unwrap_or_else(|_| ".env".to_string());
    let env_path = dir.join(&env_filename);

    if env_path.exists() {
        eprintln!("{} Loading environment from: {}", "🌿".green(), env_filename.bold());
        for item in dotenvy::from_path_iter(&env_path)? {
            let (key, val) = item?;
            apply_override(config, dir, &key, &val);
        }
    }

    for key in ["JT_MANAGER_PATH", "JT_MANAGER_RESOURCE"] {
        if let Ok(val) = env::var(key) {
            apply_override(config, dir, key, &val);
        }
    }
    Ok(())
}

fn apply_override(config: &mut JtConfig, dir: &Path, key: &str, val: &str) {
    match key {
        "JT_MANAGER_PATH" => {
            config.managers.search_path = resolve_entries(dir, &split_path_list(val));
        }
        "JT_MANAGER_RESOURCE" => config.managers.resource = val.to_string(),
        _ => {}
    }
}

fn resolve_entries(dir: &Path, entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            if Path::new(e).is_absolute() {
                e.clone()
            } else {
                dir.join(e).to_string_lossy().into_owned()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.managers.resource, DEFAULT_RESOURCE);
        assert!(config.managers.args.is_none());
    }

    #[test]
    fn parses_and_resolves_search_path() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[managers]
search_path = ["plugins/*", "/opt/jt"]

[managers.args]
look_and_feel = "nimbus"

[defaults]
verbose = ["commands"]
"#,
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.managers.resource, DEFAULT_RESOURCE);
        assert_eq!(
            config.managers.search_path[0],
            dir.path().join("plugins/*").to_string_lossy()
        );
        assert_eq!(config.managers.search_path[1], "/opt/jt");
        assert_eq!(
            config.managers.args.unwrap().get("look_and_feel").map(String::as_str),
            Some("nimbus")
        );
        assert_eq!(config.defaults.verbose, vec!["commands"]);
    }

    #[test]
    fn dotenv_overrides_search_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[managers]\nsearch_path = [\"a\"]\n").unwrap();
        fs::write(dir.path().join(".env"), "JT_MANAGER_PATH=b:c\n").unwrap();

        let config = load_config(dir.path()).unwrap();
        let expected: Vec<String> = ["b", "c"]
            .iter()
            .map(|e| dir.path().join(e).to_string_lossy().into_owned())
            .collect();
        // the process environment may still override in a developer shell
        if env::var("JT_MANAGER_PATH").is_err() {
            assert_eq!(config.managers.search_path, expected);
        }
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[managers\n").unwrap();
        assert!(load_config(dir.path()).is_err());
    }
}
