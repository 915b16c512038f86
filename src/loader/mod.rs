//! Discovery of pluggable managers.
//!
//! Descriptor resources are plain text files with one plugin identifier per
//! line. Blank lines and `#` comments are ignored, except for a
//! `# classpath=<location>[:<location>...]` directive which makes the add-on
//! registries registered at those locations available to the identifiers
//! listed after it in the same file. A later directive replaces an earlier
//! one.
//!
//! Loading is fault tolerant: every problem is reported and only skips the
//! entry (or resource) it concerns.

pub mod registry;

use crate::logger::DiagnosticLog;
use crate::utils::split_path_list;
use log::{debug, warn};
use regex::Regex;
use registry::PluginRegistry;
use std::any::{Any, type_name};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Constructor arguments applied uniformly to every discovered plugin.
pub type ManagerArgs = BTreeMap<String, String>;

static CLASSPATH_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*classpath\s*=\s*(.*)$").unwrap());

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read descriptor {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad search path entry '{entry}': {message}")]
    BadSearchEntry { entry: String, message: String },

    #[error("no add-on registered at '{0}'")]
    UnknownAddon(String),

    #[error("'{0}' not found")]
    NotFound(String),

    #[error("'{id}' has no {form} constructor")]
    NoConstructor { id: String, form: &'static str },

    #[error("cannot create '{id}': {source}")]
    Instantiate {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("'{id}' is not a {expected}")]
    WrongType { id: String, expected: &'static str },
}

/// One successfully loaded plugin and the descriptor that declared it.
#[derive(Debug, Clone)]
pub struct Registration<P> {
    pub id: String,
    pub source: PathBuf,
    pub manager: P,
}

pub struct ManagerLoader {
    registry: PluginRegistry,
    addons: HashMap<String, PluginRegistry>,
    search_path: Vec<String>,
    ctor_args: Option<ManagerArgs>,
    log: Option<DiagnosticLog>,
}

impl ManagerLoader {
    /// `search_path` entries are directories or glob patterns matching
    /// directories.
    pub fn new(registry: PluginRegistry, search_path: Vec<String>) -> Self {
        Self {
            registry,
            addons: HashMap::new(),
            search_path,
            ctor_args: None,
            log: None,
        }
    }

    pub fn add_addon(&mut self, location: &str, registry: PluginRegistry) {
        self.addons.insert(location.to_string(), registry);
    }

    pub fn set_manager_constructor_args(&mut self, args: ManagerArgs) {
        self.ctor_args = Some(args);
    }

    pub fn set_log(&mut self, log: DiagnosticLog) {
        self.log = Some(log);
    }

    pub fn log(&self) -> Option<&DiagnosticLog> {
        self.log.as_ref()
    }

    /// Every file called `resource` directly inside a search-path directory.
    pub fn find_resources(&mut self, resource: &str) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for entry in self.search_path.clone() {
            if entry.contains(['*', '?', '[']) {
                match glob::glob(&entry) {
                    Ok(paths) => {
                        for path in paths {
                            match path {
                                Ok(p) => dirs.push(p),
                                Err(e) => self.report(
                                    &entry,
                                    &LoadError::BadSearchEntry {
                                        entry: entry.clone(),
                                        message: e.to_string(),
                                    },
                                ),
                            }
                        }
                    }
                    Err(e) => self.report(
                        &entry,
                        &LoadError::BadSearchEntry {
                            entry: entry.clone(),
                            message: e.to_string(),
                        },
                    ),
                }
            } else {
                dirs.push(PathBuf::from(&entry));
            }
        }

        dirs.into_iter()
            .map(|dir| dir.join(resource))
            .filter(|candidate| candidate.is_file())
            .collect()
    }

    /// Loads every plugin named by every `resource` on the search path,
    /// keeping only products of type `P`.
    pub fn discover<P: Any>(&mut self, resource: &str) -> Vec<Registration<P>> {
        let mut seen = HashSet::new();
        let mut loaded = Vec::new();

        for file in self.find_resources(resource) {
            match fs::read_to_string(&file) {
                Ok(text) => self.load_descriptor(&file, &text, &mut seen, &mut loaded),
                Err(source) => {
                    let err = LoadError::Unreadable {
                        path: file.clone(),
                        source,
                    };
                    self.report(&file.display().to_string(), &err);
                }
            }
        }
        loaded
    }

    /// Loads the plugins named in descriptor `text`, attributed to `source`.
    pub fn discover_text<P: Any>(&mut self, source: &Path, text: &str) -> Vec<Registration<P>> {
        let mut loaded = Vec::new();
        self.load_descriptor(source, text, &mut HashSet::new(), &mut loaded);
        loaded
    }

    pub fn load_managers<P: Any>(&mut self, resource: &str) -> Vec<P> {
        self.discover(resource).into_iter().map(|r| r.manager).collect()
    }

    fn load_descriptor<P: Any>(
        &mut self,
        source: &Path,
        text: &str,
        seen: &mut HashSet<String>,
        loaded: &mut Vec<Registration<P>>,
    ) {
        let origin = source.display().to_string();
        let mut addons: Vec<String> = Vec::new();

        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                if let Some(caps) = CLASSPATH_DIRECTIVE.captures(line) {
                    addons = split_path_list(&caps[1]);
                    for location in &addons {
                        if !self.addons.contains_key(location) {
                            self.report(&origin, &LoadError::UnknownAddon(location.clone()));
                        }
                    }
                }
                continue;
            }

            if seen.contains(line) {
                debug!("{}:{}: '{}' already loaded", origin, n + 1, line);
                continue;
            }
            match self.instantiate::<P>(line, &addons) {
                Ok(manager) => {
                    debug!("{}:{}: loaded '{}'", origin, n + 1, line);
                    seen.insert(line.to_string());
                    loaded.push(Registration {
                        id: line.to_string(),
                        source: source.to_path_buf(),
                        manager,
                    });
                }
                Err(e) => self.report(&format!("{}:{}", origin, n + 1), &e),
            }
        }
    }

    fn instantiate<P: Any>(&self, id: &str, addons: &[String]) -> Result<P, LoadError> {
        let factory = self
            .registry
            .get(id)
            .or_else(|| {
                addons
                    .iter()
                    .find_map(|location| self.addons.get(location).and_then(|r| r.get(id)))
            })
            .ok_or_else(|| LoadError::NotFound(id.to_string()))?;

        let product = factory.build(id, self.ctor_args.as_ref())?;
        product
            .downcast::<P>()
            .map(|boxed| *boxed)
            .map_err(|_| LoadError::WrongType {
                id: id.to_string(),
                expected: type_name::<P>(),
            })
    }

    fn report(&mut self, origin: &str, err: &LoadError) {
        warn!("{}: {}", origin, err);
        if let Some(log) = self.log.as_mut() {
            log.record(origin, &err.to_string());
        }
    }
}

#[cfg(test)]
mod tests;
