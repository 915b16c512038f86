use crate::cmd::command::{Command, DesktopMode};
use crate::cmd::error::CommandError;
use crate::cmd::manager::HelpNode;
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A harness configuration file: `key=value` lines, `#` comments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarnessConfig {
    pub path: PathBuf,
    pub values: BTreeMap<String, String>,
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let mut values = BTreeMap::new();
        for (n, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .with_context(|| format!("{}:{}: expected key=value", path.display(), n + 1))?;
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Accumulates parsed commands and the settings they read and change.
#[derive(Debug, Default)]
pub struct CommandContext {
    commands: Vec<Box<dyn Command>>,
    pub verbose: Vec<String>,
    pub look_and_feel: Option<String>,
    pub config: Option<HarnessConfig>,
    pub work_dir: Option<PathBuf>,
    pub test_suite: Option<PathBuf>,
    pub tests: Vec<String>,
    pub resume_desktop: bool,
    help_topics: Vec<HelpNode>,
}

impl CommandContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: Box<dyn Command>) {
        debug!("Accepted command: {}", command.to_command_line());
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Box<dyn Command>] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Box<dyn Command>> {
        std::mem::take(&mut self.commands)
    }

    pub fn get_config(&mut self) -> Result<&mut HarnessConfig, CommandError> {
        self.config.as_mut().ok_or(CommandError::NoConfig)
    }

    pub fn set_verbose(&mut self, flags: &[String]) {
        for flag in flags {
            if !self.verbose.contains(flag) {
                self.verbose.push(flag.clone());
            }
        }
    }

    pub fn is_verbose(&self, flag: &str) -> bool {
        self.verbose.iter().any(|f| f == flag || f == "max")
    }

    pub fn set_look_and_feel(&mut self, laf: &str) {
        self.look_and_feel = Some(laf.to_string());
    }

    pub fn set_help_topics(&mut self, topics: Vec<HelpNode>) {
        self.help_topics = topics;
    }

    pub fn help_topics(&self) -> &[HelpNode] {
        &self.help_topics
    }

    /// Combines the advisory desktop modes of every pending command.
    pub fn desktop_mode(&self) -> Result<DesktopMode, CommandError> {
        let required = self
            .commands
            .iter()
            .find(|c| c.desktop_mode() == DesktopMode::Required);
        let forbidden = self
            .commands
            .iter()
            .find(|c| c.desktop_mode() == DesktopMode::Forbidden);

        match (required, forbidden) {
            (Some(r), Some(f)) => Err(CommandError::DesktopConflict {
                required: r.name().to_string(),
                forbidden: f.name().to_string(),
            }),
            (Some(_), None) => Ok(DesktopMode::Required),
            (None, Some(_)) => Ok(DesktopMode::Forbidden),
            (None, None) => Ok(DesktopMode::Indifferent),
        }
    }

    /// Runs the pending commands in order, stopping at the first failure.
    pub fn run_commands(&mut self) -> Result<usize, CommandError> {
        let commands = self.take_commands();
        let total = commands.len();
        for cmd in commands {
            info!("Running: {}", cmd.to_command_line());
            cmd.run(self).map_err(|e| {
                CommandError::failed(format!("'{}' failed: {}", cmd.to_command_line(), e), e)
            })?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::command::CommandArgs;
    use std::io::Write;

    #[derive(Debug)]
    struct Mark(CommandArgs, DesktopMode);

    impl Command for Mark {
        fn args(&self) -> &CommandArgs {
            &self.0
        }
        fn desktop_mode(&self) -> DesktopMode {
            self.1
        }
        fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
            if self.name() == "boom" {
                return Err(CommandError::Message("boom".into()));
            }
            ctx.tests.push(self.name().to_string());
            Ok(())
        }
    }

    fn mark(name: &str, mode: DesktopMode) -> Box<dyn Command> {
        Box::new(Mark(CommandArgs::new(name), mode))
    }

    #[test]
    fn runs_in_order_and_stops_on_failure() {
        let mut ctx = CommandContext::new();
        ctx.add_command(mark("a", DesktopMode::Indifferent));
        ctx.add_command(mark("boom", DesktopMode::Indifferent));
        ctx.add_command(mark("c", DesktopMode::Indifferent));

        let err = ctx.run_commands().unwrap_err();
        assert!(err.to_string().contains("'boom' failed"));
        assert_eq!(ctx.tests, vec!["a".to_string()]);
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn desktop_mode_resolution() {
        let mut ctx = CommandContext::new();
        assert_eq!(ctx.desktop_mode().unwrap(), DesktopMode::Indifferent);
        ctx.add_command(mark("newDesktop", DesktopMode::Required));
        assert_eq!(ctx.desktop_mode().unwrap(), DesktopMode::Required);
        ctx.add_command(mark("batch", DesktopMode::Forbidden));
        let err = ctx.desktop_mode().unwrap_err();
        assert!(matches!(err, CommandError::DesktopConflict { .. }));
    }

    #[test]
    fn get_config_without_open_fails() {
        let mut ctx = CommandContext::new();
        assert!(matches!(ctx.get_config(), Err(CommandError::NoConfig)));
    }

    #[test]
    fn harness_config_load() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "# comment\nname = demo\n\ntimeout=30").unwrap();
        let cfg = HarnessConfig::load(f.path()).unwrap();
        assert_eq!(cfg.get("name"), Some("demo"));
        assert_eq!(cfg.get("timeout"), Some("30"));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "no equals here").unwrap();
        assert!(HarnessConfig::load(bad.path()).is_err());
    }

    #[test]
    fn verbose_flags_accumulate() {
        let mut ctx = CommandContext::new();
        ctx.set_verbose(&["commands".to_string()]);
        ctx.set_verbose(&["commands".to_string(), "loader".to_string()]);
        assert_eq!(ctx.verbose.len(), 2);
        assert!(ctx.is_verbose("loader"));
        assert!(!ctx.is_verbose("other"));
    }
}
