// Commands that select what the harness works on: configuration files,
// work directories, test suites and the tests to run.
use crate::cmd::command::{Command, CommandArgs};
use crate::cmd::context::{CommandContext, HarnessConfig};
use crate::cmd::cursor::ArgCursor;
use crate::cmd::error::CommandError;
use crate::cmd::manager::{CommandManager, HelpNode, is_match, is_match_any};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory that marks a work directory.
pub const WORK_DIR_MARKER: &str = "jtData";
/// File that marks a test suite root.
pub const TEST_SUITE_MARKER: &str = "testsuite.jtt";

pub fn is_work_dir(path: &Path) -> bool {
    path.join(WORK_DIR_MARKER).is_dir()
}

pub fn is_test_suite(path: &Path) -> bool {
    path.join(TEST_SUITE_MARKER).is_file()
}

fn load_config(path: &Path) -> Result<HarnessConfig, CommandError> {
    HarnessConfig::load(path)
        .map_err(|e| CommandError::failed(format!("cannot open configuration {}", path.display()), e))
}

#[derive(Debug)]
pub struct OpenCommand {
    args: CommandArgs,
    path: PathBuf,
}

impl Command for OpenCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        let path = &self.path;
        if path.is_file() {
            ctx.config = Some(load_config(path)?);
        } else if is_work_dir(path) {
            ctx.work_dir = Some(path.clone());
        } else if is_test_suite(path) {
            ctx.test_suite = Some(path.clone());
        } else {
            return Err(CommandError::BadValue {
                option: "open".to_string(),
                value: format!("{} is not a configuration, work directory or test suite", path.display()),
            });
        }
        info!("Opened {}", path.display());
        Ok(())
    }
}

#[derive(Debug)]
pub struct ConfigCommand {
    args: CommandArgs,
    path: PathBuf,
}

impl Command for ConfigCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        ctx.config = Some(load_config(&self.path)?);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkDirMode {
    Existing,
    Create,
    Overwrite,
}

#[derive(Debug)]
pub struct WorkDirCommand {
    args: CommandArgs,
    path: PathBuf,
    mode: WorkDirMode,
}

impl Command for WorkDirCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        let path = &self.path;
        let io_err = |what: &str, e: std::io::Error| {
            CommandError::failed(format!("cannot {} work directory {}", what, path.display()), e)
        };

        match self.mode {
            WorkDirMode::Existing => {
                if !is_work_dir(path) {
                    return Err(CommandError::BadValue {
                        option: "workdir".to_string(),
                        value: format!("{} is not a work directory", path.display()),
                    });
                }
            }
            WorkDirMode::Create => {
                if path.exists() {
                    return Err(CommandError::BadValue {
                        option: "workdir -create".to_string(),
                        value: format!("{} already exists", path.display()),
                    });
                }
                fs::create_dir_all(path.join(WORK_DIR_MARKER)).map_err(|e| io_err("create", e))?;
            }
            WorkDirMode::Overwrite => {
                if path.exists() {
                    fs::remove_dir_all(path).map_err(|e| io_err("remove", e))?;
                }
                fs::create_dir_all(path.join(WORK_DIR_MARKER)).map_err(|e| io_err("create", e))?;
            }
        }
        ctx.work_dir = Some(path.clone());
        Ok(())
    }
}

#[derive(Debug)]
pub struct TestSuiteCommand {
    args: CommandArgs,
    path: PathBuf,
}

impl Command for TestSuiteCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        if !self.path.is_dir() {
            return Err(CommandError::BadValue {
                option: "testsuite".to_string(),
                value: format!("{} is not a directory", self.path.display()),
            });
        }
        ctx.test_suite = Some(self.path.clone());
        Ok(())
    }
}

#[derive(Debug)]
pub struct SetCommand {
    args: CommandArgs,
    key: String,
    value: String,
}

impl Command for SetCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        ctx.get_config()?.set(&self.key, &self.value);
        Ok(())
    }
}

#[derive(Debug)]
pub struct TestsCommand {
    args: CommandArgs,
}

impl Command for TestsCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        ctx.tests.extend(self.args.args()[1..].iter().cloned());
        Ok(())
    }
}

#[derive(Default)]
pub struct ConfigManager;

impl CommandManager for ConfigManager {
    fn help(&self) -> HelpNode {
        HelpNode::new("config", "Select the configuration, work directory and test suite")
            .child("open <path>", "Open a configuration file, work directory or test suite")
            .child("config <file>", "Open a configuration file")
            .child("workdir [-create|-overwrite] <dir>", "Use a work directory, optionally creating it")
            .child("testsuite <dir>", "Use a test suite")
            .child("set <name> <value>", "Set a value in the open configuration")
            .child("tests <test>...", "Restrict the run to the given tests")
    }

    fn parse_command(
        &self,
        cmd: &str,
        args: &mut ArgCursor,
        ctx: &mut CommandContext,
    ) -> Result<bool, CommandError> {
        if is_match(cmd, "open") {
            let mut cmd_args = CommandArgs::new("open");
            let path = PathBuf::from(cmd_args.next_arg(args)?);
            ctx.add_command(Box::new(OpenCommand { args: cmd_args, path }));
        } else if is_match(cmd, "config") {
            let mut cmd_args = CommandArgs::new("config");
            let path = PathBuf::from(cmd_args.next_arg(args)?);
            ctx.add_command(Box::new(ConfigCommand { args: cmd_args, path }));
        } else if is_match_any(cmd, &["workdir", "workDirectory", "wd"]) {
            let mut cmd_args = CommandArgs::new("workdir");
            let mut arg = cmd_args.next_arg(args)?;
            let mode = if is_match(&arg, "-create") {
                WorkDirMode::Create
            } else if is_match(&arg, "-overwrite") {
                WorkDirMode::Overwrite
            } else {
                WorkDirMode::Existing
            };
            if mode != WorkDirMode::Existing {
                arg = cmd_args.next_arg(args)?;
            }
            ctx.add_command(Box::new(WorkDirCommand {
                args: cmd_args,
                path: PathBuf::from(arg),
                mode,
            }));
        } else if is_match_any(cmd, &["testsuite", "ts"]) {
            let mut cmd_args = CommandArgs::new("testsuite");
            let path = PathBuf::from(cmd_args.next_arg(args)?);
            ctx.add_command(Box::new(TestSuiteCommand { args: cmd_args, path }));
        } else if is_match(cmd, "set") {
            let mut cmd_args = CommandArgs::new("set");
            let key = cmd_args.next_arg(args)?;
            let value = cmd_args.next_arg(args)?;
            ctx.add_command(Box::new(SetCommand {
                args: cmd_args,
                key,
                value,
            }));
        } else if is_match(cmd, "tests") {
            let mut cmd_args = CommandArgs::new("tests");
            while args.has_next() {
                let test = cmd_args.next_arg(args)?;
                if test.starts_with('-') || test.starts_with('@') {
                    cmd_args.putback_arg(args);
                    break;
                }
            }
            if cmd_args.args().len() == 1 {
                return Err(CommandError::MissingArg("tests".to_string()));
            }
            ctx.add_command(Box::new(TestsCommand { args: cmd_args }));
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}
