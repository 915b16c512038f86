use crate::cmd::command::{Command, CommandArgs, DesktopMode};
use crate::cmd::context::CommandContext;
use crate::cmd::cursor::ArgCursor;
use crate::cmd::error::CommandError;
use crate::cmd::manager::{CommandManager, HelpNode, is_match, is_match_any, is_prefix_match};
use crate::loader::ManagerArgs;

pub const LOOK_AND_FEELS: &[&str] = &["metal", "nimbus", "system"];

#[derive(Debug)]
pub struct DesktopCommand {
    args: CommandArgs,
    resume: bool,
    default_laf: Option<String>,
}

impl Command for DesktopCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn desktop_mode(&self) -> DesktopMode {
        DesktopMode::Required
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        ctx.resume_desktop = self.resume;
        if ctx.look_and_feel.is_none() {
            ctx.look_and_feel = self.default_laf.clone();
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct BatchCommand {
    args: CommandArgs,
}

impl Command for BatchCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn desktop_mode(&self) -> DesktopMode {
        DesktopMode::Forbidden
    }

    fn run(&self, _ctx: &mut CommandContext) -> Result<(), CommandError> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct LookAndFeelCommand {
    args: CommandArgs,
    laf: String,
}

impl Command for LookAndFeelCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        ctx.set_look_and_feel(&self.laf);
        Ok(())
    }
}

#[derive(Debug)]
pub struct VerboseCommand {
    args: CommandArgs,
    flags: Vec<String>,
}

impl Command for VerboseCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        ctx.set_verbose(&self.flags);
        Ok(())
    }
}

/// Desktop and presentation commands.
#[derive(Default)]
pub struct DesktopManager {
    default_laf: Option<String>,
}

impl DesktopManager {
    /// Reads `look_and_feel` from the constructor arguments.
    pub fn with_args(args: &ManagerArgs) -> Self {
        Self {
            default_laf: args.get("look_and_feel").cloned(),
        }
    }
}

impl CommandManager for DesktopManager {
    fn help(&self) -> HelpNode {
        HelpNode::new("desktop", "Control the desktop and how it is presented")
            .child("newDesktop", "Start with a new, empty desktop")
            .child("resume", "Restore the previous desktop")
            .child("batch", "Run without a desktop")
            .child("laf <metal|nimbus|system>", "Select the look and feel")
            .child("verbose[:flag,...]", "Enable verbose output, optionally for specific areas")
    }

    fn parse_command(
        &self,
        cmd: &str,
        args: &mut ArgCursor,
        ctx: &mut CommandContext,
    ) -> Result<bool, CommandError> {
        if is_match_any(cmd, &["newDesktop", "resume"]) {
            let resume = is_match(cmd, "resume");
            ctx.add_command(Box::new(DesktopCommand {
                args: CommandArgs::new(if resume { "resume" } else { "newDesktop" }),
                resume,
                default_laf: self.default_laf.clone(),
            }));
        } else if is_match_any(cmd, &["batch", "noDesktop"]) {
            ctx.add_command(Box::new(BatchCommand {
                args: CommandArgs::new("batch"),
            }));
        } else if is_match(cmd, "laf") {
            let mut cmd_args = CommandArgs::new("laf");
            let laf = cmd_args.next_arg(args)?.to_lowercase();
            if !LOOK_AND_FEELS.contains(&laf.as_str()) {
                return Err(CommandError::BadValue {
                    option: "laf".to_string(),
                    value: laf,
                });
            }
            ctx.add_command(Box::new(LookAndFeelCommand { args: cmd_args, laf }));
        } else if is_prefix_match(cmd, "verbose") {
            let rest = &cmd["verbose".len()..];
            let flags: Vec<String> = match rest.strip_prefix(':') {
                Some(list) => list
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_lowercase)
                    .collect(),
                None if rest.is_empty() => vec!["default".to_string()],
                None => return Ok(false),
            };
            if flags.is_empty() {
                return Err(CommandError::BadValue {
                    option: "verbose".to_string(),
                    value: cmd.to_string(),
                });
            }
            ctx.add_command(Box::new(VerboseCommand {
                args: CommandArgs::new(cmd),
                flags,
            }));
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}
