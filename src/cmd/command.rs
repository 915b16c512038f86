use crate::cmd::context::CommandContext;
use crate::cmd::cursor::ArgCursor;
use crate::cmd::error::CommandError;
use crate::utils::quote_arg;
use std::fmt;

/// Whether running a command needs the graphical desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DesktopMode {
    Required,
    Forbidden,
    #[default]
    Indifferent,
}

/// The recorded arguments of one command; the first entry is its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    args: Vec<String>,
}

impl CommandArgs {
    pub fn new(name: &str) -> Self {
        Self {
            args: vec![name.to_string()],
        }
    }

    pub fn name(&self) -> &str {
        &self.args[0]
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn add_arg(&mut self, arg: &str) {
        self.args.push(arg.to_string());
    }

    /// Consumes the next token and records it as an argument.
    pub fn next_arg(&mut self, cursor: &mut ArgCursor) -> Result<String, CommandError> {
        let arg = cursor
            .advance()
            .ok_or_else(|| CommandError::MissingArg(self.name().to_string()))?;
        self.args.push(arg.clone());
        Ok(arg)
    }

    /// Undoes the most recent `next_arg`.
    pub fn putback_arg(&mut self, cursor: &mut ArgCursor) {
        if self.args.len() > 1 {
            self.args.pop();
            cursor.rewind(1);
        }
    }
}

impl fmt::Display for CommandArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&quote_arg(arg))?;
        }
        Ok(())
    }
}

pub trait Command: fmt::Debug {
    fn args(&self) -> &CommandArgs;

    fn name(&self) -> &str {
        self.args().name()
    }

    fn desktop_mode(&self) -> DesktopMode {
        DesktopMode::Indifferent
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError>;

    /// Shell-safe rendering used when echoing or replaying the command.
    fn to_command_line(&self) -> String {
        self.args().to_string()
    }
}
