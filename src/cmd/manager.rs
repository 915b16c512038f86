use crate::cmd::context::CommandContext;
use crate::cmd::cursor::ArgCursor;
use crate::cmd::error::CommandError;
use std::sync::Arc;

/// Documentation for one command family or command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpNode {
    pub name: String,
    pub description: String,
    pub children: Vec<HelpNode>,
}

impl HelpNode {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, name: &str, description: &str) -> Self {
        self.children.push(HelpNode::new(name, description));
        self
    }
}

/// A recognizer and parser for one family of commands.
pub trait CommandManager {
    fn help(&self) -> HelpNode;

    /// Claims `cmd` (already stripped of any leading `-`) and consumes its
    /// arguments from `args`, usually appending a command to `ctx`.
    ///
    /// Returns `Ok(false)` without touching `args` when the token belongs to
    /// some other manager.
    fn parse_command(
        &self,
        cmd: &str,
        args: &mut ArgCursor,
        ctx: &mut CommandContext,
    ) -> Result<bool, CommandError>;
}

pub type ManagerRef = Arc<dyn CommandManager>;

pub fn is_match(cmd: &str, reference: &str) -> bool {
    cmd.eq_ignore_ascii_case(reference)
}

pub fn is_match_any(cmd: &str, references: &[&str]) -> bool {
    references.iter().any(|r| is_match(cmd, r))
}

pub fn is_prefix_match(cmd: &str, reference: &str) -> bool {
    cmd.len() >= reference.len()
        && cmd.is_char_boundary(reference.len())
        && cmd[..reference.len()].eq_ignore_ascii_case(reference)
}
