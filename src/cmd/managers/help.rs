use crate::cmd::command::{Command, CommandArgs, DesktopMode};
use crate::cmd::context::CommandContext;
use crate::cmd::cursor::ArgCursor;
use crate::cmd::error::CommandError;
use crate::cmd::manager::{CommandManager, HelpNode, is_match, is_match_any};
use colored::*;

#[derive(Debug)]
pub struct HelpCommand {
    args: CommandArgs,
    topics: Vec<String>,
}

impl Command for HelpCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn desktop_mode(&self) -> DesktopMode {
        DesktopMode::Forbidden
    }

    fn run(&self, ctx: &mut CommandContext) -> Result<(), CommandError> {
        print!("{}", render_help(ctx.help_topics(), &self.topics));
        Ok(())
    }
}

#[derive(Debug)]
pub struct VersionCommand {
    args: CommandArgs,
}

impl Command for VersionCommand {
    fn args(&self) -> &CommandArgs {
        &self.args
    }

    fn desktop_mode(&self) -> DesktopMode {
        DesktopMode::Forbidden
    }

    fn run(&self, _ctx: &mut CommandContext) -> Result<(), CommandError> {
        println!("{} {}", env!("CARGO_PKG_NAME").bold(), env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}

/// Formats the help tree, keeping only families or commands that mention a
/// topic when any are given.
pub fn render_help(nodes: &[HelpNode], topics: &[String]) -> String {
    let wanted = |node: &HelpNode| {
        topics.is_empty()
            || topics.iter().any(|t| {
                let t = t.to_lowercase();
                node.name.to_lowercase().contains(&t) || node.description.to_lowercase().contains(&t)
            })
    };

    let mut out = String::new();
    for family in nodes {
        let family_match = wanted(family);
        let children: Vec<&HelpNode> = family
            .children
            .iter()
            .filter(|c| family_match || wanted(c))
            .collect();
        if !family_match && children.is_empty() {
            continue;
        }

        out.push_str(&format!("{} - {}\n", family.name.bold(), family.description));
        let width = children.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for child in children {
            let padding = " ".repeat(width - child.name.len() + 2);
            out.push_str(&format!("  -{}{}{}\n", child.name.cyan(), padding, child.description));
        }
    }
    if out.is_empty() {
        out.push_str("No help available for the given topics.\n");
    }
    out
}

#[derive(Default)]
pub struct HelpManager;

impl CommandManager for HelpManager {
    fn help(&self) -> HelpNode {
        HelpNode::new("help", "Command-line help")
            .child("help [topic...]", "Show help for all commands, or those matching the topics")
            .child("usage", "Same as help")
            .child("?", "Same as help")
            .child("version", "Show the program version")
    }

    fn parse_command(
        &self,
        cmd: &str,
        args: &mut ArgCursor,
        ctx: &mut CommandContext,
    ) -> Result<bool, CommandError> {
        if is_match(cmd, "version") {
            ctx.add_command(Box::new(VersionCommand {
                args: CommandArgs::new("version"),
            }));
            return Ok(true);
        }

        if !is_match_any(cmd, &["help", "usage", "?"]) {
            return Ok(false);
        }

        let mut cmd_args = CommandArgs::new("help");
        let mut topics = Vec::new();
        while args.has_next() {
            let topic = cmd_args.next_arg(args)?;
            if topic.starts_with('-') || topic.starts_with('@') {
                cmd_args.putback_arg(args);
                break;
            }
            topics.push(topic);
        }
        ctx.add_command(Box::new(HelpCommand {
            args: cmd_args,
            topics,
        }));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn help_collects_topics_until_next_option() {
        let mut ctx = CommandContext::new();
        let mut args = ArgCursor::new(strings(&["workdir", "laf", "-verbose"]));
        assert!(HelpManager.parse_command("?", &mut args, &mut ctx).unwrap());
        assert_eq!(args.peek(), Some("-verbose"));
        assert_eq!(ctx.commands()[0].to_command_line(), "help workdir laf");
    }

    #[test]
    fn unknown_token_is_left_alone() {
        let mut ctx = CommandContext::new();
        let mut args = ArgCursor::new(strings(&["x"]));
        assert!(!HelpManager.parse_command("open", &mut args, &mut ctx).unwrap());
        assert_eq!(args.position(), 0);
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn render_filters_by_topic() {
        colored::control::set_override(false);
        let nodes = vec![
            HelpNode::new("config", "Configuration").child("open <path>", "Open a file"),
            HelpNode::new("desktop", "Desktop").child("laf <name>", "Look and feel"),
        ];
        let all = render_help(&nodes, &[]);
        assert!(all.contains("config - Configuration"));
        assert!(all.contains("  -laf <name>  Look and feel"));

        let some = render_help(&nodes, &strings(&["LAF"]));
        assert!(!some.contains("config"));
        assert!(some.contains("-laf <name>"));

        let none = render_help(&nodes, &strings(&["nothing"]));
        assert!(none.starts_with("No help available"));
    }
}
