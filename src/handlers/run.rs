use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::path::Path;
use jt_cmd::cmd::command::DesktopMode;
use jt_cmd::cmd::context::CommandContext;
use jt_cmd::cmd::parser::CommandParser;
use jt_cmd::config::JtConfig;
use crate::handlers::load_managers;

pub struct RunOptions<'a> {
    pub url_encoded: bool,
    pub dry_run: bool,
    pub diagnostics: Option<&'a Path>,
}

pub fn handle_run(args: &[String], config: &JtConfig, opts: &RunOptions<'_>) -> Result<()> {
    let loaded = load_managers(config, opts.diagnostics)?;
    let parser = CommandParser::new(loaded.into_iter().map(|r| r.manager).collect());

    let mut ctx = CommandContext::new();
    ctx.set_help_topics(parser.help());
    if let Some(laf) = &config.defaults.look_and_feel {
        ctx.set_look_and_feel(laf);
    }
    ctx.set_verbose(&config.defaults.verbose);

    if args.is_empty() {
        println!("Nothing to do. Try {}", "jt -- -help".bold());
        return Ok(());
    }

    let parsed = if opts.url_encoded {
        parser.parse_encoded(args, &mut ctx)
    } else {
        parser.parse(args, &mut ctx)
    };
    parsed.context("Invalid harness arguments")?;

    let mode = ctx.desktop_mode()?;

    if opts.dry_run {
        for cmd in ctx.commands() {
            println!("{}", cmd.to_command_line());
        }
        println!("{} {}", "Desktop:".dimmed(), describe(mode));
        return Ok(());
    }

    let count = ctx.run_commands()?;
    info!("Ran {} command(s)", count);
    print_summary(&ctx, mode);
    Ok(())
}

fn describe(mode: DesktopMode) -> &'static str {
    match mode {
        DesktopMode::Required => "required",
        DesktopMode::Forbidden => "not used",
        DesktopMode::Indifferent => "optional",
    }
}

fn print_summary(ctx: &CommandContext, mode: DesktopMode) {
    if !ctx.is_verbose("default") && !ctx.is_verbose("commands") {
        return;
    }
    if let Some(config) = &ctx.config {
        println!("   Configuration: {}", config.path.display().to_string().bold());
    }
    if let Some(wd) = &ctx.work_dir {
        println!("   Work dir:      {}", wd.display());
    }
    if let Some(ts) = &ctx.test_suite {
        println!("   Test suite:    {}", ts.display());
    }
    if !ctx.tests.is_empty() {
        println!("   Tests:         {}", ctx.tests.join(" "));
    }
    if let Some(laf) = &ctx.look_and_feel {
        println!("   Look and feel: {}", laf);
    }
    println!("   Desktop:       {}", describe(mode));
}
