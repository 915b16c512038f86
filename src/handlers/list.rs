use anyhow::Result;
use colored::*;
use std::path::Path;
use jt_cmd::config::JtConfig;
use crate::handlers::load_managers;

pub fn handle_list(config: &JtConfig, diagnostics: Option<&Path>) -> Result<()> {
    let loaded = load_managers(config, diagnostics)?;

    println!("{}", "Command Managers:".bold().underline());
    let max_len = loaded.iter().map(|r| r.id.len()).max().unwrap_or(0);

    for registration in &loaded {
        let help = registration.manager.help();
        let padding = " ".repeat(max_len - registration.id.len() + 2);
        println!(
            "  {}{}{} {}",
            registration.id.cyan(),
            padding,
            help.description.italic(),
            format!("({})", registration.source.display()).dimmed()
        );
        for child in &help.children {
            println!("      -{}", child.name);
        }
    }

    Ok(())
}
