mod cli;
mod handlers;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use handlers::{list, run};
use jt_cmd::config;
use std::env;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.settings {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&env::current_dir()?)?,
    };

    if cli.list {
        list::handle_list(&config, cli.diagnostics.as_deref())
    } else {
        let opts = run::RunOptions {
            url_encoded: cli.url_encoded,
            dry_run: cli.dry_run,
            diagnostics: cli.diagnostics.as_deref(),
        };
        run::handle_run(&cli.args, &config, &opts)
    }
}
