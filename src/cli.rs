use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jt",
    version,
    about = "Test harness command line",
    after_help = "Harness arguments follow the options, e.g. `jt -- -open demo.jti -verbose:commands`.\n\
                  Use `jt -- -help` to list the harness commands."
)]
pub struct Cli {
    /// Settings file to use instead of ./jt.toml
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Harness arguments are URL-encoded
    #[arg(long)]
    pub url_encoded: bool,

    /// Append manager loading diagnostics to FILE
    #[arg(long, value_name = "FILE")]
    pub diagnostics: Option<PathBuf>,

    /// List the available command managers and exit
    #[arg(long)]
    pub list: bool,

    /// Print the parsed commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Harness arguments: options, @files and an optional trailing file to open
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}
