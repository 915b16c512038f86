use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by a command or by the manager that parses it.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing argument for '{0}'")]
    MissingArg(String),

    #[error("bad value for '{option}': {value}")]
    BadValue { option: String, value: String },

    #[error("no configuration has been opened")]
    NoConfig,

    #[error("conflicting desktop requirements: '{required}' needs a desktop but '{forbidden}' forbids one")]
    DesktopConflict { required: String, forbidden: String },

    #[error("{0}")]
    Message(String),

    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CommandError {
    pub fn failed(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        CommandError::Failed {
            message: message.into(),
            source: source.into(),
        }
    }
}

/// Failure raised while turning arguments or command files into commands.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing argument to -read")]
    MissingReadArg,

    #[error("unrecognized option: {0}")]
    UnrecognizedOption(String),

    #[error("unrecognized argument: {0}")]
    UnrecognizedArgument(String),

    #[error("{file}:{line}: unrecognized command: {name}")]
    UnrecognizedCommand { file: String, line: usize, name: String },

    #[error("{file}:{line}: excess arguments for '{name}': {excess}")]
    ExcessArgs {
        file: String,
        line: usize,
        name: String,
        excess: String,
    },

    #[error("{file}:{line}: 'read' needs exactly one file argument")]
    BadReadCommand { file: String, line: usize },

    #[error("{file}:{line}: {message}")]
    Syntax { file: String, line: usize, message: String },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} reads itself recursively", path.display())]
    RecursiveRead { path: PathBuf },

    #[error("cannot decode argument '{token}': {source}")]
    Decode {
        token: String,
        #[source]
        source: crate::utils::DecodeError,
    },

    #[error("{0}")]
    Command(#[from] CommandError),

    #[error("{file}:{line}: {source}")]
    CommandInFile {
        file: String,
        line: usize,
        #[source]
        source: CommandError,
    },
}
