use crate::cmd::context::CommandContext;
use crate::cmd::cursor::ArgCursor;
use crate::cmd::error::{CommandError, ParseError};
use crate::cmd::line::LineReader;
use crate::cmd::manager::{HelpNode, ManagerRef, is_match};
use crate::utils::url_decode;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Files currently being read, innermost last.
struct IncludeStack {
    stack: Vec<PathBuf>,
}

impl IncludeStack {
    fn new() -> Self {
        Self { stack: Vec::new() }
    }

    fn push(&mut self, path: &Path) -> Result<(), ParseError> {
        if self.stack.iter().any(|p| p == path) {
            return Err(ParseError::RecursiveRead {
                path: path.to_path_buf(),
            });
        }
        self.stack.push(path.to_path_buf());
        Ok(())
    }

    fn pop(&mut self) {
        self.stack.pop();
    }
}

/// Turns argument vectors and command files into commands on a context,
/// offering every command token to the managers in order.
pub struct CommandParser {
    managers: Vec<ManagerRef>,
}

impl CommandParser {
    pub fn new(managers: Vec<ManagerRef>) -> Self {
        Self { managers }
    }

    pub fn help(&self) -> Vec<HelpNode> {
        self.managers.iter().map(|m| m.help()).collect()
    }

    pub fn parse(&self, args: &[String], ctx: &mut CommandContext) -> Result<(), ParseError> {
        self.parse_args(args.to_vec(), ctx)
    }

    /// Like [`CommandParser::parse`], for arguments that arrive URL-encoded.
    pub fn parse_encoded(&self, args: &[String], ctx: &mut CommandContext) -> Result<(), ParseError> {
        let decoded = args
            .iter()
            .map(|a| {
                url_decode(a).map_err(|source| ParseError::Decode {
                    token: a.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.parse_args(decoded, ctx)
    }

    pub fn read_file(&self, path: &Path, ctx: &mut CommandContext) -> Result<(), ParseError> {
        self.read_file_inner(path, &mut IncludeStack::new(), ctx)
    }

    /// Reads commands from `reader`; `read` paths resolve against `base_dir`.
    pub fn read_lines(
        &self,
        reader: &mut LineReader,
        base_dir: &Path,
        ctx: &mut CommandContext,
    ) -> Result<(), ParseError> {
        self.read_lines_inner(reader, base_dir, &mut IncludeStack::new(), ctx)
    }

    fn parse_args(&self, args: Vec<String>, ctx: &mut CommandContext) -> Result<(), ParseError> {
        let mut stack = IncludeStack::new();
        let mut cursor = ArgCursor::new(args);

        while let Some(raw) = cursor.advance() {
            let arg = match raw.trim() {
                "/?" => "-?",
                other => other,
            };

            if let Some(file) = arg.strip_prefix('@') {
                self.read_file_inner(Path::new(file), &mut stack, ctx)?;
            } else if let Some(option) = arg.strip_prefix('-') {
                if is_match(option, "read") {
                    let file = cursor.advance().ok_or(ParseError::MissingReadArg)?;
                    self.read_file_inner(Path::new(&file), &mut stack, ctx)?;
                } else if !self.dispatch(option, &mut cursor, ctx)? {
                    return Err(ParseError::UnrecognizedOption(arg.to_string()));
                }
            } else if arg.contains(' ') {
                let mut reader = LineReader::new(arg, arg);
                self.read_lines_inner(&mut reader, Path::new(""), &mut stack, ctx)?;
            } else if cursor.at_end() && !arg.is_empty() && Path::new(arg).exists() {
                debug!("Treating trailing argument {} as a file to open", arg);
                let mut open = ArgCursor::new(vec![arg.to_string()]);
                if !self.dispatch("open", &mut open, ctx)? {
                    return Err(ParseError::UnrecognizedArgument(arg.to_string()));
                }
            } else {
                return Err(ParseError::UnrecognizedArgument(arg.to_string()));
            }
        }
        Ok(())
    }

    fn read_file_inner(
        &self,
        path: &Path,
        stack: &mut IncludeStack,
        ctx: &mut CommandContext,
    ) -> Result<(), ParseError> {
        debug!("Reading commands from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        stack.push(&key)?;

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut reader = LineReader::new(&path.display().to_string(), &text);
        let result = self.read_lines_inner(&mut reader, &base_dir, stack, ctx);
        stack.pop();
        result
    }

    fn read_lines_inner(
        &self,
        reader: &mut LineReader,
        base_dir: &Path,
        stack: &mut IncludeStack,
        ctx: &mut CommandContext,
    ) -> Result<(), ParseError> {
        while let Some((line, tokens)) = reader.next_line()? {
            let mut cursor = ArgCursor::new(tokens);
            let Some(first) = cursor.advance() else {
                continue;
            };
            let name = first.strip_prefix('-').unwrap_or(&first);

            if is_match(name, "read") {
                let file = match (cursor.advance(), cursor.has_next()) {
                    (Some(file), false) => file,
                    _ => {
                        return Err(ParseError::BadReadCommand {
                            file: reader.name().to_string(),
                            line,
                        });
                    }
                };
                let path = Path::new(&file);
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    base_dir.join(path)
                };
                self.read_file_inner(&path, stack, ctx)?;
                continue;
            }

            match self.dispatch(name, &mut cursor, ctx) {
                Ok(true) if cursor.has_next() => {
                    return Err(ParseError::ExcessArgs {
                        file: reader.name().to_string(),
                        line,
                        name: name.to_string(),
                        excess: cursor.remaining().join(" "),
                    });
                }
                Ok(true) => {}
                Ok(false) => {
                    return Err(ParseError::UnrecognizedCommand {
                        file: reader.name().to_string(),
                        line,
                        name: name.to_string(),
                    });
                }
                Err(source) => {
                    return Err(ParseError::CommandInFile {
                        file: reader.name().to_string(),
                        line,
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    fn dispatch(
        &self,
        cmd: &str,
        cursor: &mut ArgCursor,
        ctx: &mut CommandContext,
    ) -> Result<bool, CommandError> {
        for manager in &self.managers {
            let start = cursor.position();
            if manager.parse_command(cmd, cursor, ctx)? {
                return Ok(true);
            }
            if cursor.position() != start {
                warn!(
                    "Manager '{}' declined '{}' but moved the argument cursor; restoring it",
                    manager.help().name,
                    cmd
                );
                cursor.set_position(start);
            }
        }
        Ok(false)
    }
}
