use crate::cmd::error::ParseError;

/// Splits command-file text into logical commands.
///
/// Double quotes group words, a backslash escapes the characters that would
/// otherwise be structural, `#` at the start of a token comments out the rest
/// of the line, and `;` or a newline ends a command.
pub struct LineReader {
    name: String,
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl LineReader {
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the next non-empty command with the 1-based line it starts on.
    pub fn next_line(&mut self) -> Result<Option<(usize, Vec<String>)>, ParseError> {
        let mut tokens: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut started = false;
        let mut in_quote = false;
        let mut start_line = self.line;

        while let Some(c) = self.bump() {
            if in_quote {
                match c {
                    '"' => in_quote = false,
                    '\\' if matches!(self.peek(), Some('"') | Some('\\') | Some('\n')) => {
                        current.extend(self.bump());
                    }
                    '\n' => {
                        return Err(self.syntax(self.line - 1, "unterminated quoted string"));
                    }
                    _ => current.push(c),
                }
                continue;
            }

            match c {
                '\\' => {
                    match self.peek() {
                        Some(n) if n == '"' || n == '\\' || n == ';' || n == '#' || (n.is_whitespace() && n != '\n') => {
                            current.push(n);
                            self.pos += 1;
                        }
                        _ => current.push('\\'),
                    }
                    if tokens.is_empty() && !started {
                        start_line = self.line;
                    }
                    started = true;
                }
                '"' => {
                    if tokens.is_empty() && !started {
                        start_line = self.line;
                    }
                    in_quote = true;
                    started = true;
                }
                '#' if !started => {
                    while let Some(n) = self.peek() {
                        if n == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                ';' | '\n' => {
                    if started {
                        tokens.push(std::mem::take(&mut current));
                        started = false;
                    }
                    if !tokens.is_empty() {
                        return Ok(Some((start_line, tokens)));
                    }
                }
                c if c.is_whitespace() => {
                    if started {
                        tokens.push(std::mem::take(&mut current));
                        started = false;
                    }
                }
                c => {
                    if tokens.is_empty() && !started {
                        start_line = self.line;
                    }
                    current.push(c);
                    started = true;
                }
            }
        }

        if in_quote {
            return Err(self.syntax(self.line, "unterminated quoted string"));
        }
        if started {
            tokens.push(current);
        }
        if tokens.is_empty() {
            Ok(None)
        } else {
            Ok(Some((start_line, tokens)))
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn syntax(&self, line: usize, message: &str) -> ParseError {
        ParseError::Syntax {
            file: self.name.clone(),
            line,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(text: &str) -> Vec<(usize, Vec<String>)> {
        let mut r = LineReader::new("t", text);
        let mut out = Vec::new();
        while let Some(l) = r.next_line().unwrap() {
            out.push(l);
        }
        out
    }

    fn toks(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lines_and_numbers() {
        let got = all("open a.jti\n\n  # comment\nworkdir /tmp/wd  \n");
        assert_eq!(got, vec![(1, toks(&["open", "a.jti"])), (4, toks(&["workdir", "/tmp/wd"]))]);
    }

    #[test]
    fn quotes_and_escapes() {
        let got = all(r#"set "a b" c\"d "e\\f" C:\dir"#);
        assert_eq!(got[0].1, toks(&["set", "a b", "c\"d", "e\\f", "C:\\dir"]));
    }

    #[test]
    fn trailing_comment_and_semicolons() {
        let got = all("verbose; laf metal # pick metal\nbatch");
        assert_eq!(
            got,
            vec![
                (1, toks(&["verbose"])),
                (1, toks(&["laf", "metal"])),
                (2, toks(&["batch"]))
            ]
        );
    }

    #[test]
    fn hash_inside_token_is_literal() {
        let got = all("set key a#b");
        assert_eq!(got[0].1, toks(&["set", "key", "a#b"]));
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let mut r = LineReader::new("f.txt", "ok\nset \"oops\nnext");
        assert!(r.next_line().unwrap().is_some());
        let err = r.next_line().unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, .. }), "{err}");
    }

    #[test]
    fn escaped_newline_continues_quoted_string() {
        let got = all("set key \"line1\\\nline2\"\nbatch");
        assert_eq!(
            got,
            vec![(1, toks(&["set", "key", "line1\nline2"])), (3, toks(&["batch"]))]
        );
    }

    #[test]
    fn empty_input() {
        assert!(all("").is_empty());
        assert!(all("\n ; ;\n# only\n").is_empty());
    }
}
