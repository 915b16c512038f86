use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("malformed escape sequence at offset {0}")]
    BadEscape(usize),
    #[error("decoded bytes are not valid UTF-8")]
    Utf8,
}

/// Decodes one `application/x-www-form-urlencoded` value as UTF-8.
/// `+` becomes a space and `%XX` a raw byte.
pub fn url_decode(s: &str) -> Result<String, DecodeError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3).ok_or(DecodeError::BadEscape(i))?;
                let hex = std::str::from_utf8(hex).map_err(|_| DecodeError::BadEscape(i))?;
                let byte = u8::from_str_radix(hex, 16).map_err(|_| DecodeError::BadEscape(i))?;
                out.push(byte);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).map_err(|_| DecodeError::Utf8)
}

/// Renders one argument so the command-file reader gives it back unchanged.
pub fn quote_arg(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg.starts_with('#')
        || arg.chars().any(|c| c.is_whitespace() || c == ';');

    let mut out = String::with_capacity(arg.len() + 2);
    if needs_quotes {
        out.push('"');
    }
    for c in arg.chars() {
        if c == '"' || c == '\\' || c == '\n' {
            out.push('\\');
        }
        out.push(c);
    }
    if needs_quotes {
        out.push('"');
    }
    out
}

/// Splits a path list on `:` or `;`, dropping empty entries.
/// A single letter followed by `:\` or `:/` is kept as a Windows drive prefix.
pub fn split_path_list(list: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut chars = list.chars().peekable();
    while let Some(c) = chars.next() {
        let drive = c == ':'
            && current.len() == 1
            && current.chars().all(|d| d.is_ascii_alphabetic())
            && matches!(chars.peek(), Some('\\') | Some('/'));
        if (c == ':' && !drive) || c == ';' {
            if !current.trim().is_empty() {
                entries.push(current.trim().to_string());
            }
            current.clear();
        } else {
            current.push(c);
        }
    }
    if !current.trim().is_empty() {
        entries.push(current.trim().to_string());
    }
    entries
}
