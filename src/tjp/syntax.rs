//! Lexical helpers for the project-file language: quoting, identifiers and
//! block layout.

/// Wraps `value` in double quotes, escaping `\` and `"`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Wraps `value` in single quotes verbatim.
///
/// Used for values that themselves contain double quotes (the currency
/// format). Embedded single quotes are not escaped.
pub fn single_quote(value: &str) -> String {
    format!("'{value}'")
}

/// Turns an arbitrary key into a declarable identifier.
///
/// Identifiers may only contain ASCII letters, digits and `_`, and may not
/// start with a digit. Generated UUIDs therefore lose their hyphens.
pub fn identifier(id: &str) -> String {
    let mut out: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Turns a task or resource reference into valid reference syntax.
///
/// Leading `!` (parent scope) and `.` path separators are kept; each path
/// segment is normalized with [`identifier`].
pub fn reference(path: &str) -> String {
    let rest = path.trim_start_matches('!');
    let bangs = &path[..path.len() - rest.len()];
    let segments: Vec<String> = rest.split('.').map(identifier).collect();
    format!("{bangs}{}", segments.join("."))
}

/// Accumulates indented lines.
#[derive(Debug, Default)]
pub struct Lines {
    lines: Vec<String>,
}

impl Lines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one clause.
    ///
    /// Only the start of a clause is indented by enclosing blocks, so line
    /// breaks inside quoted text reach the document unchanged.
    pub fn push(&mut self, clause: impl Into<String>) {
        self.lines.push(clause.into());
    }

    pub fn push_opt(&mut self, clause: Option<String>) {
        if let Some(clause) = clause {
            self.push(clause);
        }
    }

    /// `keyword value` when `value` is set.
    pub fn attr(&mut self, keyword: &str, value: Option<&String>) {
        if let Some(value) = value {
            self.push(format!("{keyword} {value}"));
        }
    }

    /// `keyword "value"` when `value` is set.
    pub fn quoted_attr(&mut self, keyword: &str, value: Option<&String>) {
        if let Some(value) = value {
            self.push(format!("{keyword} {}", quote(value)));
        }
    }

    /// Adds `header {`, the body indented one tab, then `}`.
    ///
    /// An empty body collapses to the bare header.
    pub fn block(&mut self, header: impl Into<String>, body: Lines) {
        let header = header.into();
        if body.is_empty() {
            self.lines.push(header);
            return;
        }
        self.lines.push(format!("{header} {{"));
        self.lines
            .extend(body.lines.into_iter().map(|l| format!("\t{l}")));
        self.lines.push("}".to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Joins with `\n`, without a trailing newline.
    pub fn join(&self) -> String {
        self.lines.join("\n")
    }
}
