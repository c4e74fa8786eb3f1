//! Import statement extraction
//!
//! A best-effort lexical parser over decoded Python source. It recognizes
//! the textual import forms (`import X`, `import X as Y`, `import X, Y`,
//! `from X import A, B`, `from X.sub import A`) at the granularity that
//! matters for packaging: the top-level module name. Relative imports refer
//! to the project's own modules and are dropped here.
//!
//! Exclusion rules keep import-like tokens in strings and comments from
//! matching: statements must start the logical line (after indentation),
//! comments are stripped, and lines inside triple-quoted strings are
//! tracked and ignored. Backslash continuations and parenthesized import
//! lists are joined into one logical line before parsing. Anything that
//! still does not parse is skipped, never fatal.

/// Textual form of an import statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStyle {
    /// `import X`
    Plain,
    /// `import X as Y`
    Aliased,
    /// `from X import A`
    From,
}

/// A single import as written in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Top-level module name (`cv2` for `import cv2.typing`)
    pub name: String,
    pub style: ImportStyle,
    /// 1-based line number of the statement
    pub line: usize,
}

/// Extract all import declarations from decoded source text
pub fn extract_imports(text: &str) -> Vec<ImportDeclaration> {
    let lines: Vec<&str> = text.lines().collect();
    let mut decls = Vec::new();
    let mut in_string: Option<&'static str> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let line_no = i + 1;
        i += 1;

        let starts_in_code = advance_string_state(line, &mut in_string);
        if !starts_in_code {
            continue;
        }

        let stripped = line.trim_start();
        if !stripped.starts_with("import ") && !stripped.starts_with("from ") {
            continue;
        }

        let mut logical = strip_comment(stripped).trim_end().to_string();
        while needs_continuation(&mut logical) {
            let Some(next) = lines.get(i) else { break };
            advance_string_state(next, &mut in_string);
            i += 1;
            logical.push(' ');
            logical.push_str(strip_comment(next.trim()).trim_end());
        }

        parse_logical(&logical, line_no, &mut decls);
    }

    decls
}

/// Track triple-quoted string state across a physical line.
///
/// Returns whether the start of the line is code. Best-effort: a triple
/// quote inside a comment or single-line string will confuse it, which is
/// acceptable for a textual scanner.
fn advance_string_state(line: &str, state: &mut Option<&'static str>) -> bool {
    let starts_in_code = state.is_none();
    let mut rest = line;
    loop {
        match *state {
            Some(delim) => match rest.find(delim) {
                Some(pos) => {
                    rest = &rest[pos + delim.len()..];
                    *state = None;
                }
                None => break,
            },
            None => {
                let double = rest.find("\"\"\"");
                let single = rest.find("'''");
                let (pos, delim) = match (double, single) {
                    (Some(d), Some(s)) if d <= s => (d, "\"\"\""),
                    (_, Some(s)) => (s, "'''"),
                    (Some(d), None) => (d, "\"\"\""),
                    (None, None) => break,
                };
                rest = &rest[pos + delim.len()..];
                *state = Some(delim);
            }
        }
    }
    starts_in_code
}

/// Strip a trailing comment. Module paths cannot contain `#`, so on an
/// import line the first `#` always starts a comment.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Whether `logical` still needs the next physical line joined in.
/// Strips a trailing backslash as a side effect.
fn needs_continuation(logical: &mut String) -> bool {
    if logical.ends_with('\\') {
        logical.pop();
        return true;
    }
    logical.matches('(').count() > logical.matches(')').count()
}

fn parse_logical(logical: &str, line: usize, out: &mut Vec<ImportDeclaration>) {
    if let Some(rest) = logical.strip_prefix("from ") {
        let Some(import_pos) = rest.find(" import") else {
            return;
        };
        let after = &rest[import_pos + " import".len()..];
        if !(after.starts_with(' ') || after.starts_with('(')) {
            return;
        }
        let module = rest[..import_pos].trim();
        // Relative imports target the project's own modules
        if module.starts_with('.') {
            return;
        }
        if let Some(name) = top_level_name(module) {
            out.push(ImportDeclaration {
                name,
                style: ImportStyle::From,
                line,
            });
        }
    } else if let Some(rest) = logical.strip_prefix("import ") {
        for part in rest.split(',') {
            let part = part.trim();
            let (target, style) = match part.split_once(" as ") {
                Some((target, _alias)) => (target.trim(), ImportStyle::Aliased),
                None => (part, ImportStyle::Plain),
            };
            if let Some(name) = top_level_name(target) {
                out.push(ImportDeclaration { name, style, line });
            }
        }
    }
}

/// First dotted segment, validated as an identifier; distribution packages
/// install at top-level-module granularity.
fn top_level_name(dotted: &str) -> Option<String> {
    let top = dotted.split('.').next()?.trim();
    if top.is_empty() {
        return None;
    }
    let mut chars = top.chars();
    let first = chars.next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some(top.to_string())
}
