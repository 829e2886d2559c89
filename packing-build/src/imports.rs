//! Static import extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Extracts raw import specifiers from a script's source text.
///
/// Implementations must be pure: the same text always yields the same list,
/// in source order. Duplicates are allowed.
pub trait ImportExtractor {
    fn extract(&self, source: &str) -> Vec<String>;
}

/// Matches a single- or double-quoted string literal, capturing its content.
const STRING_LITERAL: &str = r#"(?:'([^'\n]+)'|"([^"\n]+)")"#;

static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let call = format!(r"\b(?:require|import)\s*\(\s*{STRING_LITERAL}\s*\)");
    let from = format!(r#"\b(?:import|export)\s[^;'"()]*?\bfrom\s*{STRING_LITERAL}"#);
    let bare = format!(r"\bimport\s*{STRING_LITERAL}");
    Regex::new(&format!("{call}|{from}|{bare}")).expect("import pattern is valid")
});

/// Import scanner for CommonJS and ES module sources.
///
/// Recognizes `require("x")`, `import ... from "x"`, `import "x"`,
/// `export ... from "x"` and `import("x")` with literal arguments.
/// Comments, string contents and regex literals are blanked out before
/// matching; computed specifiers are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsImportScanner;

impl ImportExtractor for JsImportScanner {
    fn extract(&self, source: &str) -> Vec<String> {
        let code = blank_non_code(source);
        IMPORT_PATTERN
            .captures_iter(&code)
            .filter_map(|caps| caps.iter().skip(1).flatten().next())
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Replace comments, regex literals and the contents of string literals with
/// whitespace. Line breaks are kept, and so is the text of a string literal
/// in specifier position (`require(`, `import(`, `from`, `import`).
fn blank_non_code(source: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Literal { quote: char, keep: bool },
        Regex { in_class: bool },
    }

    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut state = State::Code;

    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek()) {
                ('/', Some('/')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                ('/', Some('*')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                ('/', _) if starts_regex(&out) => {
                    out.push(c);
                    state = State::Regex { in_class: false };
                }
                ('\'' | '"' | '`', _) => {
                    let keep = c != '`' && in_specifier_position(&out);
                    out.push(c);
                    state = State::Literal { quote: c, keep };
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    out.push(blank(c));
                }
            }
            State::Literal { quote, keep } => {
                if c == '\\' {
                    out.push(if keep { c } else { ' ' });
                    if let Some(escaped) = chars.next() {
                        out.push(if keep { escaped } else { blank(escaped) });
                    }
                } else if c == quote || (c == '\n' && quote != '`') {
                    out.push(c);
                    state = State::Code;
                } else {
                    out.push(if keep { c } else { blank(c) });
                }
            }
            State::Regex { in_class } => match c {
                '\\' => {
                    out.push(' ');
                    if let Some(escaped) = chars.next() {
                        out.push(blank(escaped));
                    }
                }
                '[' => {
                    out.push(' ');
                    state = State::Regex { in_class: true };
                }
                ']' => {
                    out.push(' ');
                    state = State::Regex { in_class: false };
                }
                '/' if !in_class => {
                    out.push(c);
                    state = State::Code;
                }
                // Unterminated; resume scanning on the next line
                '\n' => {
                    out.push(c);
                    state = State::Code;
                }
                _ => out.push(' '),
            },
        }
    }
    out
}

fn blank(c: char) -> char {
    if c == '\n' { '\n' } else { ' ' }
}

/// A `/` opens a regex literal rather than a division when it starts a line
/// or follows an operator, an opening bracket or a keyword like `return`.
fn starts_regex(code: &str) -> bool {
    let line = code.rsplit('\n').next().unwrap_or_default();
    let head = line.trim_end();
    match head.chars().next_back() {
        None => true,
        Some(prev) if "(,=:[!&|?{};".contains(prev) => true,
        Some(_) => ["return", "typeof", "case", "else", "in", "of", "void", "yield"]
            .iter()
            .any(|keyword| ends_with_word(head, keyword)),
    }
}

/// Whether a string literal starting here is an import specifier.
fn in_specifier_position(code: &str) -> bool {
    let head = code.trim_end();
    match head.strip_suffix('(') {
        Some(call) => {
            let call = call.trim_end();
            ends_with_word(call, "require") || ends_with_word(call, "import")
        }
        None => ends_with_word(head, "from") || ends_with_word(head, "import"),
    }
}

fn ends_with_word(code: &str, word: &str) -> bool {
    code.strip_suffix(word).is_some_and(|before| {
        !before
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
    })
}
