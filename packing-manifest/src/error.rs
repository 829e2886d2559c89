use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::error::Category;
use thiserror::Error;

/// Result type for packing-manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the source content and filename, reducing parameter passing
/// in error factory functions.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a serde_json error.
    ///
    /// Malformed JSON becomes [`Error::Parse`]; well-formed JSON of the wrong
    /// shape (missing fields, wrong types) becomes [`Error::Schema`].
    pub fn parse_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = offset_of(&self.src, source.line(), source.column())
            .map(|at| SourceSpan::from((at, 0)));
        let filename = self.filename.clone();
        let src = self.named_source();

        match source.classify() {
            Category::Data => Box::new(Error::Schema {
                filename,
                src,
                span,
                source,
            }),
            _ => Box::new(Error::Parse {
                filename,
                src,
                span,
                source,
            }),
        }
    }

    /// Create a validation error, pointing at `needle` when it can be found.
    pub fn validation_error(
        &self,
        message: impl Into<String>,
        needle: Option<&str>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: needle.and_then(|n| find_span(&self.src, n)),
            message: message.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(packing::io),
        help("run packing from the project root or pass --root <dir>")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file {filename} has a syntax error")]
    #[diagnostic(code(packing::parse_error))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("syntax error here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("file {filename} does not match the expected structure")]
    #[diagnostic(code(packing::schema_error))]
    Schema {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("unexpected value here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(packing::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },
}

/// Convert a 1-based line/column pair from serde_json into a byte offset.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

/// Locate a quoted JSON string in the source (e.g., a package name).
fn find_span(src: &str, needle: &str) -> Option<SourceSpan> {
    let quoted = format!("\"{}\"", needle);
    src.find(&quoted)
        .map(|pos| SourceSpan::from((pos, quoted.len())))
}
