//! Import specifier classification.

/// What an import specifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier<'a> {
    /// A local file, relative to the importing file (`./x`, `../y`)
    Relative(&'a str),
    /// A runtime built-in (`fs`, `node:path`)
    Builtin,
    /// An external package, reduced to its root name
    Package { root: &'a str },
}

impl<'a> Specifier<'a> {
    /// Classify a raw specifier using the given built-in predicate.
    pub fn classify(raw: &'a str, is_builtin: impl Fn(&str) -> bool) -> Self {
        if raw.starts_with('.') || raw.starts_with('/') {
            Specifier::Relative(raw)
        } else if is_builtin(raw) {
            Specifier::Builtin
        } else {
            Specifier::Package {
                root: package_root(raw),
            }
        }
    }
}

/// Reduce a bare specifier to its package name
/// (e.g., "lodash/fp" -> "lodash", "@babel/core/lib/x" -> "@babel/core").
pub fn package_root(specifier: &str) -> &str {
    let mut slashes = specifier.match_indices('/').map(|(i, _)| i);
    let cut = if specifier.starts_with('@') {
        slashes.nth(1)
    } else {
        slashes.next()
    };
    match cut {
        Some(end) => &specifier[..end],
        None => specifier,
    }
}
