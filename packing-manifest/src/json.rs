//! Shared JSON loading.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{Error, Result, SourceContext};

/// Read a file into a [`SourceContext`], mapping I/O failures to [`Error::Io`].
pub(crate) fn read_source(path: &Path) -> Result<SourceContext> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    Ok(SourceContext::new(content, path.display().to_string()))
}

/// Deserialize the content of a [`SourceContext`].
pub(crate) fn parse<T: DeserializeOwned>(ctx: &SourceContext) -> Result<T> {
    serde_json::from_str(ctx.src()).map_err(|e| ctx.parse_error(e))
}
