//! Errors raised while turning one source file into an asset
//!
//! Every variant is fatal to the bundling run: the graph builder propagates the
//! first failure and no partial bundle is produced.

use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The source file is missing or could not be read as UTF-8 text
    #[error("cannot read source file {}: {source}", path.display())]
    UnreadableSource { path: PathBuf, source: io::Error },

    /// The source text is not a syntactically valid ES module
    #[error("failed to parse {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    /// Lowering or printing the module failed
    #[error("failed to compile {}: {message}", path.display())]
    CompileError { path: PathBuf, message: String },
}

impl BundleError {
    /// Path of the source file the error originated in
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::UnreadableSource { path, .. }
            | Self::ParseError { path, .. }
            | Self::CompileError { path, .. } => path,
        }
    }
}

/// Joins diagnostic messages into a single line per diagnostic
pub(crate) fn join_diagnostics<I, D>(diagnostics: I) -> String
where
    I: IntoIterator<Item = D>,
    D: std::fmt::Display,
{
    diagnostics
        .into_iter()
        .map(|diagnostic| diagnostic.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
