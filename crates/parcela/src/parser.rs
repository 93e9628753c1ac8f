//! Module-scoped JavaScript parsing on top of oxc

use std::path::Path;

use log::trace;
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::{BundleError, join_diagnostics};

/// Parse `source` as an ES module
///
/// Any diagnostic reported by the parser, recoverable or not, fails the parse.
pub fn parse_module<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    path: &Path,
) -> Result<Program<'a>, BundleError> {
    parse(allocator, source, SourceType::mjs()).map_err(|message| BundleError::ParseError {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse `source` with an explicit source type, returning the joined
/// diagnostics on failure
pub(crate) fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    source_type: SourceType,
) -> Result<Program<'a>, String> {
    let ret = Parser::new(allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = if ret.errors.is_empty() {
            "parser aborted".to_owned()
        } else {
            join_diagnostics(&ret.errors)
        };
        return Err(message);
    }
    trace!("Parsed {} top-level statements", ret.program.body.len());
    Ok(ret.program)
}
