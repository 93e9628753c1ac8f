//! Syntax lowering of rewritten module scripts
//!
//! The CommonJS script is parsed again, analysed, run through
//! `oxc_transformer` with the configured target preset and printed back.

use std::path::Path;

use log::trace;
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{TransformOptions, Transformer};

use crate::{error::join_diagnostics, parser};

/// Lower `script` for `options`' target and print it
pub(crate) fn lower(script: &str, filename: &Path, options: &TransformOptions) -> Result<String, String> {
    let allocator = Allocator::default();
    let mut program = parser::parse(&allocator, script, SourceType::cjs())?;

    let scoping = SemanticBuilder::new()
        .with_excess_capacity(2.0)
        .build(&program)
        .semantic
        .into_scoping();

    let ret = Transformer::new(&allocator, filename, options).build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(join_diagnostics(&ret.errors));
    }

    let code = Codegen::new().build(&program).code;
    trace!("Lowered {} to {} bytes", filename.display(), code.len());
    Ok(code)
}
