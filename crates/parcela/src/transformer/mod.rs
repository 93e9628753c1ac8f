//! Compilation of parsed ES modules into bundle-ready function bodies
//!
//! A module is compiled in two steps:
//! - [`commonjs`] rewrites module declarations into `require` calls and
//!   `exports` getters for the `(require, module, exports)` calling convention
//! - [`lowering`] down-levels the remaining syntax to a fixed ECMAScript target
//!   and prints the final code

pub mod commonjs;
mod lowering;

use std::{fmt, path::Path};

use anyhow::{Result, anyhow};
use log::debug;
use oxc_ast::ast::Program;
use oxc_transformer::{HelperLoaderMode, HelperLoaderOptions, TransformOptions};

use crate::error::BundleError;

/// Target used when the configuration does not name one
pub const DEFAULT_TARGET: &str = "es2015";

/// Compiles one module with a fixed target preset
pub struct ModuleTransformer {
    target: String,
    options: TransformOptions,
}

impl ModuleTransformer {
    /// Create a transformer for an ECMAScript target such as `es2015` or
    /// `es2020`
    pub fn new(target: &str) -> Result<Self> {
        let mut options = TransformOptions::from_target(target)
            .map_err(|err| anyhow!("invalid compilation target '{target}': {err}"))?;
        // Helpers are read from the table the bundle runtime declares
        options.helper_loader = HelperLoaderOptions {
            mode: HelperLoaderMode::External,
            ..HelperLoaderOptions::default()
        };
        debug!("Using compilation target {target}");
        Ok(Self {
            target: target.to_owned(),
            options,
        })
    }

    /// Compile the unmodified module tree into code executable under the
    /// bundle runtime
    pub fn compile(
        &self,
        program: &Program<'_>,
        source: &str,
        filename: &Path,
    ) -> Result<String, BundleError> {
        let script = commonjs::rewrite_to_commonjs(program, source);
        lowering::lower(&script, filename, &self.options).map_err(|message| {
            BundleError::CompileError {
                path: filename.to_path_buf(),
                message,
            }
        })
    }
}

impl fmt::Debug for ModuleTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleTransformer")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
