//! Import collector that finds every static dependency declaration of a module
//!
//! Recognized declarations are `import` statements (with or without bindings)
//! and re-exports that name a source (`export { .. } from`, `export * from`).
//! Dynamic `import()` expressions are never recorded.

use oxc_ast::ast::{ExportAllDeclaration, ExportNamedDeclaration, ImportDeclaration, Program};
use oxc_ast_visit::Visit;

/// Collects raw module specifiers in declaration order
#[derive(Debug, Default)]
pub struct ImportCollector {
    specifiers: Vec<String>,
}

impl ImportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `program` and return its specifiers exactly as written
    pub fn collect(program: &Program<'_>) -> Vec<String> {
        let mut collector = Self::new();
        collector.visit_program(program);
        collector.specifiers
    }
}

impl<'a> Visit<'a> for ImportCollector {
    fn visit_import_declaration(&mut self, it: &ImportDeclaration<'a>) {
        if it.import_kind.is_type() {
            return;
        }
        self.specifiers.push(it.source.value.to_string());
    }

    fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
        if it.export_kind.is_type() {
            return;
        }
        if let Some(source) = &it.source {
            self.specifiers.push(source.value.to_string());
        }
    }

    fn visit_export_all_declaration(&mut self, it: &ExportAllDeclaration<'a>) {
        if it.export_kind.is_type() {
            return;
        }
        self.specifiers.push(it.source.value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use oxc_allocator::Allocator;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_module;

    fn collect(source: &str) -> Vec<String> {
        let allocator = Allocator::default();
        let program = parse_module(&allocator, source, Path::new("test.js")).unwrap();
        ImportCollector::collect(&program)
    }

    #[test]
    fn test_collects_in_declaration_order() {
        let specifiers = collect(
            r#"
import b from './b.js';
import { c as see } from "./c.js";
import * as d from './d.js';
import './side-effect.js';
"#,
        );
        assert_eq!(specifiers, vec!["./b.js", "./c.js", "./d.js", "./side-effect.js"]);
    }

    #[test]
    fn test_keeps_duplicate_specifiers() {
        let specifiers = collect("import a from './x.js';\nimport { b } from './x.js';\n");
        assert_eq!(specifiers, vec!["./x.js", "./x.js"]);
    }

    #[test]
    fn test_includes_re_exports() {
        let specifiers = collect(
            "export { a } from './a.js';\nexport * from './b.js';\nexport * as c from './c.js';\nexport const local = 1;\n",
        );
        assert_eq!(specifiers, vec!["./a.js", "./b.js", "./c.js"]);
    }

    #[test]
    fn test_ignores_dynamic_imports() {
        let specifiers = collect(
            "const lazy = import('./lazy.js');\nconst name = './x.js';\nimport(name);\nrequire('./cjs.js');\n",
        );
        assert!(specifiers.is_empty());
    }
}
