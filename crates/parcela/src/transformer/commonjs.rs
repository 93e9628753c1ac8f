//! ES module to CommonJS rewrite
//!
//! Module declarations are only legal at the top level, so the rewrite walks
//! `program.body` and records span edits against the original text. The
//! emitted script has a fixed layout:
//!
//! 1. `"use strict"` and the `__esModule` marker,
//! 2. one `exports` getter per exported name (live bindings),
//! 3. the `require` calls for every dependency declaration, in declaration
//!    order, so dependencies execute before the module body,
//! 4. the original body with module declarations removed or rewritten.
//!
//! Imported bindings are not copied into locals. Every reference that
//! resolves to an import is rewritten into a property read on the
//! dependency's exports object, which keeps ES live-binding semantics.

use oxc_ast::ast::{
    AssignmentTargetPropertyIdentifier, BindingPattern, BindingPatternKind, CallExpression,
    Declaration, ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, Expression, IdentifierReference, ImportDeclaration,
    ImportDeclarationSpecifier, ModuleExportName, ObjectProperty, Program, Statement,
    TaggedTemplateExpression,
};
use oxc_ast_visit::{Visit, walk};
use oxc_semantic::{Scoping, SemanticBuilder, SymbolId};
use oxc_span::{GetSpan, Span};
use rustc_hash::FxHashMap;

/// Prefix of the temporaries holding a dependency's exports
pub const DEPENDENCY_BINDING_PREFIX: &str = "__parcela_dep_";

/// Rewrite an ES module into a script for the `(require, module, exports)`
/// calling convention
pub fn rewrite_to_commonjs(program: &Program<'_>, source: &str) -> String {
    let scoping = SemanticBuilder::new().build(program).semantic.into_scoping();
    let mut rewriter = CommonJsRewriter::new(source, &scoping);
    if let Some(hashbang) = &program.hashbang {
        rewriter.replace(hashbang.span, String::new());
    }
    // Imports are hoisted, so every binding must be known before the body
    // is walked.
    for stmt in &program.body {
        rewriter.collect_dependency(stmt);
    }
    for stmt in &program.body {
        rewriter.rewrite_statement(stmt);
    }
    rewriter.finish()
}

#[derive(Debug)]
struct Edit {
    span: Span,
    replacement: String,
}

struct CommonJsRewriter<'s> {
    source: &'s str,
    scoping: &'s Scoping,
    /// Import binding -> expression reading it from the dependency
    imports: FxHashMap<SymbolId, String>,
    /// Re-export declaration start -> dependency binding
    reexports: FxHashMap<u32, String>,
    /// Exported name -> expression returned by its getter
    getters: Vec<(String, String)>,
    /// Dependency statements, in declaration order
    requires: Vec<String>,
    edits: Vec<Edit>,
    next_binding: usize,
    has_module_syntax: bool,
}

impl<'s> CommonJsRewriter<'s> {
    fn new(source: &'s str, scoping: &'s Scoping) -> Self {
        Self {
            source,
            scoping,
            imports: FxHashMap::default(),
            reexports: FxHashMap::default(),
            getters: Vec::new(),
            requires: Vec::new(),
            edits: Vec::new(),
            next_binding: 0,
            has_module_syntax: false,
        }
    }

    /// First pass: `require` every dependency and record how its bindings are
    /// read
    fn collect_dependency(&mut self, stmt: &Statement<'_>) {
        match stmt {
            Statement::ImportDeclaration(decl) => self.collect_import(decl),
            Statement::ExportNamedDeclaration(decl) if !decl.export_kind.is_type() => {
                if let Some(source) = &decl.source {
                    let binding = self.require_binding(&source.value);
                    self.reexports.insert(decl.span.start, binding);
                }
            }
            Statement::ExportAllDeclaration(decl) if !decl.export_kind.is_type() => {
                let binding = self.require_binding(&decl.source.value);
                if decl.exported.is_none() {
                    self.requires.push(star_reexport(&binding));
                }
                self.reexports.insert(decl.span.start, binding);
            }
            _ => {}
        }
    }

    fn collect_import(&mut self, decl: &ImportDeclaration<'_>) {
        self.remove_statement(decl.span);
        if decl.import_kind.is_type() {
            return;
        }
        self.has_module_syntax = true;

        let specifiers = match &decl.specifiers {
            Some(specifiers) if !specifiers.is_empty() => specifiers,
            _ => {
                self.requires
                    .push(format!("require({});", quote(&decl.source.value)));
                return;
            }
        };

        let binding = self.require_binding(&decl.source.value);
        for specifier in specifiers {
            let (local, value) = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    if s.import_kind.is_type() {
                        continue;
                    }
                    (&s.local, member(&binding, &s.imported.name()))
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    (&s.local, member(&binding, "default"))
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    (&s.local, binding.clone())
                }
            };
            if let Some(symbol_id) = local.symbol_id.get() {
                self.imports.insert(symbol_id, value);
            }
        }
    }

    /// Second pass: rewrite exports and the references in the module body
    fn rewrite_statement(&mut self, stmt: &Statement<'_>) {
        match stmt {
            Statement::ImportDeclaration(_) => {}
            Statement::ExportNamedDeclaration(decl) => self.rewrite_export_named(decl),
            Statement::ExportDefaultDeclaration(decl) => self.rewrite_export_default(decl),
            Statement::ExportAllDeclaration(decl) => self.rewrite_export_all(decl),
            _ => self.visit_statement(stmt),
        }
    }

    fn rewrite_export_named(&mut self, decl: &ExportNamedDeclaration<'_>) {
        if decl.export_kind.is_type() {
            self.remove_statement(decl.span);
            return;
        }
        self.has_module_syntax = true;

        if let Some(declaration) = &decl.declaration {
            // Keep the declaration, drop the `export` keyword
            self.replace(Span::new(decl.span.start, declaration.span().start), String::new());
            let mut names = Vec::new();
            declared_names(declaration, &mut names);
            for name in names {
                self.getters.push((name.clone(), name));
            }
            self.visit_declaration(declaration);
            return;
        }

        self.remove_statement(decl.span);
        let binding = self.reexports.get(&decl.span.start).cloned();
        for specifier in &decl.specifiers {
            if specifier.export_kind.is_type() {
                continue;
            }
            let value = match (&binding, &specifier.local) {
                (Some(binding), local) => member(binding, &local.name()),
                (None, ModuleExportName::IdentifierReference(ident)) => self
                    .import_member(ident)
                    .unwrap_or_else(|| ident.name.to_string()),
                (None, local) => local.name().to_string(),
            };
            self.getters.push((specifier.exported.name().to_string(), value));
        }
    }

    fn rewrite_export_default(&mut self, decl: &ExportDefaultDeclaration<'_>) {
        let named = match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                func.id.as_ref().map(|id| id.name.to_string())
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                class.id.as_ref().map(|id| id.name.to_string())
            }
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => {
                self.remove_statement(decl.span);
                return;
            }
            _ => None,
        };
        self.has_module_syntax = true;

        let declaration_span = decl.declaration.span();
        let head = Span::new(decl.span.start, declaration_span.start);
        match named {
            Some(local) => {
                self.replace(head, String::new());
                self.getters.push(("default".to_owned(), local));
            }
            None => {
                self.replace(head, "exports.default = ".to_owned());
                self.replace(Span::new(declaration_span.end, decl.span.end), ";".to_owned());
            }
        }
        self.visit_export_default_declaration_kind(&decl.declaration);
    }

    fn rewrite_export_all(&mut self, decl: &ExportAllDeclaration<'_>) {
        self.remove_statement(decl.span);
        if decl.export_kind.is_type() {
            return;
        }
        self.has_module_syntax = true;

        if let (Some(exported), Some(binding)) =
            (&decl.exported, self.reexports.get(&decl.span.start))
        {
            self.getters.push((exported.name().to_string(), binding.clone()));
        }
    }

    /// Emit `var <binding> = require("<specifier>");` and return the binding
    fn require_binding(&mut self, specifier: &str) -> String {
        let binding = format!("{DEPENDENCY_BINDING_PREFIX}{}", self.next_binding);
        self.next_binding += 1;
        self.requires
            .push(format!("var {binding} = require({});", quote(specifier)));
        binding
    }

    /// Expression reading the import `ident` resolves to, if it resolves to one
    fn import_member(&self, ident: &IdentifierReference<'_>) -> Option<String> {
        let reference_id = ident.reference_id.get()?;
        let symbol_id = self.scoping.get_reference(reference_id).symbol_id()?;
        self.imports.get(&symbol_id).cloned()
    }

    /// Callee rewrite that calls an imported function without binding `this`
    /// to the exports object
    fn unbound_import_callee(&self, callee: &Expression<'_>) -> Option<String> {
        match callee {
            Expression::Identifier(ident) => {
                self.import_member(ident).map(|value| format!("(0, {value})"))
            }
            _ => None,
        }
    }

    /// A whole statement disappears. The `;` keeps the neighbouring
    /// statements apart when the source relies on automatic semicolon
    /// insertion.
    fn remove_statement(&mut self, span: Span) {
        self.replace(span, ";".to_owned());
    }

    fn replace(&mut self, span: Span, replacement: String) {
        self.edits.push(Edit { span, replacement });
    }

    fn finish(mut self) -> String {
        let mut out = String::with_capacity(self.source.len() + 256);
        out.push_str("\"use strict\";\n");
        if self.has_module_syntax {
            out.push_str("Object.defineProperty(exports, \"__esModule\", { value: true });\n");
        }
        for (name, value) in &self.getters {
            out.push_str(&format!(
                "Object.defineProperty(exports, {}, {{ enumerable: true, get: function () {{ return {value}; }} }});\n",
                quote(name)
            ));
        }
        for require in &self.requires {
            out.push_str(require);
            out.push('\n');
        }

        self.edits.sort_by_key(|edit| (edit.span.start, edit.span.end));
        let mut cursor = 0usize;
        for edit in &self.edits {
            let start = edit.span.start as usize;
            debug_assert!(start >= cursor, "module declaration edits overlap");
            out.push_str(&self.source[cursor..start]);
            out.push_str(&edit.replacement);
            cursor = edit.span.end as usize;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

impl<'a> Visit<'a> for CommonJsRewriter<'_> {
    fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
        if let Some(value) = self.import_member(it) {
            self.replace(it.span, value);
        }
    }

    fn visit_object_property(&mut self, it: &ObjectProperty<'a>) {
        // `{ count }` must become `{ count: dep.count }`
        if it.shorthand {
            if let Expression::Identifier(ident) = &it.value {
                if let Some(value) = self.import_member(ident) {
                    self.replace(ident.span, format!("{}: {value}", ident.name));
                    return;
                }
            }
        }
        walk::walk_object_property(self, it);
    }

    fn visit_assignment_target_property_identifier(
        &mut self,
        it: &AssignmentTargetPropertyIdentifier<'a>,
    ) {
        match self.import_member(&it.binding) {
            Some(value) => {
                self.replace(it.binding.span, format!("{}: {value}", it.binding.name));
                if let Some(init) = &it.init {
                    self.visit_expression(init);
                }
            }
            None => walk::walk_assignment_target_property_identifier(self, it),
        }
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        match self.unbound_import_callee(&it.callee) {
            Some(callee) => {
                self.replace(it.callee.span(), callee);
                for argument in &it.arguments {
                    self.visit_argument(argument);
                }
            }
            None => walk::walk_call_expression(self, it),
        }
    }

    fn visit_tagged_template_expression(&mut self, it: &TaggedTemplateExpression<'a>) {
        match self.unbound_import_callee(&it.tag) {
            Some(tag) => {
                self.replace(it.tag.span(), tag);
                self.visit_template_literal(&it.quasi);
            }
            None => walk::walk_tagged_template_expression(self, it),
        }
    }
}

/// Loop that forwards every export of `binding` not already defined locally
fn star_reexport(binding: &str) -> String {
    format!(
        "Object.keys({binding}).forEach(function (key) {{\n  \
         if (key === \"default\" || key === \"__esModule\" || Object.prototype.hasOwnProperty.call(exports, key)) return;\n  \
         Object.defineProperty(exports, key, {{ enumerable: true, get: function () {{ return {binding}[key]; }} }});\n\
         }});"
    )
}

fn declared_names(declaration: &Declaration<'_>, names: &mut Vec<String>) {
    match declaration {
        Declaration::VariableDeclaration(var) => {
            for declarator in &var.declarations {
                binding_names(&declarator.id, names);
            }
        }
        Declaration::FunctionDeclaration(func) => {
            if let Some(id) = &func.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                names.push(id.name.to_string());
            }
        }
        _ => {}
    }
}

fn binding_names(pattern: &BindingPattern<'_>, names: &mut Vec<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => names.push(id.name.to_string()),
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                binding_names(&property.value, names);
            }
            if let Some(rest) = &object.rest {
                binding_names(&rest.argument, names);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                binding_names(element, names);
            }
            if let Some(rest) = &array.rest {
                binding_names(&rest.argument, names);
            }
        }
        BindingPatternKind::AssignmentPattern(assign) => binding_names(&assign.left, names),
    }
}

/// Property access on `object`, bracketed when `name` is not an identifier
fn member(object: &str, name: &str) -> String {
    if is_identifier_name(name) {
        format!("{object}.{name}")
    } else {
        format!("{object}[{}]", quote(name))
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first == '$' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

/// JSON string literal, which is also a valid JavaScript string literal
pub(crate) fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
