//! Bootstrap runtime embedded in every bundle
//!
//! Loading protocol, version 2:
//! - the modules table maps an id to `[fn, mapping]`
//! - `require(id)` calls `fn(localRequire, module, module.exports)` with a
//!   fresh `module = { exports: {} }` and returns `module.exports`
//! - `localRequire(specifier)` translates the specifier as written in the
//!   module through `mapping` and calls `require` with the resulting id
//! - results are never cached: requiring an id twice runs the module twice
//! - `require(0)` runs once as the entry point
//! - when module code calls syntax helpers, the whole bundle is wrapped in a
//!   scope declaring the [`HELPERS_BINDING`] table
//!
//! The runtime is ES5 so the bundle itself adds no syntax requirements.

/// Version of the loading protocol implemented by [`RUNTIME_PROLOGUE`]
pub const RUNTIME_VERSION: u32 = 2;

/// Name lowered module code uses to reach the syntax helpers
pub const HELPERS_BINDING: &str = "babelHelpers";

/// Opening of the scope declaring the helper table, before [`RUNTIME_PROLOGUE`]
pub const HELPERS_PROLOGUE: &str = concat!("(function () {\n", include_str!("runtime_helpers.js"));

/// Closing of the helper scope, after [`RUNTIME_EPILOGUE`]
pub const HELPERS_EPILOGUE: &str = "})();\n";

/// Everything before the modules table
pub const RUNTIME_PROLOGUE: &str = r#"(function (modules) {
  function require(id) {
    var entry = modules[id];
    var fn = entry[0];
    var mapping = entry[1];
    function localRequire(name) {
      if (!Object.prototype.hasOwnProperty.call(mapping, name)) {
        throw new Error("Cannot find module '" + name + "'");
      }
      return require(mapping[name]);
    }
    var module = { exports: {} };
    fn(localRequire, module, module.exports);
    return module.exports;
  }
  require(0);
})({
"#;

/// Everything after the modules table
pub const RUNTIME_EPILOGUE: &str = "});\n";

/// Opening of one table entry, followed by the module code
pub(crate) fn module_entry_head(id: u32) -> String {
    format!("  {id}: [\n    function (require, module, exports) {{\n")
}

/// Closing of one table entry, after the module code
pub(crate) fn module_entry_tail(mapping_json: &str) -> String {
    format!("    }},\n    {mapping_json}\n  ],\n")
}

/// Whether compiled module code reads from the helper table
pub(crate) fn uses_helpers(code: &str) -> bool {
    code.match_indices(HELPERS_BINDING)
        .any(|(index, _)| code[index + HELPERS_BINDING.len()..].starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_table_declares_its_binding() {
        assert!(HELPERS_PROLOGUE.starts_with("(function () {\nvar babelHelpers = "));
        for helper in ["objectSpread2", "asyncToGenerator", "classPrivateFieldGet2", "usingCtx"] {
            assert!(HELPERS_PROLOGUE.contains(&format!("    {helper}: ")), "{helper}");
        }
    }

    #[test]
    fn test_uses_helpers() {
        assert!(uses_helpers("var o = babelHelpers.objectSpread2({}, x);"));
        assert!(!uses_helpers("var o = Object.assign({}, x);"));
        assert!(!uses_helpers("var babelHelpers;"));
    }
}
