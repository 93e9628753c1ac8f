//! Serialization of a completed asset graph into one executable script

use anyhow::{Context, Result, ensure};
use log::debug;

use crate::{
    asset_graph::AssetGraph,
    runtime::{
        HELPERS_EPILOGUE, HELPERS_PROLOGUE, RUNTIME_EPILOGUE, RUNTIME_PROLOGUE, RUNTIME_VERSION,
        module_entry_head, module_entry_tail, uses_helpers,
    },
};

/// Render `graph` as a self-contained bundle
///
/// Every asset becomes a table entry keyed by its id holding its wrapped code
/// and its specifier -> id mapping as an object literal. Module code is
/// inserted verbatim so multi-line string literals keep their content. The
/// syntax helper table is only emitted when some module calls into it.
pub fn render(graph: &AssetGraph) -> Result<String> {
    ensure!(!graph.is_empty(), "cannot render an empty asset graph");
    let with_helpers = graph.iter().any(|asset| uses_helpers(asset.code()));
    let mut capacity = graph.iter().map(|asset| asset.code().len() + 128).sum::<usize>()
        + RUNTIME_PROLOGUE.len()
        + RUNTIME_EPILOGUE.len();
    if with_helpers {
        capacity += HELPERS_PROLOGUE.len() + HELPERS_EPILOGUE.len();
    }
    let mut output = String::with_capacity(capacity);

    if with_helpers {
        output.push_str(HELPERS_PROLOGUE);
    }
    output.push_str(RUNTIME_PROLOGUE);
    for asset in graph {
        let mapping = serde_json::to_string(asset.mapping())
            .with_context(|| format!("failed to serialize mapping of asset {}", asset.id()))?;

        output.push_str(&module_entry_head(asset.id().as_u32()));
        output.push_str(asset.code());
        if !asset.code().ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&module_entry_tail(&mapping));
    }
    output.push_str(RUNTIME_EPILOGUE);
    if with_helpers {
        output.push_str(HELPERS_EPILOGUE);
    }

    debug!(
        "Rendered {} assets into {} bytes with runtime v{RUNTIME_VERSION} (helpers: {with_helpers})",
        graph.len(),
        output.len()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        asset::UnlinkedAsset,
        types::{AssetId, FxIndexMap},
    };

    fn asset(id: u32, code: &str, mapping: &[(&str, u32)]) -> crate::asset::Asset {
        let mapping: FxIndexMap<String, AssetId> = mapping
            .iter()
            .map(|(specifier, id)| ((*specifier).to_owned(), AssetId::new(*id)))
            .collect();
        UnlinkedAsset {
            id: AssetId::new(id),
            filename: PathBuf::from(format!("{id}.js")),
            code: code.to_owned(),
            dependencies: mapping.keys().cloned().collect(),
        }
        .link(mapping)
    }

    #[test]
    fn test_render_two_modules() {
        let graph = AssetGraph::new(vec![
            asset(0, "var b = require(\"./b.js\");\nconsole.log(b.value);", &[("./b.js", 1)]),
            asset(1, "exports.value = 42;\n", &[]),
        ]);

        insta::assert_snapshot!(render(&graph).unwrap(), @r#"
        (function (modules) {
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
          0: [
            function (require, module, exports) {
        var b = require("./b.js");
        console.log(b.value);
            },
            {"./b.js":1}
          ],
          1: [
            function (require, module, exports) {
        exports.value = 42;
            },
            {}
          ],
        });
        "#);
    }

    #[test]
    fn test_runtime_does_not_cache_modules() {
        let output = render(&AssetGraph::new(vec![asset(0, "", &[])])).unwrap();
        // A fresh module object is created inside require on every call
        let require_body = &output[output.find("function require(id)").unwrap()..output.find("require(0);").unwrap()];
        assert!(require_body.contains("var module = { exports: {} };"));
        assert!(!output.contains("cache"));
        assert_eq!(output.matches("require(0);").count(), 1);
    }

    #[test]
    fn test_mapping_is_escaped_and_ordered() {
        let output = render(&AssetGraph::new(vec![asset(
            0,
            "",
            &[("./z.js", 2), ("./quote\".js", 1)],
        )]))
        .unwrap();
        assert!(output.contains(r#"{"./z.js":2,"./quote\".js":1}"#), "{output}");
    }

    #[test]
    fn test_helper_scope_wraps_bundle_only_when_used() {
        let plain = render(&AssetGraph::new(vec![asset(0, "var o = Object.assign({}, x);\n", &[])])).unwrap();
        assert!(plain.starts_with(RUNTIME_PROLOGUE));
        assert!(!plain.contains("var babelHelpers"));

        let lowered = render(&AssetGraph::new(vec![
            asset(0, "require(\"./b.js\");\n", &[("./b.js", 1)]),
            asset(1, "var o = babelHelpers.objectSpread2({}, x);\n", &[]),
        ]))
        .unwrap();
        assert!(lowered.starts_with(HELPERS_PROLOGUE));
        assert!(lowered[HELPERS_PROLOGUE.len()..].starts_with(RUNTIME_PROLOGUE));
        assert!(lowered.ends_with("  ],\n});\n})();\n"), "{lowered}");
    }

    #[test]
    fn test_empty_graph_is_rejected() {
        let err = render(&AssetGraph::default()).unwrap_err();
        assert!(err.to_string().contains("empty asset graph"));
    }

    #[test]
    fn test_code_is_not_reindented() {
        let code = "var text = `line one\nline two`;\n";
        let output = render(&AssetGraph::new(vec![asset(0, code, &[])])).unwrap();
        assert!(output.contains("var text = `line one\nline two`;\n    },"));
    }
}
