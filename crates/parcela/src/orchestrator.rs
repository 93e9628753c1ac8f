//! One bundling run: configuration -> asset graph -> rendered bundle

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;

use crate::{
    asset::AssetBuilder,
    asset_graph::AssetGraph,
    bundler,
    config::Config,
    graph_builder::GraphBuilder,
    reader::{FsReader, SourceReader},
    transformer::ModuleTransformer,
};

#[derive(Debug)]
pub struct BundleOrchestrator<R = FsReader> {
    config: Config,
    reader: R,
}

impl BundleOrchestrator<FsReader> {
    pub fn new(config: Config) -> Self {
        Self::with_reader(config, FsReader)
    }
}

impl<R: SourceReader> BundleOrchestrator<R> {
    pub fn with_reader(config: Config, reader: R) -> Self {
        Self { config, reader }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discover and compile every module reachable from `entry`
    pub fn build_graph(&self, entry: &Path) -> Result<AssetGraph> {
        let transformer = ModuleTransformer::new(&self.config.target)?;
        let asset_builder = AssetBuilder::new(&self.reader, transformer);
        let graph = GraphBuilder::new(asset_builder)
            .with_dedupe_modules(self.config.dedupe_modules)
            .build(entry)
            .with_context(|| format!("failed to bundle {}", entry.display()))?;
        Ok(graph)
    }

    /// Bundle `entry` and return the generated script
    pub fn bundle(&self, entry: &Path) -> Result<String> {
        let graph = self.build_graph(entry)?;
        let output = bundler::render(&graph)?;
        info!(
            "Bundled {} into {} assets ({} bytes)",
            entry.display(),
            graph.len(),
            output.len()
        );
        Ok(output)
    }

    /// Bundle `entry` and write the script to `output`
    ///
    /// Nothing is written when bundling fails.
    pub fn bundle_to_file(&self, entry: &Path, output: &Path) -> Result<()> {
        let bundle = self.bundle(entry)?;
        if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(output, bundle)
            .with_context(|| format!("failed to write bundle to {}", output.display()))?;
        info!("Wrote bundle to {}", output.display());
        Ok(())
    }
}
