//! Graph builder that discovers every asset reachable from the entry module
//!
//! The traversal is a FIFO work queue: each dequeued asset has its specifiers
//! resolved against its own directory, an asset is built for every one of them
//! and appended to the queue, and once all of its dependencies have ids the
//! asset is linked and appended to the graph.
//!
//! By default nothing is deduplicated: every import edge produces a new asset,
//! so a diamond builds the shared module twice and an import cycle never
//! terminates. With `dedupe_modules` a path that was already built reuses the
//! existing id instead.

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};
use rustc_hash::FxHashMap;

use crate::{
    asset::{AssetBuilder, UnlinkedAsset},
    asset_graph::AssetGraph,
    error::BundleError,
    reader::SourceReader,
    resolver::resolve_specifier,
    types::{AssetId, AssetIdGenerator, FxIndexMap},
};

/// Builds an [`AssetGraph`] from an entry file
#[derive(Debug)]
pub struct GraphBuilder<R> {
    asset_builder: AssetBuilder<R>,
    dedupe_modules: bool,
}

impl<R: SourceReader> GraphBuilder<R> {
    pub fn new(asset_builder: AssetBuilder<R>) -> Self {
        Self {
            asset_builder,
            dedupe_modules: false,
        }
    }

    /// Reuse the asset of an already built path instead of building it again
    #[must_use]
    pub fn with_dedupe_modules(mut self, dedupe_modules: bool) -> Self {
        self.dedupe_modules = dedupe_modules;
        self
    }

    /// Discover and compile every module reachable from `entry`
    ///
    /// The first failure aborts the build; no partial graph is returned.
    pub fn build(&self, entry: &Path) -> Result<AssetGraph, BundleError> {
        let mut ids = AssetIdGenerator::new();
        let mut built: FxHashMap<PathBuf, AssetId> = FxHashMap::default();

        let entry_asset = self.asset_builder.build(entry, &mut ids)?;
        debug_assert!(entry_asset.id.is_entry(), "entry asset must take the first id");
        debug!("Entry asset {} is {}", entry_asset.id, entry_asset.filename.display());
        built.insert(entry_asset.filename.clone(), entry_asset.id);

        let mut queue = VecDeque::from([entry_asset]);
        let mut assets = Vec::new();

        while let Some(asset) = queue.pop_front() {
            let mapping = self.expand(&asset, &mut ids, &mut built, &mut queue)?;
            assets.push(asset.link(mapping));
        }

        info!(
            "Built asset graph with {} assets from {}",
            assets.len(),
            entry.display()
        );
        Ok(AssetGraph::new(assets))
    }

    /// Build (or look up) the dependencies of `asset`, queueing new ones
    fn expand(
        &self,
        asset: &UnlinkedAsset,
        ids: &mut AssetIdGenerator,
        built: &mut FxHashMap<PathBuf, AssetId>,
        queue: &mut VecDeque<UnlinkedAsset>,
    ) -> Result<FxIndexMap<String, AssetId>, BundleError> {
        let mut mapping = FxIndexMap::default();

        for specifier in &asset.dependencies {
            let resolved = resolve_specifier(&asset.filename, specifier);

            if self.dedupe_modules {
                if let Some(&existing) = built.get(&resolved) {
                    trace!(
                        "{} -> '{specifier}' reuses asset {existing}",
                        asset.filename.display()
                    );
                    mapping.insert(specifier.clone(), existing);
                    continue;
                }
            }

            let child = self.asset_builder.build(&resolved, ids)?;
            trace!(
                "{} -> '{specifier}' resolved to {} as asset {}",
                asset.filename.display(),
                resolved.display(),
                child.id
            );
            built.insert(child.filename.clone(), child.id);
            mapping.insert(specifier.clone(), child.id);
            queue.push_back(child);
        }

        Ok(mapping)
    }
}
