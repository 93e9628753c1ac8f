//! The ordered collection of all assets discovered in one bundling run

use crate::{asset::Asset, types::AssetId};

/// Assets in breadth-first discovery order
///
/// The position of an asset carries no meaning for the runtime; its id is the
/// address the generated bundle uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetGraph {
    assets: Vec<Asset>,
}

impl AssetGraph {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    /// The entry asset, always id 0
    pub fn entry(&self) -> Option<&Asset> {
        self.get(AssetId::ENTRY)
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<'a> IntoIterator for &'a AssetGraph {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
