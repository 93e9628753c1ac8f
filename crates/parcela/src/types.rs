//! Shared type definitions for the parcela crate
//!
//! This module contains common types that are used across multiple components
//! of the bundler, ensuring consistency and avoiding circular dependencies.

use std::{fmt, hash::BuildHasherDefault};

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use serde::Serialize;

/// Insertion-ordered map using the fast Fx hasher
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Unique identifier for an asset in one bundling run
///
/// Ids are handed out in discovery order starting at 0 and double as the
/// module's address in the generated bundle, so the entry asset is always `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssetId(u32);

impl AssetId {
    /// Id of the entry asset
    pub const ENTRY: Self = Self(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value of the AssetId
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_entry(&self) -> bool {
        self.0 == Self::ENTRY.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence that hands out asset ids for a single graph build
///
/// The generator is owned by the running graph builder and threaded by `&mut`
/// into the asset builder. It is never reset while a build is in progress, so
/// an id is never handed out twice.
#[derive(Debug, Default)]
pub struct AssetIdGenerator {
    next: u32,
}

impl AssetIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> AssetId {
        let id = AssetId::new(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub const fn issued(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_starts_at_entry() {
        let mut ids = AssetIdGenerator::new();
        let first = ids.next_id();
        assert_eq!(first, AssetId::ENTRY);
        assert!(first.is_entry());
        assert_eq!(ids.next_id().as_u32(), 1);
        assert_eq!(ids.next_id().as_u32(), 2);
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_asset_id_serializes_as_number() {
        let mut mapping = FxIndexMap::default();
        mapping.insert("./b.js".to_owned(), AssetId::new(7));
        let json = serde_json::to_string(&mapping).expect("mapping should serialize");
        assert_eq!(json, r#"{"./b.js":7}"#);
    }
}
