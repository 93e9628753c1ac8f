//! Assets: one compiled module plus its dependency metadata
//!
//! The [`AssetBuilder`] turns a source file into an [`UnlinkedAsset`]. The
//! graph builder links it into an immutable [`Asset`] once every dependency
//! has been given an id.

use std::path::{Path, PathBuf};

use log::debug;
use oxc_allocator::Allocator;

use crate::{
    error::BundleError,
    parser::parse_module,
    reader::SourceReader,
    resolver::normalize_path,
    transformer::ModuleTransformer,
    types::{AssetId, AssetIdGenerator, FxIndexMap},
    visitors::ImportCollector,
};

/// A compiled module whose dependencies have not been resolved yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlinkedAsset {
    pub id: AssetId,
    pub filename: PathBuf,
    pub code: String,
    pub dependencies: Vec<String>,
}

impl UnlinkedAsset {
    /// Finalize the asset with its specifier -> id mapping
    pub fn link(self, mapping: FxIndexMap<String, AssetId>) -> Asset {
        Asset {
            id: self.id,
            filename: self.filename,
            code: self.code,
            dependencies: self.dependencies,
            mapping,
        }
    }
}

/// A single compiled module unit of the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    id: AssetId,
    filename: PathBuf,
    code: String,
    dependencies: Vec<String>,
    mapping: FxIndexMap<String, AssetId>,
}

impl Asset {
    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Function body run as `function (require, module, exports) { .. }`
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Raw specifiers in declaration order, duplicates included
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Specifier as written -> id of the asset built for it
    pub fn mapping(&self) -> &FxIndexMap<String, AssetId> {
        &self.mapping
    }
}

/// Builds assets from source files
#[derive(Debug)]
pub struct AssetBuilder<R> {
    reader: R,
    transformer: ModuleTransformer,
}

impl<R: SourceReader> AssetBuilder<R> {
    pub fn new(reader: R, transformer: ModuleTransformer) -> Self {
        Self {
            reader,
            transformer,
        }
    }

    /// Read, parse and compile `filename`, taking the next id from `ids`
    pub fn build(
        &self,
        filename: &Path,
        ids: &mut AssetIdGenerator,
    ) -> Result<UnlinkedAsset, BundleError> {
        let filename = normalize_path(filename);
        let source =
            self.reader
                .read(&filename)
                .map_err(|source| BundleError::UnreadableSource {
                    path: filename.clone(),
                    source,
                })?;

        let allocator = Allocator::default();
        let program = parse_module(&allocator, &source, &filename)?;
        let dependencies = ImportCollector::collect(&program);

        let id = ids.next_id();
        let code = self.transformer.compile(&program, &source, &filename)?;

        debug!(
            "Built asset {id} from {} with {} dependencies",
            filename.display(),
            dependencies.len()
        );

        Ok(UnlinkedAsset {
            id,
            filename,
            code,
            dependencies,
        })
    }
}
