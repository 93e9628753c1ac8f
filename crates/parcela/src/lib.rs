//! Minimal JavaScript module bundler
//!
//! Starting from an entry ES module, parcela discovers every statically
//! imported module, compiles each one into a function body for a
//! `(require, module, exports)` calling convention and renders them together
//! with a small loader into one self-contained script.

pub mod asset;
pub mod asset_graph;
pub mod bundler;
pub mod config;
pub mod error;
pub mod graph_builder;
pub mod orchestrator;
pub mod parser;
pub mod reader;
pub mod resolver;
pub mod runtime;
pub mod transformer;
pub mod types;
pub mod visitors;

pub use asset::{Asset, AssetBuilder, UnlinkedAsset};
pub use asset_graph::AssetGraph;
pub use config::Config;
pub use error::BundleError;
pub use graph_builder::GraphBuilder;
pub use orchestrator::BundleOrchestrator;
pub use types::{AssetId, AssetIdGenerator};
