//! AST visitor implementations for parcela
//!
//! This module contains visitors over the oxc AST used while building assets.

mod import_collector;

pub use import_collector::ImportCollector;
