//! Core functionality: package tree traversal, component resolution and
//! the rule engine

pub mod analyzer;
pub mod cache;
pub mod catalogue;
pub mod control_flow;
pub mod data_flow;
pub mod engine;
pub mod parallel;
pub mod resolver;

pub use analyzer::Analyzer;
pub use cache::ScriptCache;
pub use catalogue::{BuiltinCatalogue, ComponentCatalogue, FileCatalogue};
pub use engine::{Diagnostics, Engine};
pub use parallel::ProgressUpdate;
pub use resolver::ComponentResolver;
