//! Parsers for project containers, script sources and pattern settings

pub mod csharp;
pub mod patterns;
pub mod project_loader;
pub mod script;

pub use csharp::CSharpParser;
pub use patterns::{PatternEntry, PatternSettings};
pub use project_loader::ProjectLoader;
pub use script::{ParsedScript, ScriptEncoding, ScriptParser};
