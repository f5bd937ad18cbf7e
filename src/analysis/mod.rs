//! Script analysis: the error-handling validator and the analyser that
//! runs it over parsed script documents

pub mod error_handling;
pub mod script_analyzer;

pub use error_handling::{ErrorHandlingCheck, RequiredPattern};
pub use script_analyzer::ScriptAnalyzer;
