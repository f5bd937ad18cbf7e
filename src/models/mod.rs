//! Data models and structures for ISCop

pub mod component_info;
pub mod config;
pub mod control_flow;
pub mod diagnostic;
pub mod pipeline;
pub mod project;
pub mod report;
pub mod syntax;
pub mod tasks;

pub use component_info::{ComponentInfo, ComponentType};
pub use config::{OutputFormat, PartialSettings, RuleFailurePolicy, Settings};
pub use control_flow::{
    Container, EventHandler, EventHandlerHost, Executable, ExecutionProperties, ForcedExecResult,
    Package, ProtectionLevel, Sequence, TaskHost, TaskObject, Variable,
};
pub use diagnostic::{Diagnostic, Severity};
pub use pipeline::{Component, DataPath, Pipeline, PropertyValue};
pub use project::{PackageItem, Project};
pub use report::{AnalysisReport, ReportSummary};
pub use syntax::{
    AccessModifier, ElementKind, Statement, SyntaxElement, Token, TokenKind, Violation,
};
pub use tasks::{ExecuteProcessTask, ScriptTask};
