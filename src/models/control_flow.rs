//! Control-flow structures of a package
//!
//! A package is the root of a tree of containers and tasks. Every container
//! (and every task) may carry event handlers, which are themselves sequences
//! of executables. The tree is exclusively owned top-down, so a traversal never
//! meets the same node twice.

use super::pipeline::Pipeline;
use super::tasks::{ExecuteProcessTask, ScriptTask};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How sensitive data is protected when a package is saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtectionLevel {
    DontSaveSensitive,
    #[default]
    EncryptSensitiveWithUserKey,
    EncryptSensitiveWithPassword,
    EncryptAllWithPassword,
    EncryptAllWithUserKey,
    ServerStorage,
}

impl fmt::Display for ProtectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Execution result a task can be forced to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForcedExecResult {
    #[default]
    None,
    Success,
    Failure,
    Completion,
}

impl fmt::Display for ForcedExecResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A package or task scoped variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub evaluate_as_expression: bool,
}

fn default_namespace() -> String {
    "User".to_string()
}

impl Variable {
    /// Fully qualified name, e.g. `User::RowCount`
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }

    /// True when an expression is set but will never be evaluated
    pub fn has_ignored_expression(&self) -> bool {
        !self.evaluate_as_expression
            && self
                .expression
                .as_deref()
                .is_some_and(|expr| !expr.trim().is_empty())
    }
}

/// Execution flags shared by containers and tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionProperties {
    #[serde(default)]
    pub force_execution_result: ForcedExecResult,
    #[serde(default)]
    pub fail_package_on_failure: bool,
    #[serde(default)]
    pub fail_parent_on_failure: bool,
}

/// One message reported by the host's own package validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub code: i64,
    #[serde(default)]
    pub source: Option<String>,
    pub description: String,
}

/// Validation output attached to a package by the loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessages {
    #[serde(default)]
    pub errors: Vec<ValidationMessage>,
    #[serde(default)]
    pub warnings: Vec<ValidationMessage>,
}

impl ValidationMessages {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Nodes that own event-handler sub-trees
pub trait EventHandlerHost {
    fn event_handlers(&self) -> &[EventHandler];
}

/// Nodes that own an ordered list of executables
pub trait Sequence: EventHandlerHost {
    fn name(&self) -> &str;
    fn executables(&self) -> &[Executable];
}

/// A named workflow unit and root of one control-flow tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub protection_level: ProtectionLevel,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub executables: Vec<Executable>,
    #[serde(default)]
    pub event_handlers: Vec<EventHandler>,
    #[serde(default)]
    pub validation: ValidationMessages,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protection_level: ProtectionLevel::default(),
            variables: Vec::new(),
            executables: Vec::new(),
            event_handlers: Vec::new(),
            validation: ValidationMessages::default(),
        }
    }
}

/// Child of a sequence: either a nested container or a leaf task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Executable {
    Container(Container),
    Task(TaskHost),
}

impl Executable {
    pub fn name(&self) -> &str {
        match self {
            Executable::Container(container) => &container.name,
            Executable::Task(task) => &task.name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    #[default]
    Sequence,
    ForLoop,
    ForEachLoop,
}

/// Sequence or loop container holding child executables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub kind: ContainerKind,
    #[serde(default)]
    pub properties: ExecutionProperties,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub executables: Vec<Executable>,
    #[serde(default)]
    pub event_handlers: Vec<EventHandler>,
}

/// Sub-tree run when `event` fires on the owning node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHandler {
    pub event: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub executables: Vec<Executable>,
    #[serde(default)]
    pub event_handlers: Vec<EventHandler>,
}

/// Leaf of the control-flow tree wrapping a task object of a given kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHost {
    pub name: String,
    #[serde(default)]
    pub properties: ExecutionProperties,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub event_handlers: Vec<EventHandler>,
    pub task: TaskObject,
}

/// Inner object of a task; the control-flow walker filters on this kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskObject {
    Pipeline(Pipeline),
    Script(ScriptTask),
    ExecuteProcess(ExecuteProcessTask),
    Other {
        #[serde(default)]
        creation_name: String,
    },
}

impl TaskObject {
    pub fn kind_name(&self) -> &str {
        match self {
            TaskObject::Pipeline(_) => "pipeline",
            TaskObject::Script(_) => "script",
            TaskObject::ExecuteProcess(_) => "execute_process",
            TaskObject::Other { creation_name } => creation_name,
        }
    }
}

impl EventHandlerHost for Package {
    fn event_handlers(&self) -> &[EventHandler] {
        &self.event_handlers
    }
}

impl Sequence for Package {
    fn name(&self) -> &str {
        &self.name
    }

    fn executables(&self) -> &[Executable] {
        &self.executables
    }
}

impl EventHandlerHost for Container {
    fn event_handlers(&self) -> &[EventHandler] {
        &self.event_handlers
    }
}

impl Sequence for Container {
    fn name(&self) -> &str {
        &self.name
    }

    fn executables(&self) -> &[Executable] {
        &self.executables
    }
}

impl EventHandlerHost for EventHandler {
    fn event_handlers(&self) -> &[EventHandler] {
        &self.event_handlers
    }
}

impl Sequence for EventHandler {
    fn name(&self) -> &str {
        &self.event
    }

    fn executables(&self) -> &[Executable] {
        &self.executables
    }
}

impl EventHandlerHost for TaskHost {
    fn event_handlers(&self) -> &[EventHandler] {
        &self.event_handlers
    }
}
