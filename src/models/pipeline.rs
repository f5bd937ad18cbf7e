//! Data-flow structures: pipelines, components and paths

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Class id shared by every managed (.NET) pipeline component
pub const MANAGED_COMPONENT_WRAPPER: &str = "{874F7595-FB5F-40FF-96AF-FBFF8250E3EF}";

/// Custom property holding the real type name of a managed component
pub const USER_COMPONENT_TYPE_NAME: &str = "UserComponentTypeName";

/// Well-known custom property names read by the rules
pub mod property_names {
    pub const ACCESS_MODE: &str = "AccessMode";
    pub const FAST_LOAD_OPTIONS: &str = "FastLoadOptions";
    pub const SCRIPT_LANGUAGE: &str = "ScriptLanguage";
    pub const SOURCE_CODE: &str = "SourceCode";
}

/// Value of a component custom property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(value) => write!(f, "{}", value),
            PropertyValue::Integer(value) => write!(f, "{}", value),
            PropertyValue::Text(value) => write!(f, "{}", value),
            PropertyValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// One step of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: u32,
    pub name: String,
    pub class_id: String,
    #[serde(default)]
    pub custom_properties: BTreeMap<String, PropertyValue>,
}

impl Component {
    pub fn new(id: u32, name: impl Into<String>, class_id: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            class_id: class_id.into(),
            custom_properties: BTreeMap::new(),
        }
    }

    /// Builder-style helper for setting a custom property
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.custom_properties.insert(name.into(), value);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.custom_properties.get(name)
    }

    pub fn is_managed(&self) -> bool {
        self.class_id.eq_ignore_ascii_case(MANAGED_COMPONENT_WRAPPER)
    }
}

/// Output side of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEndpoint {
    pub component: u32,
    /// Id of the input this output is synchronous with; 0 means none
    #[serde(default)]
    pub synchronous_input_id: u32,
}

/// Input side of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEndpoint {
    pub component: u32,
}

/// Directed edge between two component endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPath {
    #[serde(default)]
    pub name: String,
    pub start: OutputEndpoint,
    pub end: InputEndpoint,
}

impl DataPath {
    /// Path whose output does not follow an upstream input synchronously
    pub fn is_asynchronous(&self) -> bool {
        self.start.synchronous_input_id == 0
    }
}

/// Data-flow graph embedded in a pipeline task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub paths: Vec<DataPath>,
}

impl Pipeline {
    pub fn component(&self, id: u32) -> Option<&Component> {
        self.components.iter().find(|component| component.id == id)
    }
}
