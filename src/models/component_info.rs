//! Resolved semantic identity of pipeline components

use super::pipeline::MANAGED_COMPONENT_WRAPPER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display names the rules match resolved components against
pub mod names {
    pub const OLE_DB_SOURCE: &str = "OLE DB Source";
    pub const ADO_NET_SOURCE: &str = "ADO NET Source";
    pub const LOOKUP: &str = "Lookup";
    pub const SORT: &str = "Sort";
    pub const SCRIPT_COMPONENT: &str = "Script Component";
    pub const OLE_DB_DESTINATION: &str = "OLE DB Destination";
}

/// Role of a component in the data flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    SourceAdapter,
    Transform,
    DestinationAdapter,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentType::SourceAdapter => write!(f, "source"),
            ComponentType::Transform => write!(f, "transform"),
            ComponentType::DestinationAdapter => write!(f, "destination"),
        }
    }
}

/// One catalogue entry: {id, display name, creation name, component kind}
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub id: String,
    pub name: String,
    pub creation_name: String,
    pub component_type: ComponentType,
}

impl ComponentInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        creation_name: impl Into<String>,
        component_type: ComponentType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            creation_name: creation_name.into(),
            component_type,
        }
    }

    /// Key this entry is registered under in the lookup table.
    ///
    /// Managed components all share the wrapper class id, so they are keyed
    /// by creation name, which is what their `UserComponentTypeName` holds.
    pub fn lookup_key(&self) -> &str {
        if self.id.eq_ignore_ascii_case(MANAGED_COMPONENT_WRAPPER) {
            &self.creation_name
        } else {
            &self.id
        }
    }

    pub fn is_source(&self) -> bool {
        self.component_type == ComponentType::SourceAdapter
    }

    /// True for the relational sources that could sort in their query
    pub fn is_database_source(&self) -> bool {
        self.name == names::OLE_DB_SOURCE || self.name == names::ADO_NET_SOURCE
    }
}
