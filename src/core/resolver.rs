//! Component metadata resolver
//!
//! Maps a pipeline component to its [`ComponentInfo`]. The lookup table is
//! built from the catalogue on first use, behind a one-time initialisation
//! barrier, and is read-only afterwards.

use super::catalogue::{BuiltinCatalogue, ComponentCatalogue};
use crate::models::pipeline::USER_COMPONENT_TYPE_NAME;
use crate::models::{Component, ComponentInfo, PropertyValue};
use std::collections::HashMap;
use std::sync::OnceLock;

pub struct ComponentResolver {
    catalogue: Box<dyn ComponentCatalogue>,
    table: OnceLock<HashMap<String, ComponentInfo>>,
}

impl ComponentResolver {
    pub fn new(catalogue: impl ComponentCatalogue + 'static) -> Self {
        Self {
            catalogue: Box::new(catalogue),
            table: OnceLock::new(),
        }
    }

    /// Resolver over the builtin catalogue
    pub fn builtin() -> Self {
        Self::new(BuiltinCatalogue::new())
    }

    /// Lookup key of a component: the user type name for managed
    /// components, the class id otherwise. `None` when a managed component
    /// has no type name.
    pub fn component_key(component: &Component) -> Option<&str> {
        if component.is_managed() {
            component
                .property(USER_COMPONENT_TYPE_NAME)
                .and_then(PropertyValue::as_str)
        } else {
            Some(&component.class_id)
        }
    }

    /// Resolve a component; `None` means the rule does not apply to it
    pub fn resolve(&self, component: &Component) -> Option<&ComponentInfo> {
        let Some(key) = Self::component_key(component) else {
            log::warn!(
                "Component '{}' has no {} property",
                component.name,
                USER_COMPONENT_TYPE_NAME
            );
            return None;
        };

        let table = self.table();
        let info = table.get(key).or_else(|| {
            // assembly-qualified type names also match their bare type name
            key.split_once(',')
                .and_then(|(type_name, _)| table.get(type_name.trim()))
        });

        if info.is_none() {
            log::warn!("Component '{}' has unsupported type '{}'", component.name, key);
        }
        info
    }

    /// Whether the table has been built yet
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    fn table(&self) -> &HashMap<String, ComponentInfo> {
        self.table.get_or_init(|| {
            let entries = self.catalogue.entries();
            let mut table = HashMap::with_capacity(entries.len());
            for info in entries {
                // first write wins
                table.entry(info.lookup_key().to_string()).or_insert(info);
            }
            log::debug!(
                "Built component table with {} entries from the {} catalogue",
                table.len(),
                self.catalogue.name()
            );
            table
        })
    }
}

impl std::fmt::Debug for ComponentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentResolver")
            .field("catalogue", &self.catalogue.name())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
