//! Host component catalogues
//!
//! A catalogue lists the pipeline components the host knows about. The
//! resolver queries it exactly once and keeps the result for the rest of
//! the process.

use crate::error::{IscopError, Result};
use crate::models::component_info::names;
use crate::models::pipeline::MANAGED_COMPONENT_WRAPPER;
use crate::models::{ComponentInfo, ComponentType};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Source of (id, name, creation name, kind) tuples
pub trait ComponentCatalogue: Send + Sync {
    /// Every component registered with the host
    fn entries(&self) -> Vec<ComponentInfo>;

    /// Name of the catalogue, for logging
    fn name(&self) -> &str;
}

/// Stock components shipped with the host
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalogue;

impl BuiltinCatalogue {
    pub fn new() -> Self {
        Self
    }
}

impl ComponentCatalogue for BuiltinCatalogue {
    fn entries(&self) -> Vec<ComponentInfo> {
        use ComponentType::*;

        let native = |id: &str, name: &str, kind| ComponentInfo::new(id, name, id, kind);
        let managed = |type_name: &str, name: &str, kind| {
            ComponentInfo::new(MANAGED_COMPONENT_WRAPPER, name, type_name, kind)
        };

        vec![
            native("Microsoft.OLEDBSource", names::OLE_DB_SOURCE, SourceAdapter),
            native("Microsoft.FlatFileSource", "Flat File Source", SourceAdapter),
            native("Microsoft.ExcelSource", "Excel Source", SourceAdapter),
            managed(
                "Microsoft.SqlServer.Dts.Pipeline.DataReaderSourceAdapter",
                names::ADO_NET_SOURCE,
                SourceAdapter,
            ),
            native("Microsoft.Lookup", names::LOOKUP, Transform),
            native("Microsoft.Sort", names::SORT, Transform),
            native("Microsoft.DerivedColumn", "Derived Column", Transform),
            native("Microsoft.MergeJoin", "Merge Join", Transform),
            native("Microsoft.UnionAll", "Union All", Transform),
            native("Microsoft.Aggregate", "Aggregate", Transform),
            native("Microsoft.ConditionalSplit", "Conditional Split", Transform),
            native("Microsoft.Multicast", "Multicast", Transform),
            native("Microsoft.RowCount", "Row Count", Transform),
            managed(
                "Microsoft.SqlServer.Dts.Pipeline.ScriptComponentHost",
                names::SCRIPT_COMPONENT,
                Transform,
            ),
            native("Microsoft.OLEDBDestination", names::OLE_DB_DESTINATION, DestinationAdapter),
            native("Microsoft.FlatFileDestination", "Flat File Destination", DestinationAdapter),
            managed(
                "Microsoft.SqlServer.Dts.Pipeline.ADONETDestination",
                "ADO NET Destination",
                DestinationAdapter,
            ),
        ]
    }

    fn name(&self) -> &str {
        "builtin"
    }
}

#[derive(Debug, Deserialize)]
struct CatalogueDocument {
    #[serde(default, rename = "component")]
    components: Vec<ComponentInfo>,
}

/// Extra entries read from a TOML file, layered over the builtin catalogue.
///
/// ```toml
/// [[component]]
/// id = "{874F7595-FB5F-40FF-96AF-FBFF8250E3EF}"
/// name = "Checksum"
/// creation_name = "Konesans.Dts.Pipeline.ChecksumTransform"
/// component_type = "transform"
/// ```
#[derive(Debug, Clone)]
pub struct FileCatalogue {
    name: String,
    entries: Vec<ComponentInfo>,
}

impl FileCatalogue {
    /// Load the catalogue file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| IscopError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let document: CatalogueDocument =
            toml::from_str(&content).map_err(|e| IscopError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        log::debug!(
            "Loaded {} catalogue entries from {}",
            document.components.len(),
            path.display()
        );

        Ok(Self {
            name: path.display().to_string(),
            entries: document.components,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ComponentCatalogue for FileCatalogue {
    fn entries(&self) -> Vec<ComponentInfo> {
        // file entries first, so they win over builtin ones on the same key
        let mut entries = self.entries.clone();
        entries.extend(BuiltinCatalogue.entries());
        entries
    }

    fn name(&self) -> &str {
        &self.name
    }
}
