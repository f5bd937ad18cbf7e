//! Project container: an ordered collection of packages

use super::control_flow::Package;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A package together with the stream name it was stored under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageItem {
    pub stream_name: String,
    pub package: Package,
}

/// Opened project; immutable for the duration of an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub packages: Vec<PackageItem>,
    /// File the project was loaded from, if any
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            packages: Vec::new(),
            path: None,
        }
    }

    /// Add a package under the given stream name
    pub fn with_package(mut self, stream_name: impl Into<String>, package: Package) -> Self {
        self.packages.push(PackageItem {
            stream_name: stream_name.into(),
            package,
        });
        self
    }

    /// Restore the stream-name ordering packages are analysed in
    pub fn sort_packages(&mut self) {
        self.packages
            .sort_by(|a, b| a.stream_name.cmp(&b.stream_name));
    }

    pub fn package(&self, stream_name: &str) -> Option<&Package> {
        self.packages
            .iter()
            .find(|item| item.stream_name == stream_name)
            .map(|item| &item.package)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
