//! Project loading
//!
//! A project container is a JSON document:
//!
//! ```json
//! { "name": "Warehouse", "packages": [ { "stream_name": "Load.dtsx", "package": { ... } } ] }
//! ```
//!
//! Packages come back ordered by stream name. A directory is searched
//! recursively for `*.json` project files.

use crate::error::{IscopError, Result};
use crate::models::Project;
use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const PROJECT_EXTENSION: &str = "json";

/// Loader for JSON project containers
pub struct ProjectLoader;

impl ProjectLoader {
    /// Parse project JSON; `file` is only used for error context
    pub fn parse(content: &str, file: &Path) -> Result<Project> {
        let mut project: Project = serde_json::from_str(content)
            .map_err(|e| IscopError::json_parse_error(file, e))?;

        let mut seen = HashSet::new();
        for item in &project.packages {
            if !seen.insert(item.stream_name.to_lowercase()) {
                return Err(IscopError::InvalidProject {
                    path: file.to_path_buf(),
                    message: format!("duplicate package stream '{}'", item.stream_name),
                });
            }
        }

        if project.name.trim().is_empty() {
            project.name = file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        project.sort_packages();
        Ok(project)
    }

    /// Open one project file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Project> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(IscopError::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut project = Self::parse(&content, path)?;
        project.path = Some(path.to_path_buf());

        debug!(
            "Opened project '{}' with {} packages from {}",
            project.name,
            project.len(),
            path.display()
        );
        Ok(project)
    }

    /// Project files at `path`: the file itself, or every `*.json` file
    /// below a directory, sorted
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !path.is_dir() {
            return Err(IscopError::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|file| {
                file.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION))
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(IscopError::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }

        info!("Found {} project files under {}", files.len(), path.display());
        Ok(files)
    }
}
