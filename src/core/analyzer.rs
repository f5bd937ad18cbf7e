//! Project analysis
//!
//! Ties the loader, the resolver and the engine together and turns one or
//! more project files into an [`AnalysisReport`]. Several project files may
//! be analysed in parallel; their diagnostics are concatenated in file order.

use super::catalogue::{BuiltinCatalogue, FileCatalogue};
use super::engine::Engine;
use super::parallel::{process_in_order, ProgressUpdate};
use super::resolver::ComponentResolver;
use crate::error::Result;
use crate::models::{AnalysisReport, Diagnostic, Project, Settings};
use crate::parsers::ProjectLoader;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Analyses projects with one engine
pub struct Analyzer {
    engine: Engine,
    parallel: bool,
    jobs: usize,
}

impl Analyzer {
    /// Build the resolver and engine described by `settings`
    pub fn new(settings: &Settings) -> Result<Self> {
        let resolver = match &settings.catalogue_file {
            Some(path) => ComponentResolver::new(FileCatalogue::load(path)?),
            None => ComponentResolver::new(BuiltinCatalogue::new()),
        };
        let engine = Engine::new(settings, Arc::new(resolver))?;
        Ok(Self::with_engine(engine, settings.parallel, settings.jobs))
    }

    pub fn with_engine(engine: Engine, parallel: bool, jobs: usize) -> Self {
        Self {
            engine,
            parallel,
            jobs: jobs.max(1),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// All diagnostics of one project
    pub fn analyze_project(&self, project: &Project) -> Result<Vec<Diagnostic>> {
        self.engine.run(project).collect_all()
    }

    /// Load and analyse every project found at `path`
    pub fn analyze_path<P>(&self, path: &Path, progress: P) -> Result<AnalysisReport>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let files = ProjectLoader::discover(path)?;
        let projects = self.load_all(files)?;
        self.analyze_projects(&projects, progress)
    }

    fn load_all(&self, files: Vec<PathBuf>) -> Result<Vec<Project>> {
        if self.parallel && files.len() > 1 {
            process_in_order(files, self.jobs, ProjectLoader::open, |update| {
                debug!("Loaded {}/{} project files", update.current, update.total)
            })
        } else {
            files.iter().map(ProjectLoader::open).collect()
        }
    }

    /// Analyse already loaded projects; `progress` is called once per
    /// package as its analysis starts
    pub fn analyze_projects<P>(&self, projects: &[Project], progress: P) -> Result<AnalysisReport>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let started = Instant::now();
        let total: usize = projects
            .iter()
            .map(|project| self.engine.selected_packages(project))
            .sum();
        let done = AtomicUsize::new(0);

        let analyze = |project: &Project| {
            self.engine
                .run(project)
                .with_progress(|package| {
                    let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                    progress(ProgressUpdate::new(current, total, package.name.clone()));
                })
                .collect_all()
        };

        let results = if self.parallel && projects.len() > 1 {
            process_in_order(projects.iter().collect(), self.jobs, analyze, |update| {
                debug!("Analysed {}/{} projects", update.current, update.total)
            })?
        } else {
            projects.iter().map(analyze).collect::<Result<Vec<_>>>()?
        };

        let mut report = AnalysisReport::new();
        for (project, diagnostics) in projects.iter().zip(results) {
            report.add_project(&project.name, self.engine.selected_packages(project));
            report.extend(diagnostics);
        }
        report.set_duration(started.elapsed());

        info!(
            "Analysed {} packages in {} projects: {} diagnostics in {:?}",
            report.summary.total_packages,
            report.summary.total_projects,
            report.summary.total(),
            report.summary.duration
        );
        Ok(report)
    }
}
