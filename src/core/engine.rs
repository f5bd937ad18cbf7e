//! Rule engine
//!
//! Builds the rule set once (failing fast on bad pattern configuration) and
//! runs it over the packages of a project, producing diagnostics lazily: per
//! package in stream-name order, the host's validation messages first, then
//! every rule in id order.

use super::resolver::ComponentResolver;
use crate::analysis::ScriptAnalyzer;
use crate::error::{IscopError, Result};
use crate::models::{
    Diagnostic, Package, PackageItem, Project, RuleFailurePolicy, Settings, Severity,
};
use crate::parsers::patterns::PatternSettings;
use crate::rules::{self, Rule, RuleContext, RuleInfo};
use glob::{MatchOptions, Pattern};
use log::{debug, warn};
use std::collections::VecDeque;
use std::sync::Arc;

const PACKAGE_EXTENSION: &str = ".dtsx";

pub struct Engine {
    context: RuleContext,
    policy: RuleFailurePolicy,
    include_validation: bool,
    package_filter: Vec<Pattern>,
}

impl Engine {
    /// Compile pattern settings and package filters; any error here is a
    /// configuration error and nothing has been analysed yet
    pub fn new(settings: &Settings, resolver: Arc<ComponentResolver>) -> Result<Self> {
        let patterns = PatternSettings::load_or_builtin(settings.pattern_file.as_deref())?;
        let scripts = ScriptAnalyzer::csharp(&patterns, settings.script_cache_size)?;

        let package_filter = settings
            .package_filter
            .iter()
            .map(|pattern| Pattern::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            context: RuleContext::new(resolver, Arc::new(scripts)),
            policy: settings.rule_failure_policy,
            include_validation: settings.include_validation,
            package_filter,
        })
    }

    /// Identity of every rule this engine runs, in order
    pub fn rules(&self) -> Vec<RuleInfo> {
        rules::catalogue()
    }

    pub fn context(&self) -> &RuleContext {
        &self.context
    }

    /// Whether a package stored under `stream_name` is analysed
    pub fn accepts(&self, stream_name: &str) -> bool {
        if self.package_filter.is_empty() {
            return true;
        }

        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        let stem = strip_suffix_ignore_case(stream_name, PACKAGE_EXTENSION);
        self.package_filter.iter().any(|pattern| {
            pattern.matches_with(stream_name, options) || pattern.matches_with(stem, options)
        })
    }

    /// Number of packages `run` will analyse
    pub fn selected_packages(&self, project: &Project) -> usize {
        project
            .packages
            .iter()
            .filter(|item| self.accepts(&item.stream_name))
            .count()
    }

    /// Lazily run every rule over every selected package
    pub fn run<'a>(&'a self, project: &'a Project) -> Diagnostics<'a> {
        let mut packages: Vec<&'a PackageItem> = project
            .packages
            .iter()
            .filter(|item| self.accepts(&item.stream_name))
            .collect();
        packages.sort_by(|a, b| a.stream_name.cmp(&b.stream_name));

        debug!(
            "Running {} rules over {} packages of '{}'",
            rules::catalogue().len(),
            packages.len(),
            project.name
        );

        Diagnostics {
            engine: self,
            packages: packages.into_iter(),
            rules: rules::rule_set(&self.context),
            current: None,
            next_rule: 0,
            pending: VecDeque::new(),
            finished: false,
            progress: None,
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("policy", &self.policy)
            .field("include_validation", &self.include_validation)
            .field("package_filter", &self.package_filter)
            .finish()
    }
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> &'a str {
    let split = name.len().saturating_sub(suffix.len());
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => stem,
        _ => name,
    }
}

/// Host validation messages of a package as diagnostics
pub fn validation_diagnostics(package: &Package) -> Vec<Diagnostic> {
    let validation = &package.validation;
    validation
        .errors
        .iter()
        .map(|message| Diagnostic::from_validation(Severity::Error, &package.name, message))
        .chain(
            validation.warnings.iter().map(|message| {
                Diagnostic::from_validation(Severity::Warning, &package.name, message)
            }),
        )
        .collect()
}

type ProgressFn<'a> = Box<dyn FnMut(&Package) + 'a>;

/// Lazy stream of diagnostics for one project.
///
/// Under the abort policy the first failing rule yields one `Err` and ends
/// the stream; under the skip policy the failure is logged and the rule's
/// partial results are dropped.
pub struct Diagnostics<'a> {
    engine: &'a Engine,
    packages: std::vec::IntoIter<&'a PackageItem>,
    rules: Vec<Box<dyn Rule>>,
    current: Option<&'a Package>,
    next_rule: usize,
    pending: VecDeque<Diagnostic>,
    finished: bool,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Diagnostics<'a> {
    /// Call `progress` whenever analysis of a new package starts
    pub fn with_progress(mut self, progress: impl FnMut(&Package) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Collect everything, stopping at the first error
    pub fn collect_all(self) -> Result<Vec<Diagnostic>> {
        self.collect()
    }

    fn start_package(&mut self, package: &'a Package) {
        if let Some(progress) = self.progress.as_mut() {
            progress(package);
        }
        debug!("Analysing package '{}'", package.name);

        self.current = Some(package);
        self.next_rule = 0;
        if self.engine.include_validation {
            self.pending.extend(validation_diagnostics(package));
        }
    }

    /// Run the next rule on the current package. `Err` only under the
    /// abort policy.
    fn run_next_rule(&mut self, package: &'a Package) -> Result<()> {
        let rule = &mut self.rules[self.next_rule];
        self.next_rule += 1;

        match rule.check(Some(package)) {
            Ok(()) => {
                self.pending.extend(rule.take_results());
                Ok(())
            }
            Err(err) => {
                let err = match err {
                    IscopError::RuleFailed { .. } => err,
                    other => {
                        IscopError::rule_failed(rule.info().id, &package.name, other.to_string())
                    }
                };
                let partial = rule.take_results();
                match self.engine.policy {
                    RuleFailurePolicy::Abort => Err(err),
                    RuleFailurePolicy::Skip => {
                        warn!(
                            "Skipping rule {}: {} ({} partial results dropped)",
                            rule.info().id,
                            err,
                            partial.len()
                        );
                        Ok(())
                    }
                }
            }
        }
    }
}

impl Iterator for Diagnostics<'_> {
    type Item = Result<Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(diagnostic) = self.pending.pop_front() {
                return Some(Ok(diagnostic));
            }
            if self.finished {
                return None;
            }

            match self.current {
                Some(package) if self.next_rule < self.rules.len() => {
                    if let Err(err) = self.run_next_rule(package) {
                        self.finished = true;
                        return Some(Err(err));
                    }
                }
                _ => match self.packages.next() {
                    Some(item) => self.start_package(&item.package),
                    None => {
                        self.finished = true;
                        self.current = None;
                    }
                },
            }
        }
    }
}
