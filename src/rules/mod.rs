//! Rule framework
//!
//! Every rule owns an accumulator of diagnostics. The engine calls
//! [`Rule::check`] once per package and drains the accumulator with
//! [`Rule::take_results`] afterwards.

pub mod control_flow;
pub mod data_flow;
pub mod scripts;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::analysis::ScriptAnalyzer;
use crate::core::resolver::ComponentResolver;
use crate::error::Result;
use crate::models::{Diagnostic, Package, Severity};
use std::sync::Arc;

/// Immutable identity of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
}

/// Identity plus the diagnostics found so far
#[derive(Debug, Clone)]
pub struct RuleState {
    info: RuleInfo,
    results: Vec<Diagnostic>,
}

impl RuleState {
    pub fn new(info: RuleInfo) -> Self {
        Self {
            info,
            results: Vec::new(),
        }
    }

    pub fn info(&self) -> &RuleInfo {
        &self.info
    }

    /// Diagnostic carrying this rule's id, name and severity
    pub fn diagnostic(&self, package: &Package, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(
            self.info.severity,
            &package.name,
            self.info.id,
            self.info.name,
            message,
        )
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.results.push(diagnostic);
    }

    /// Push a diagnostic located at `source`
    pub fn report(&mut self, package: &Package, source: &str, message: impl Into<String>) {
        let diagnostic = self.diagnostic(package, message).with_source(source);
        self.push(diagnostic);
    }

    pub fn results(&self) -> &[Diagnostic] {
        &self.results
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.results)
    }
}

/// A single best-practice check over one package
pub trait Rule: Send {
    fn state(&self) -> &RuleState;

    fn state_mut(&mut self) -> &mut RuleState;

    /// Inspect one package, appending findings to the accumulator.
    /// Must not modify the package.
    fn check_package(&mut self, package: &Package) -> Result<()>;

    fn info(&self) -> &RuleInfo {
        self.state().info()
    }

    /// A missing package is a no-op
    fn check(&mut self, package: Option<&Package>) -> Result<()> {
        match package {
            Some(package) => self.check_package(package),
            None => Ok(()),
        }
    }

    fn take_results(&mut self) -> Vec<Diagnostic> {
        self.state_mut().take()
    }
}

/// Shared collaborators handed to rules that need them
#[derive(Debug, Clone)]
pub struct RuleContext {
    pub resolver: Arc<ComponentResolver>,
    pub scripts: Arc<ScriptAnalyzer>,
}

impl RuleContext {
    pub fn new(resolver: Arc<ComponentResolver>, scripts: Arc<ScriptAnalyzer>) -> Self {
        Self { resolver, scripts }
    }
}

/// The fixed rule list, sorted by id
pub fn rule_set(ctx: &RuleContext) -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = vec![
        Box::new(data_flow::AsynchronousPaths::new(ctx.resolver.clone())),
        Box::new(data_flow::DataFlowCount::new()),
        Box::new(data_flow::SortTransformations::new(ctx.resolver.clone())),
        Box::new(data_flow::AccessMode::new(ctx.resolver.clone())),
        Box::new(control_flow::ProtectionLevelRule::new()),
        Box::new(control_flow::VariableEvaluateAsExpression::new()),
        Box::new(control_flow::ExecuteProcessLogging::new()),
        Box::new(scripts::DataflowScriptCSharp::new(ctx.resolver.clone())),
        Box::new(scripts::DataflowScriptAnalysis::new(
            ctx.resolver.clone(),
            ctx.scripts.clone(),
        )),
        Box::new(data_flow::FastLoadCheckConstraints::new(ctx.resolver.clone())),
        Box::new(scripts::ScriptTaskCSharp::new()),
        Box::new(scripts::ScriptTaskAnalysis::new(ctx.scripts.clone())),
        Box::new(control_flow::TaskProperties::new()),
    ];
    rules.sort_by_key(|rule| rule.info().id);
    rules
}

/// Identity of every rule, in execution order
pub fn catalogue() -> Vec<RuleInfo> {
    let mut infos = vec![
        data_flow::ASYNCHRONOUS_PATHS,
        data_flow::DATA_FLOW_COUNT,
        data_flow::SORT_TRANSFORMATIONS,
        data_flow::ACCESS_MODE,
        data_flow::FAST_LOAD_CHECK_CONSTRAINTS,
        control_flow::PROTECTION_LEVEL,
        control_flow::VARIABLE_EVALUATE_AS_EXPRESSION,
        control_flow::EXECUTE_PROCESS_LOGGING,
        control_flow::TASK_PROPERTIES,
        scripts::DATAFLOW_SCRIPT_CSHARP,
        scripts::DATAFLOW_SCRIPT_ANALYSIS,
        scripts::SCRIPT_TASK_CSHARP,
        scripts::SCRIPT_TASK_ANALYSIS,
    ];
    infos.sort_by_key(|info| info.id);
    infos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::patterns::PatternSettings;

    fn context() -> RuleContext {
        RuleContext::new(
            Arc::new(ComponentResolver::builtin()),
            Arc::new(ScriptAnalyzer::csharp(&PatternSettings::builtin(), 4).unwrap()),
        )
    }

    #[test]
    fn test_rule_set_is_sorted_and_complete() {
        let rules = rule_set(&context());
        let ids: Vec<&str> = rules.iter().map(|rule| rule.info().id).collect();
        assert_eq!(
            ids,
            vec![
                "BIDS0001", "BIDS0002", "BIDS0003", "BIDS0004", "BIDS0005", "BIDS0006",
                "IS0006", "IS0101", "IS0102", "IS0108", "SSIS0001", "SSIS0002", "SSIS0004",
            ]
        );

        let catalogue_ids: Vec<&str> = catalogue().iter().map(|info| info.id).collect();
        assert_eq!(ids, catalogue_ids);
    }

    #[test]
    fn test_missing_package_is_a_no_op() {
        for mut rule in rule_set(&context()) {
            rule.check(None).unwrap();
            assert!(rule.take_results().is_empty(), "{}", rule.info().id);
        }
    }

    #[test]
    fn test_take_results_drains() {
        let mut state = RuleState::new(data_flow::DATA_FLOW_COUNT);
        let package = Package::new("Load.dtsx");
        state.report(&package, "Load.dtsx", "message");

        assert_eq!(state.results().len(), 1);
        let taken = state.take();
        assert_eq!(taken[0].rule_id, "BIDS0002");
        assert_eq!(taken[0].severity, Severity::Information);
        assert!(state.results().is_empty());
    }
}
