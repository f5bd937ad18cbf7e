//! Rules over script tasks and script components
//!
//! Script sources are only analysed when their language tag is `CSharp`;
//! anything else is reported by the language rules and skipped here.

use super::{Rule, RuleInfo, RuleState};
use crate::analysis::ScriptAnalyzer;
use crate::core::control_flow::collect_tasks;
use crate::core::data_flow::pipelines_of;
use crate::core::resolver::ComponentResolver;
use crate::error::{IscopError, Result};
use crate::models::component_info::names;
use crate::models::pipeline::property_names;
use crate::models::tasks::{ScriptTask, CSHARP};
use crate::models::{Component, Diagnostic, Package, PropertyValue, Severity, Violation};
use crate::parsers::script::ScriptEncoding;
use log::warn;
use std::sync::Arc;

pub const DATAFLOW_SCRIPT_CSHARP: RuleInfo = RuleInfo {
    id: "IS0101",
    name: "DataflowScriptCSharp",
    description: "Every data flow script component must be written in C#.",
    severity: Severity::Warning,
};

pub const DATAFLOW_SCRIPT_ANALYSIS: RuleInfo = RuleInfo {
    id: "IS0102",
    name: "DataflowScriptAnalysis",
    description: "Analyses the error handling of C# data flow script components.",
    severity: Severity::Warning,
};

pub const SCRIPT_TASK_CSHARP: RuleInfo = RuleInfo {
    id: "SSIS0001",
    name: "ScriptTaskCSharp",
    description: "Every script task must be written in C#.",
    severity: Severity::Warning,
};

pub const SCRIPT_TASK_ANALYSIS: RuleInfo = RuleInfo {
    id: "SSIS0002",
    name: "ScriptTaskAnalysis",
    description: "Analyses the error handling of C# script tasks.",
    severity: Severity::Warning,
};

/// Entry file of a script task project
pub const SCRIPT_TASK_ENTRY_FILE: &str = "ScriptMain.cs";
/// Entry file of a script component project
pub const SCRIPT_COMPONENT_ENTRY_FILE: &str = "main.cs";

/// Language tag of a script component, if set
pub fn script_component_language(component: &Component) -> Option<&str> {
    component
        .property(property_names::SCRIPT_LANGUAGE)
        .and_then(PropertyValue::as_str)
}

/// Source and encoding of a script component's entry file.
///
/// `SourceCode` is a flat list of `name, encoding, data` triples.
pub fn script_component_source(component: &Component) -> Option<(&str, ScriptEncoding)> {
    let files = component
        .property(property_names::SOURCE_CODE)
        .and_then(PropertyValue::as_list)?;
    let index = files
        .iter()
        .position(|name| name == SCRIPT_COMPONENT_ENTRY_FILE)?;

    let encoding = files
        .get(index + 1)
        .map(|tag| ScriptEncoding::from_tag(tag))
        .unwrap_or_default();
    files.get(index + 2).map(|code| (code.as_str(), encoding))
}

/// Script components of every pipeline, with their pipeline name
fn script_components<'a>(
    package: &'a Package,
    resolver: &ComponentResolver,
) -> Vec<(&'a str, &'a Component)> {
    let mut found = Vec::new();
    for task in pipelines_of(package) {
        for component in &task.inner.components {
            let is_script = resolver
                .resolve(component)
                .is_some_and(|info| info.name == names::SCRIPT_COMPONENT);
            if is_script {
                found.push((task.name(), component));
            }
        }
    }
    found
}

/// Report each violation under its own check id and rule name
fn report_violations(
    state: &mut RuleState,
    package: &Package,
    source: &str,
    violations: Vec<Violation>,
) {
    let severity = state.info().severity;
    for violation in violations {
        state.push(
            Diagnostic::new(
                severity,
                &package.name,
                violation.check_id,
                violation.rule_name,
                violation.message,
            )
            .with_source(source)
            .with_line(violation.line),
        );
    }
}

fn analysis_failed(info: &RuleInfo, package: &Package, err: IscopError) -> IscopError {
    IscopError::rule_failed(info.id, &package.name, err.to_string())
}

pub struct DataflowScriptCSharp {
    state: RuleState,
    resolver: Arc<ComponentResolver>,
}

impl DataflowScriptCSharp {
    pub fn new(resolver: Arc<ComponentResolver>) -> Self {
        Self {
            state: RuleState::new(DATAFLOW_SCRIPT_CSHARP),
            resolver,
        }
    }
}

impl Rule for DataflowScriptCSharp {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        let description = self.state.info().description;
        for (pipeline, component) in script_components(package, &self.resolver) {
            let language = script_component_language(component).unwrap_or_default();
            if language != CSHARP {
                self.state.report(
                    package,
                    &format!("{}/{}", pipeline, component.name),
                    format!(
                        "Script component \"{}\" is written in {}. {}",
                        component.name, language, description
                    ),
                );
            }
        }
        Ok(())
    }
}

pub struct DataflowScriptAnalysis {
    state: RuleState,
    resolver: Arc<ComponentResolver>,
    analyzer: Arc<ScriptAnalyzer>,
}

impl DataflowScriptAnalysis {
    pub fn new(resolver: Arc<ComponentResolver>, analyzer: Arc<ScriptAnalyzer>) -> Self {
        Self {
            state: RuleState::new(DATAFLOW_SCRIPT_ANALYSIS),
            resolver,
            analyzer,
        }
    }
}

impl Rule for DataflowScriptAnalysis {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        for (pipeline, component) in script_components(package, &self.resolver) {
            if script_component_language(component) != Some(self.analyzer.language()) {
                continue;
            }
            let Some((code, encoding)) = script_component_source(component) else {
                warn!(
                    "Script component '{}' in '{}' has no {} source",
                    component.name, pipeline, SCRIPT_COMPONENT_ENTRY_FILE
                );
                continue;
            };

            let violations = self
                .analyzer
                .analyze(code, encoding)
                .map_err(|e| analysis_failed(self.state.info(), package, e))?;
            let source = format!("{}/{}", pipeline, component.name);
            report_violations(&mut self.state, package, &source, violations);
        }
        Ok(())
    }
}

pub struct ScriptTaskCSharp {
    state: RuleState,
}

impl ScriptTaskCSharp {
    pub fn new() -> Self {
        Self {
            state: RuleState::new(SCRIPT_TASK_CSHARP),
        }
    }
}

impl Default for ScriptTaskCSharp {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ScriptTaskCSharp {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        for task in collect_tasks::<ScriptTask>(package) {
            if !task.inner.is_csharp() {
                self.state.report(
                    package,
                    task.name(),
                    format!("Script task {} is written in {}.", task.name(), task.inner.language),
                );
            }
        }
        Ok(())
    }
}

pub struct ScriptTaskAnalysis {
    state: RuleState,
    analyzer: Arc<ScriptAnalyzer>,
}

impl ScriptTaskAnalysis {
    pub fn new(analyzer: Arc<ScriptAnalyzer>) -> Self {
        Self {
            state: RuleState::new(SCRIPT_TASK_ANALYSIS),
            analyzer,
        }
    }
}

impl Rule for ScriptTaskAnalysis {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        for task in collect_tasks::<ScriptTask>(package) {
            if task.inner.language != self.analyzer.language() {
                continue;
            }
            let Some(code) = task.inner.file(SCRIPT_TASK_ENTRY_FILE) else {
                warn!(
                    "Script task '{}' has no {} file",
                    task.name(),
                    SCRIPT_TASK_ENTRY_FILE
                );
                continue;
            };

            let violations = self
                .analyzer
                .analyze(code, ScriptEncoding::Utf8)
                .map_err(|e| analysis_failed(self.state.info(), package, e))?;
            let source = format!("{} ({})", task.inner.project_name, task.name());
            report_violations(&mut self.state, package, &source, violations);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::error_handling::{MAIN_CHECK_ID, MAIN_RULE_NAME};
    use crate::parsers::patterns::PatternSettings;
    use crate::rules::fixtures::*;

    const UNGUARDED_TASK: &str = "public partial class ScriptMain\n{\n    public void Main()\n    {\n        Run();\n    }\n}\n";

    const UNGUARDED_COMPONENT: &str = "public class ScriptMain : UserComponent\n{\n    public override void Input0_ProcessInputRow(Input0Buffer Row)\n    {\n        Row.Total = Row.A + Row.B;\n    }\n}\n";

    fn analyzer() -> Arc<ScriptAnalyzer> {
        Arc::new(ScriptAnalyzer::csharp(&PatternSettings::builtin(), 4).unwrap())
    }

    fn resolver() -> Arc<ComponentResolver> {
        Arc::new(ComponentResolver::builtin())
    }

    fn run(rule: &mut dyn Rule, package: &Package) -> Vec<Diagnostic> {
        rule.check(Some(package)).unwrap();
        rule.take_results()
    }

    fn script_flow() -> Package {
        let flow = pipeline(
            vec![
                script_component(1, "SC Transform", CSHARP, UNGUARDED_COMPONENT),
                script_component(2, "SC Legacy", "VisualBasic", "Public Class ScriptMain\nEnd Class"),
            ],
            Vec::new(),
        );
        package_with("Load.dtsx", vec![pipeline_task("DFT Load", flow)])
    }

    #[test]
    fn test_script_component_source() {
        let component = script_component(1, "SC", CSHARP, "class A {}");
        let (code, encoding) = script_component_source(&component).unwrap();
        assert_eq!(code, "class A {}");
        assert_eq!(encoding, ScriptEncoding::Utf8);

        let bare = managed(2, "SC", SCRIPT_COMPONENT_TYPE);
        assert!(script_component_source(&bare).is_none());
    }

    #[test]
    fn test_script_task_language() {
        let package = package_with(
            "Load.dtsx",
            vec![
                script_task("ST CSharp", CSHARP, UNGUARDED_TASK),
                script_task("ST VB", "VisualBasic", "Public Class ScriptMain\nEnd Class"),
            ],
        );
        let results = run(&mut ScriptTaskCSharp::new(), &package);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].message, "Script task ST VB is written in VisualBasic.");
        assert_eq!(results[0].source.as_deref(), Some("ST VB"));
    }

    #[test]
    fn test_script_task_analysis() {
        let package = package_with(
            "Load.dtsx",
            vec![
                script_task("ST CSharp", CSHARP, UNGUARDED_TASK),
                script_task("ST VB", "VisualBasic", "Public Class ScriptMain\nEnd Class"),
            ],
        );
        let results = run(&mut ScriptTaskAnalysis::new(analyzer()), &package);
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result.rule_id, MAIN_CHECK_ID);
        assert_eq!(result.rule_name.as_deref(), Some(MAIN_RULE_NAME));
        assert_eq!(result.source.as_deref(), Some("ST_1 (ST CSharp)"));
        assert_eq!(result.line, Some(3));
        assert_eq!(result.package, "Load.dtsx");
    }

    #[test]
    fn test_script_task_without_entry_file() {
        let mut host = script_task("ST Empty", CSHARP, "");
        if let crate::models::TaskObject::Script(script) = &mut host.task {
            script.files.clear();
        }
        let package = package_with("Load.dtsx", vec![host]);
        assert!(run(&mut ScriptTaskAnalysis::new(analyzer()), &package).is_empty());
    }

    #[test]
    fn test_script_component_language() {
        let results = run(&mut DataflowScriptCSharp::new(resolver()), &script_flow());
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].message,
            "Script component \"SC Legacy\" is written in VisualBasic. Every data flow script component must be written in C#."
        );
        assert_eq!(results[0].source.as_deref(), Some("DFT Load/SC Legacy"));
    }

    #[test]
    fn test_script_component_analysis() {
        let results = run(
            &mut DataflowScriptAnalysis::new(resolver(), analyzer()),
            &script_flow(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rule_id, "IS1002");
        assert_eq!(results[0].source.as_deref(), Some("DFT Load/SC Transform"));
        assert_eq!(results[0].line, Some(3));
    }
}
