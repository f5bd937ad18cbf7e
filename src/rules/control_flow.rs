//! Rules over packages, variables and task properties

use super::{Rule, RuleInfo, RuleState};
use crate::core::control_flow::{all_tasks, collect_tasks};
use crate::error::Result;
use crate::models::tasks::ExecuteProcessTask;
use crate::models::{ForcedExecResult, Package, ProtectionLevel, Severity, Variable};

pub const PROTECTION_LEVEL: RuleInfo = RuleInfo {
    id: "BIDS0005",
    name: "PackageProtectionLevel",
    description: "Validates that the ProtectionLevel property is set to DontSaveSensitive or ServerStorage",
    severity: Severity::Warning,
};

pub const VARIABLE_EVALUATE_AS_EXPRESSION: RuleInfo = RuleInfo {
    id: "BIDS0006",
    name: "VariableEvaluateAsExpression",
    description: "Validates that any variable which has an expression set also has the EvaluateAsExpression property set to true.",
    severity: Severity::Warning,
};

pub const EXECUTE_PROCESS_LOGGING: RuleInfo = RuleInfo {
    id: "IS0006",
    name: "ExecuteProcessTaskLogging",
    description: "Every execute process task must log its output and error messages.",
    severity: Severity::Warning,
};

pub const TASK_PROPERTIES: RuleInfo = RuleInfo {
    id: "SSIS0004",
    name: "TaskProperties",
    description: "FailParentOnFailure and FailPackageOnFailure must be set to true, ForceExecutionResult must be set to None.",
    severity: Severity::Warning,
};

pub struct ProtectionLevelRule {
    state: RuleState,
}

impl ProtectionLevelRule {
    pub fn new() -> Self {
        Self {
            state: RuleState::new(PROTECTION_LEVEL),
        }
    }
}

impl Default for ProtectionLevelRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ProtectionLevelRule {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        if !matches!(
            package.protection_level,
            ProtectionLevel::DontSaveSensitive | ProtectionLevel::ServerStorage
        ) {
            let diagnostic = self.state.diagnostic(
                package,
                "Consider using ServerStorage for packages stored in SQL Server, or DontSaveSensitive with appropriately secured configurations, as it makes packages easier to deploy and share with other developers.",
            );
            self.state.push(diagnostic);
        }
        Ok(())
    }
}

/// Variables whose expression is never evaluated, at package and task scope
pub struct VariableEvaluateAsExpression {
    state: RuleState,
}

impl VariableEvaluateAsExpression {
    pub fn new() -> Self {
        Self {
            state: RuleState::new(VARIABLE_EVALUATE_AS_EXPRESSION),
        }
    }

    fn check_variables(&mut self, package: &Package, owner: &str, variables: &[Variable]) {
        for variable in variables.iter().filter(|v| v.has_ignored_expression()) {
            self.state.report(
                package,
                owner,
                format!(
                    "Variable \"{}\" has an Expression set, but the EvaluateAsExpression property is false. The variable value will be static and the expression will not be used. Consider removing the expression or setting EvaluateAsExpression to true.",
                    variable.name
                ),
            );
        }
    }
}

impl Default for VariableEvaluateAsExpression {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for VariableEvaluateAsExpression {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        self.check_variables(package, &package.name, &package.variables);
        for task in all_tasks(package) {
            self.check_variables(package, &task.name, &task.variables);
        }
        Ok(())
    }
}

pub struct ExecuteProcessLogging {
    state: RuleState,
}

impl ExecuteProcessLogging {
    pub fn new() -> Self {
        Self {
            state: RuleState::new(EXECUTE_PROCESS_LOGGING),
        }
    }
}

impl Default for ExecuteProcessLogging {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ExecuteProcessLogging {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        let description = self.state.info().description;
        for task in collect_tasks::<ExecuteProcessTask>(package) {
            if task.inner.is_unlogged() {
                self.state.report(
                    package,
                    task.name(),
                    format!(
                        "Task \"{}\" doesn't have StandardErrorVariable or StandardOutputVariable set. {}",
                        task.name(),
                        description
                    ),
                );
            }
        }
        Ok(())
    }
}

/// Failure propagation settings of every task
pub struct TaskProperties {
    state: RuleState,
}

impl TaskProperties {
    pub fn new() -> Self {
        Self {
            state: RuleState::new(TASK_PROPERTIES),
        }
    }
}

impl Default for TaskProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for TaskProperties {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        for task in all_tasks(package) {
            let properties = &task.properties;

            if properties.force_execution_result != ForcedExecResult::None {
                self.state.report(
                    package,
                    &task.name,
                    format!(
                        "Task {} should have ForceExecutionResult=None but it's {}",
                        task.name, properties.force_execution_result
                    ),
                );
            }
            if !properties.fail_package_on_failure {
                self.state.report(
                    package,
                    &task.name,
                    format!("Task {} should have FailPackageOnFailure set to true.", task.name),
                );
            }
            if !properties.fail_parent_on_failure {
                self.state.report(
                    package,
                    &task.name,
                    format!("Task {} should have FailParentOnFailure set to true.", task.name),
                );
            }
        }
        Ok(())
    }
}
