//! Rules over data-flow pipelines

use super::{Rule, RuleInfo, RuleState};
use crate::core::data_flow::{pipelines_of, PipelineGraph};
use crate::core::resolver::ComponentResolver;
use crate::error::Result;
use crate::models::component_info::names;
use crate::models::pipeline::property_names;
use crate::models::{Package, PropertyValue, Severity};
use std::sync::Arc;

pub const ASYNCHRONOUS_PATHS: RuleInfo = RuleInfo {
    id: "BIDS0001",
    name: "DataFlowAsynchronousPaths",
    description: "Checks for asynchronous paths in the data flow",
    severity: Severity::Warning,
};

pub const DATA_FLOW_COUNT: RuleInfo = RuleInfo {
    id: "BIDS0002",
    name: "DataFlowCount",
    description: "Checks for the number of data flows in the package",
    severity: Severity::Information,
};

pub const SORT_TRANSFORMATIONS: RuleInfo = RuleInfo {
    id: "BIDS0003",
    name: "DataFlowSortTransformations",
    description: "Checks for the number of sorts in the data flows, and whether they could be performed in a database",
    severity: Severity::Warning,
};

pub const ACCESS_MODE: RuleInfo = RuleInfo {
    id: "BIDS0004",
    name: "AccessMode",
    description: "Validates that sources and Lookup transformations are not set to use the 'Table or View' access mode, as it can be slower than specifying a SQL Statement",
    severity: Severity::Warning,
};

pub const FAST_LOAD_CHECK_CONSTRAINTS: RuleInfo = RuleInfo {
    id: "IS0108",
    name: "DataflowFastLoadCheckConstraints",
    description: "If the destination uses Fast Load, it must have Check constraints option set. Otherwise the constraints will become NOCHECK.",
    severity: Severity::Warning,
};

/// More pipelines than this in one package are reported
const MAX_PIPELINES: usize = 2;
/// More sorts than this in one pipeline are reported
const MAX_SORTS: usize = 2;

/// `AccessMode` values meaning "table or view"
const OPEN_ROWSET_MODES: [i64; 2] = [0, 1];
/// `AccessMode` values meaning fast load
const FAST_LOAD_MODES: [i64; 2] = [3, 4];
const CHECK_CONSTRAINTS: &str = "CHECK_CONSTRAINTS";

fn component_source(pipeline: &str, component: &str) -> String {
    format!("{}/{}", pipeline, component)
}

/// Counts paths that start an asynchronous output on a non-source component
pub struct AsynchronousPaths {
    state: RuleState,
    resolver: Arc<ComponentResolver>,
}

impl AsynchronousPaths {
    pub fn new(resolver: Arc<ComponentResolver>) -> Self {
        Self {
            state: RuleState::new(ASYNCHRONOUS_PATHS),
            resolver,
        }
    }
}

impl Rule for AsynchronousPaths {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        for task in pipelines_of(package) {
            let graph = PipelineGraph::from_task(&task);

            let count = graph
                .paths()
                .iter()
                .filter(|path| path.is_asynchronous())
                .filter_map(|path| graph.component(path.start.component))
                .filter_map(|component| self.resolver.resolve(component))
                .filter(|info| !info.is_source())
                .count();

            if count > 0 {
                self.state.report(
                    package,
                    graph.name(),
                    format!(
                        "There are {} asynchronous outputs in the {} data flow. Too many asynchronous outputs can adversely impact performance.",
                        count,
                        graph.name()
                    ),
                );
            }
        }
        Ok(())
    }
}

/// Reports packages holding many pipelines
pub struct DataFlowCount {
    state: RuleState,
}

impl DataFlowCount {
    pub fn new() -> Self {
        Self {
            state: RuleState::new(DATA_FLOW_COUNT),
        }
    }
}

impl Default for DataFlowCount {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for DataFlowCount {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        let count = pipelines_of(package).len();
        if count > MAX_PIPELINES {
            let diagnostic = self.state.diagnostic(
                package,
                format!(
                    "There are {} data flows in the package. For simplicity, encapsulation, and to facilitate team development, consider using only one data flow per package.",
                    count
                ),
            );
            self.state.push(diagnostic);
        }
        Ok(())
    }
}

/// Flags sorts fed by a relational source, and pipelines with many sorts
pub struct SortTransformations {
    state: RuleState,
    resolver: Arc<ComponentResolver>,
}

impl SortTransformations {
    pub fn new(resolver: Arc<ComponentResolver>) -> Self {
        Self {
            state: RuleState::new(SORT_TRANSFORMATIONS),
            resolver,
        }
    }
}

impl Rule for SortTransformations {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        for task in pipelines_of(package) {
            let graph = PipelineGraph::from_task(&task);
            let mut sorts = 0;

            for component in graph.components() {
                let is_sort = self
                    .resolver
                    .resolve(component)
                    .is_some_and(|info| info.name == names::SORT);
                if !is_sort {
                    continue;
                }
                sorts += 1;

                let Some(source) = graph.trace_to_source(component) else {
                    continue;
                };
                let from_database = self
                    .resolver
                    .resolve(source)
                    .is_some_and(|info| info.is_database_source());
                if from_database {
                    self.state.report(
                        package,
                        graph.name(),
                        format!(
                            "The {} Sort transformation is operating on data provided from the {} source. Rather than using the Sort transformation, which is fully blocking, the sorting should be performed using a WHERE clause in the source's SQL, and the IsSorted and SortKey properties should be set appropriately.",
                            component.name, source.name
                        ),
                    );
                }
            }

            if sorts > MAX_SORTS {
                self.state.report(
                    package,
                    graph.name(),
                    format!(
                        "There are {} Sort transfomations in the {} data flow. A large number of Sorts can slow down data flow performance. Consider staging the data to a relational database and sorting it there.",
                        sorts,
                        graph.name()
                    ),
                );
            }
        }
        Ok(())
    }
}

/// Sources and lookups reading a whole table or view
pub struct AccessMode {
    state: RuleState,
    resolver: Arc<ComponentResolver>,
}

impl AccessMode {
    pub fn new(resolver: Arc<ComponentResolver>) -> Self {
        Self {
            state: RuleState::new(ACCESS_MODE),
            resolver,
        }
    }
}

impl Rule for AccessMode {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        for task in pipelines_of(package) {
            for component in &task.inner.components {
                let applies = self.resolver.resolve(component).is_some_and(|info| {
                    matches!(
                        info.name.as_str(),
                        names::OLE_DB_SOURCE | names::ADO_NET_SOURCE | names::LOOKUP
                    )
                });
                if !applies {
                    continue;
                }

                let mode = component
                    .property(property_names::ACCESS_MODE)
                    .and_then(PropertyValue::as_i64);
                if mode.is_some_and(|mode| OPEN_ROWSET_MODES.contains(&mode)) {
                    self.state.report(
                        package,
                        &component_source(task.name(), &component.name),
                        format!(
                            "Change the {} component to use a SQL Command access mode, as this performs better than the OpenRowset access mode.",
                            component.name
                        ),
                    );
                }
            }
        }
        Ok(())
    }
}

/// Fast-load destinations that would disable constraints
pub struct FastLoadCheckConstraints {
    state: RuleState,
    resolver: Arc<ComponentResolver>,
}

impl FastLoadCheckConstraints {
    pub fn new(resolver: Arc<ComponentResolver>) -> Self {
        Self {
            state: RuleState::new(FAST_LOAD_CHECK_CONSTRAINTS),
            resolver,
        }
    }
}

impl Rule for FastLoadCheckConstraints {
    fn state(&self) -> &RuleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RuleState {
        &mut self.state
    }

    fn check_package(&mut self, package: &Package) -> Result<()> {
        for task in pipelines_of(package) {
            for component in &task.inner.components {
                let is_destination = self
                    .resolver
                    .resolve(component)
                    .is_some_and(|info| info.name == names::OLE_DB_DESTINATION);
                if !is_destination {
                    continue;
                }

                let fast_load = component
                    .property(property_names::ACCESS_MODE)
                    .and_then(PropertyValue::as_i64)
                    .is_some_and(|mode| FAST_LOAD_MODES.contains(&mode));
                if !fast_load {
                    continue;
                }

                let checks_constraints = component
                    .property(property_names::FAST_LOAD_OPTIONS)
                    .and_then(PropertyValue::as_str)
                    .is_some_and(|options| options.to_uppercase().contains(CHECK_CONSTRAINTS));
                if !checks_constraints {
                    let description = self.state.info().description;
                    self.state.report(
                        package,
                        &component_source(task.name(), &component.name),
                        format!(
                            "Destination component \"{}\" doesn't set {}. {}",
                            component.name, CHECK_CONSTRAINTS, description
                        ),
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pipeline::property_names::{ACCESS_MODE, FAST_LOAD_OPTIONS};
    use crate::models::Pipeline;
    use crate::rules::fixtures::*;

    fn resolver() -> Arc<ComponentResolver> {
        Arc::new(ComponentResolver::builtin())
    }

    fn run(rule: &mut dyn Rule, package: &Package) -> Vec<crate::models::Diagnostic> {
        rule.check(Some(package)).unwrap();
        rule.take_results()
    }

    #[test]
    fn test_asynchronous_paths() {
        // source -> sort (async) -> derived column (sync) -> destination
        let flow = pipeline(
            vec![
                native(1, "Read", "Microsoft.OLEDBSource"),
                native(2, "Sort rows", "Microsoft.Sort"),
                native(3, "Add columns", "Microsoft.DerivedColumn"),
                native(4, "Write", "Microsoft.OLEDBDestination"),
            ],
            vec![path(1, 2, 0), path(2, 3, 0), path(3, 4, 7)],
        );
        let package = package_with("Load.dtsx", vec![pipeline_task("DFT Load", flow)]);

        let results = run(&mut AsynchronousPaths::new(resolver()), &package);
        assert_eq!(results.len(), 1);
        assert!(results[0]
            .message
            .starts_with("There are 1 asynchronous outputs in the DFT Load data flow."));
        assert_eq!(results[0].source.as_deref(), Some("DFT Load"));
        assert_eq!(results[0].line, None);
    }

    #[test]
    fn test_no_asynchronous_paths() {
        let flow = pipeline(
            vec![
                native(1, "Read", "Microsoft.OLEDBSource"),
                native(2, "Write", "Microsoft.OLEDBDestination"),
            ],
            vec![path(1, 2, 0)],
        );
        let package = package_with("Load.dtsx", vec![pipeline_task("DFT Load", flow)]);
        assert!(run(&mut AsynchronousPaths::new(resolver()), &package).is_empty());
    }

    #[test]
    fn test_data_flow_count() {
        let tasks = |n: usize| {
            (0..n)
                .map(|i| pipeline_task(&format!("DFT {}", i), Pipeline::default()))
                .collect::<Vec<_>>()
        };

        let mut rule = DataFlowCount::new();
        assert!(run(&mut rule, &package_with("None.dtsx", tasks(0))).is_empty());
        assert!(run(&mut rule, &package_with("Two.dtsx", tasks(2))).is_empty());

        let results = run(&mut rule, &package_with("Three.dtsx", tasks(3)));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Information);
        assert!(results[0].message.starts_with("There are 3 data flows in the package."));
        assert_eq!(results[0].source, None);
    }

    #[test]
    fn test_sort_fed_by_database_source() {
        let flow = pipeline(
            vec![
                managed(1, "Read ADO", ADO_NET_SOURCE_TYPE),
                native(2, "Filter", "Microsoft.ConditionalSplit"),
                native(3, "Sort rows", "Microsoft.Sort"),
            ],
            vec![path(1, 2, 0), path(2, 3, 5)],
        );
        let package = package_with("Load.dtsx", vec![pipeline_task("DFT Load", flow)]);

        let results = run(&mut SortTransformations::new(resolver()), &package);
        assert_eq!(results.len(), 1);
        assert!(results[0]
            .message
            .starts_with(
                "The Sort rows Sort transformation is operating on data provided from the Read ADO source."
            ));
    }

    #[test]
    fn test_many_sorts() {
        let flow = pipeline(
            vec![
                native(1, "Read", "Microsoft.FlatFileSource"),
                native(2, "Sort A", "Microsoft.Sort"),
                native(3, "Sort B", "Microsoft.Sort"),
                native(4, "Sort C", "Microsoft.Sort"),
            ],
            vec![path(1, 2, 0), path(2, 3, 0), path(3, 4, 0)],
        );
        let package = package_with("Load.dtsx", vec![pipeline_task("DFT Load", flow)]);

        let results = run(&mut SortTransformations::new(resolver()), &package);
        assert_eq!(results.len(), 1);
        assert!(results[0]
            .message
            .starts_with("There are 3 Sort transfomations in the DFT Load data flow."));
    }

    #[test]
    fn test_sort_in_cycle_is_skipped() {
        let flow = pipeline(
            vec![
                native(1, "Sort A", "Microsoft.Sort"),
                native(2, "Derive", "Microsoft.DerivedColumn"),
            ],
            vec![path(1, 2, 3), path(2, 1, 4)],
        );
        let package = package_with("Loop.dtsx", vec![pipeline_task("DFT Loop", flow)]);
        assert!(run(&mut SortTransformations::new(resolver()), &package).is_empty());
    }

    #[test]
    fn test_access_mode() {
        let flow = pipeline(
            vec![
                native(1, "Read table", "Microsoft.OLEDBSource")
                    .with_property(ACCESS_MODE, PropertyValue::Integer(0)),
                native(2, "Read query", "Microsoft.OLEDBSource")
                    .with_property(ACCESS_MODE, PropertyValue::Integer(2)),
                native(3, "Match", "Microsoft.Lookup")
                    .with_property(ACCESS_MODE, PropertyValue::Integer(1)),
                native(4, "Unknown", "Vendor.Thing")
                    .with_property(ACCESS_MODE, PropertyValue::Integer(0)),
                native(5, "No mode", "Microsoft.Lookup"),
            ],
            Vec::new(),
        );
        let package = package_with("Load.dtsx", vec![pipeline_task("DFT Load", flow)]);

        let results = run(&mut AccessMode::new(resolver()), &package);
        let sources: Vec<_> = results.iter().filter_map(|r| r.source.as_deref()).collect();
        assert_eq!(sources, vec!["DFT Load/Read table", "DFT Load/Match"]);
        assert!(results[0].message.starts_with("Change the Read table component"));
    }

    #[test]
    fn test_fast_load_check_constraints() {
        let destination = |id, name: &str, mode, options: Option<&str>| {
            let component = native(id, name, "Microsoft.OLEDBDestination")
                .with_property(ACCESS_MODE, PropertyValue::Integer(mode));
            match options {
                Some(options) => component
                    .with_property(FAST_LOAD_OPTIONS, PropertyValue::Text(options.to_string())),
                None => component,
            }
        };
        let flow = pipeline(
            vec![
                destination(1, "Fast unchecked", 3, Some("TABLOCK")),
                destination(2, "Fast checked", 4, Some("tablock,check_constraints")),
                destination(3, "Row by row", 0, None),
                destination(4, "Fast no options", 3, None),
            ],
            Vec::new(),
        );
        let package = package_with("Load.dtsx", vec![pipeline_task("DFT Load", flow)]);

        let results = run(&mut FastLoadCheckConstraints::new(resolver()), &package);
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].message,
            "Destination component \"Fast unchecked\" doesn't set CHECK_CONSTRAINTS. If the destination uses Fast Load, it must have Check constraints option set. Otherwise the constraints will become NOCHECK."
        );
        assert_eq!(results[1].source.as_deref(), Some("DFT Load/Fast no options"));
    }
}
