//! Data-flow graph walker
//!
//! Builds a directed graph over a pipeline's components and paths, and
//! traces a component back to the upstream component that introduces its
//! rows.

use super::control_flow::{collect_tasks, TaskRef};
use crate::error::{handle_error, IscopError, Result};
use crate::models::{Component, DataPath, Package, Pipeline};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Pipeline-hosting tasks of a package, in walker order
pub fn pipelines_of(package: &Package) -> Vec<TaskRef<'_, Pipeline>> {
    collect_tasks::<Pipeline>(package)
}

/// Directed graph view of one pipeline
pub struct PipelineGraph<'a> {
    name: &'a str,
    pipeline: &'a Pipeline,
    graph: DiGraph<u32, &'a DataPath>,
    nodes: HashMap<u32, NodeIndex>,
}

impl<'a> PipelineGraph<'a> {
    pub fn new(name: &'a str, pipeline: &'a Pipeline) -> Self {
        let mut graph = DiGraph::with_capacity(pipeline.components.len(), pipeline.paths.len());
        let mut nodes = HashMap::new();

        for component in &pipeline.components {
            nodes
                .entry(component.id)
                .or_insert_with(|| graph.add_node(component.id));
        }
        for path in &pipeline.paths {
            // endpoints naming unknown components still get a node; tracing
            // through them ends in "not found"
            let start = *nodes
                .entry(path.start.component)
                .or_insert_with(|| graph.add_node(path.start.component));
            let end = *nodes
                .entry(path.end.component)
                .or_insert_with(|| graph.add_node(path.end.component));
            graph.add_edge(start, end, path);
        }

        Self {
            name,
            pipeline,
            graph,
            nodes,
        }
    }

    /// Graph over the pipeline hosted by `task`
    pub fn from_task(task: &TaskRef<'a, Pipeline>) -> Self {
        Self::new(task.name(), task.inner)
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn components(&self) -> &'a [Component] {
        &self.pipeline.components
    }

    pub fn paths(&self) -> &'a [DataPath] {
        &self.pipeline.paths
    }

    pub fn component(&self, id: u32) -> Option<&'a Component> {
        self.pipeline.component(id)
    }

    /// The path ending at `component`, first in path order
    pub fn path_into(&self, component: u32) -> Option<&'a DataPath> {
        let node = *self.nodes.get(&component)?;
        self.graph
            .edges_directed(node, Direction::Incoming)
            .min_by_key(|edge| edge.id().index())
            .map(|edge| *edge.weight())
    }

    /// Trace `component` back to its source, or report why it can't be
    pub fn try_trace_to_source(&self, component: &Component) -> Result<&'a Component> {
        let mut current = component.id;
        let mut visited = HashSet::new();

        loop {
            if !visited.insert(current) {
                return Err(IscopError::malformed_graph(
                    self.name,
                    format!("path cycle while tracing '{}' back to its source", component.name),
                ));
            }

            let Some(path) = self.path_into(current) else {
                // nothing flows in, so this component is the source
                return self.existing(current);
            };

            if path.start.synchronous_input_id == 0 {
                return self.existing(path.start.component);
            }
            current = path.start.component;
        }
    }

    /// Trace `component` back to its source; malformed graphs are logged
    /// and yield `None`
    pub fn trace_to_source(&self, component: &Component) -> Option<&'a Component> {
        match self.try_trace_to_source(component) {
            Ok(source) => Some(source),
            Err(err) => {
                handle_error(err);
                None
            }
        }
    }

    fn existing(&self, id: u32) -> Result<&'a Component> {
        self.component(id).ok_or_else(|| {
            IscopError::malformed_graph(
                self.name,
                format!("path endpoint names unknown component {}", id),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pipeline::{InputEndpoint, OutputEndpoint};
    use crate::models::{Executable, ExecutionProperties, TaskHost, TaskObject};

    fn path(from: u32, sync: u32, to: u32) -> DataPath {
        DataPath {
            name: format!("{} -> {}", from, to),
            start: OutputEndpoint {
                component: from,
                synchronous_input_id: sync,
            },
            end: InputEndpoint { component: to },
        }
    }

    fn pipeline(ids: &[u32], paths: Vec<DataPath>) -> Pipeline {
        Pipeline {
            components: ids
                .iter()
                .map(|id| Component::new(*id, format!("C{}", id), "Microsoft.DerivedColumn"))
                .collect(),
            paths,
        }
    }

    #[test]
    fn test_source_traces_to_itself() {
        let pipe = pipeline(&[1, 2], vec![path(1, 0, 2)]);
        let graph = PipelineGraph::new("DFT", &pipe);
        let source = pipe.component(1).unwrap();
        assert_eq!(graph.trace_to_source(source).map(|c| c.id), Some(1));
    }

    #[test]
    fn test_asynchronous_start_is_source() {
        let pipe = pipeline(&[1, 2], vec![path(1, 0, 2)]);
        let graph = PipelineGraph::new("DFT", &pipe);
        let target = pipe.component(2).unwrap();
        assert_eq!(graph.trace_to_source(target).map(|c| c.id), Some(1));
    }

    #[test]
    fn test_synchronous_chain() {
        // 1 -> 2 -> 3 -> 4 -> 5 where 2..4 are synchronous with their input
        let pipe = pipeline(
            &[1, 2, 3, 4, 5],
            vec![path(1, 0, 2), path(2, 11, 3), path(3, 12, 4), path(4, 13, 5)],
        );
        let graph = PipelineGraph::new("DFT", &pipe);
        let last = pipe.component(5).unwrap();
        assert_eq!(graph.trace_to_source(last).map(|c| c.id), Some(1));
    }

    #[test]
    fn test_cycle_is_not_found() {
        let pipe = pipeline(&[1, 2, 3], vec![path(1, 5, 2), path(2, 6, 3), path(3, 7, 1)]);
        let graph = PipelineGraph::new("DFT", &pipe);
        let target = pipe.component(3).unwrap();

        assert!(graph.trace_to_source(target).is_none());
        assert!(matches!(
            graph.try_trace_to_source(target),
            Err(IscopError::MalformedGraph { .. })
        ));
    }

    #[test]
    fn test_dangling_endpoint_is_not_found() {
        let pipe = pipeline(&[2], vec![path(99, 0, 2)]);
        let graph = PipelineGraph::new("DFT", &pipe);
        let target = pipe.component(2).unwrap();
        assert!(graph.trace_to_source(target).is_none());
    }

    #[test]
    fn test_path_into_uses_path_order() {
        let pipe = pipeline(&[1, 2, 3], vec![path(1, 0, 3), path(2, 0, 3)]);
        let graph = PipelineGraph::new("DFT", &pipe);
        assert_eq!(graph.path_into(3).map(|p| p.start.component), Some(1));
        assert!(graph.path_into(1).is_none());
        assert!(graph.path_into(42).is_none());
    }

    #[test]
    fn test_pipelines_of() {
        let mut package = Package::new("P");
        package.executables = vec![Executable::Task(TaskHost {
            name: "DFT Load".to_string(),
            properties: ExecutionProperties::default(),
            variables: Vec::new(),
            event_handlers: Vec::new(),
            task: TaskObject::Pipeline(pipeline(&[1], Vec::new())),
        })];

        let pipes = pipelines_of(&package);
        assert_eq!(pipes.len(), 1);
        let graph = PipelineGraph::from_task(&pipes[0]);
        assert_eq!(graph.name(), "DFT Load");
        assert_eq!(graph.components().len(), 1);
    }
}
