//! Control-flow graph walker
//!
//! Enumerates the tasks reachable from a package (or any other sequence)
//! in a fixed order: a node's event handlers first, then its executables,
//! depth-first and pre-order. Containers are walked into but never returned.

use crate::models::pipeline::Pipeline;
use crate::models::tasks::{ExecuteProcessTask, ScriptTask};
use crate::models::{EventHandler, Executable, Sequence, TaskHost, TaskObject};

/// Kind of inner task object the walker can filter on
pub trait TaskKind {
    fn from_task(task: &TaskObject) -> Option<&Self>;
}

impl TaskKind for Pipeline {
    fn from_task(task: &TaskObject) -> Option<&Self> {
        match task {
            TaskObject::Pipeline(pipeline) => Some(pipeline),
            _ => None,
        }
    }
}

impl TaskKind for ScriptTask {
    fn from_task(task: &TaskObject) -> Option<&Self> {
        match task {
            TaskObject::Script(script) => Some(script),
            _ => None,
        }
    }
}

impl TaskKind for ExecuteProcessTask {
    fn from_task(task: &TaskObject) -> Option<&Self> {
        match task {
            TaskObject::ExecuteProcess(process) => Some(process),
            _ => None,
        }
    }
}

/// Matches every task
impl TaskKind for TaskObject {
    fn from_task(task: &TaskObject) -> Option<&Self> {
        Some(task)
    }
}

/// A task host together with its inner object viewed as `K`
#[derive(Debug)]
pub struct TaskRef<'a, K> {
    pub host: &'a TaskHost,
    pub inner: &'a K,
}

impl<K> Clone for TaskRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for TaskRef<'_, K> {}

impl<'a, K> TaskRef<'a, K> {
    pub fn name(&self) -> &'a str {
        &self.host.name
    }
}

enum Frame<'a> {
    Sequence(&'a dyn Sequence),
    Task(&'a TaskHost),
    Leaf(&'a TaskHost),
}

/// Push frames so that `handlers` pop before `children`, both in order
fn push_frames<'a>(
    stack: &mut Vec<Frame<'a>>,
    handlers: &'a [EventHandler],
    children: impl DoubleEndedIterator<Item = Frame<'a>>,
) {
    stack.extend(children.rev());
    stack.extend(
        handlers
            .iter()
            .rev()
            .map(|handler| Frame::Sequence(handler as &dyn Sequence)),
    );
}

/// Every task under `root` whose inner object is of kind `K`
pub fn collect_tasks<'a, K: TaskKind>(root: &'a dyn Sequence) -> Vec<TaskRef<'a, K>> {
    let mut found = Vec::new();
    let mut stack = vec![Frame::Sequence(root)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Sequence(sequence) => {
                let children = sequence.executables().iter().map(|executable| match executable {
                    Executable::Container(container) => Frame::Sequence(container as &dyn Sequence),
                    Executable::Task(task) => Frame::Task(task),
                });
                push_frames(&mut stack, sequence.event_handlers(), children);
            }
            Frame::Task(task) => {
                push_frames(&mut stack, &task.event_handlers, std::iter::once(Frame::Leaf(task)));
            }
            Frame::Leaf(task) => {
                if let Some(inner) = K::from_task(&task.task) {
                    found.push(TaskRef { host: task, inner });
                }
            }
        }
    }

    log::debug!("Collected {} tasks under '{}'", found.len(), root.name());
    found
}

/// Every task under `root`, regardless of kind
pub fn all_tasks(root: &dyn Sequence) -> Vec<&TaskHost> {
    collect_tasks::<TaskObject>(root)
        .into_iter()
        .map(|task| task.host)
        .collect()
}
