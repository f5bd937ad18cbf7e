//! Package builders shared by rule and engine tests

use crate::models::pipeline::{
    property_names, InputEndpoint, OutputEndpoint, MANAGED_COMPONENT_WRAPPER,
    USER_COMPONENT_TYPE_NAME,
};
use crate::models::tasks::{ExecuteProcessTask, ScriptTask};
use crate::models::{
    Component, DataPath, Executable, ExecutionProperties, Package, Pipeline, PropertyValue,
    TaskHost, TaskObject,
};

pub const SCRIPT_COMPONENT_TYPE: &str = "Microsoft.SqlServer.Dts.Pipeline.ScriptComponentHost";
pub const ADO_NET_SOURCE_TYPE: &str = "Microsoft.SqlServer.Dts.Pipeline.DataReaderSourceAdapter";

/// Task with properties that satisfy the task property rule
pub fn task(name: &str, task: TaskObject) -> TaskHost {
    TaskHost {
        name: name.to_string(),
        properties: ExecutionProperties {
            fail_package_on_failure: true,
            fail_parent_on_failure: true,
            ..Default::default()
        },
        variables: Vec::new(),
        event_handlers: Vec::new(),
        task,
    }
}

pub fn package_with(name: &str, tasks: Vec<TaskHost>) -> Package {
    let mut package = Package::new(name);
    package.executables = tasks.into_iter().map(Executable::Task).collect();
    package
}

pub fn pipeline_task(name: &str, pipeline: Pipeline) -> TaskHost {
    task(name, TaskObject::Pipeline(pipeline))
}

pub fn script_task(name: &str, language: &str, main: &str) -> TaskHost {
    let mut script = ScriptTask {
        language: language.to_string(),
        project_name: "ST_1".to_string(),
        files: Default::default(),
    };
    script.files.insert("ScriptMain.cs".to_string(), main.to_string());
    task(name, TaskObject::Script(script))
}

pub fn process_task(name: &str, output: Option<&str>, error: Option<&str>) -> TaskHost {
    task(
        name,
        TaskObject::ExecuteProcess(ExecuteProcessTask {
            executable: "cmd.exe".to_string(),
            arguments: String::new(),
            standard_output_variable: output.map(str::to_string),
            standard_error_variable: error.map(str::to_string),
        }),
    )
}

pub fn native(id: u32, name: &str, class_id: &str) -> Component {
    Component::new(id, name, class_id)
}

pub fn managed(id: u32, name: &str, type_name: &str) -> Component {
    Component::new(id, name, MANAGED_COMPONENT_WRAPPER).with_property(
        USER_COMPONENT_TYPE_NAME,
        PropertyValue::Text(type_name.to_string()),
    )
}

pub fn script_component(id: u32, name: &str, language: &str, main: &str) -> Component {
    managed(id, name, SCRIPT_COMPONENT_TYPE)
        .with_property(
            property_names::SCRIPT_LANGUAGE,
            PropertyValue::Text(language.to_string()),
        )
        .with_property(
            property_names::SOURCE_CODE,
            PropertyValue::List(vec![
                "ComponentWrapper.cs".to_string(),
                "UTF8".to_string(),
                "// generated wrapper".to_string(),
                "main.cs".to_string(),
                "UTF8".to_string(),
                main.to_string(),
            ]),
        )
}

/// Path `start -> end`; `sync` is the start output's synchronous input id
pub fn path(start: u32, end: u32, sync: u32) -> DataPath {
    DataPath {
        name: format!("{} -> {}", start, end),
        start: OutputEndpoint {
            component: start,
            synchronous_input_id: sync,
        },
        end: InputEndpoint { component: end },
    }
}

pub fn pipeline(components: Vec<Component>, paths: Vec<DataPath>) -> Pipeline {
    Pipeline { components, paths }
}
