//! Project files shared by the integration tests

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Script task entry point without any error handling; `Main` is on line 3
pub const UNGUARDED_MAIN: &str =
    "public partial class ScriptMain\n{\n    public void Main()\n    {\n        Dts.TaskResult = 0;\n    }\n}\n";

/// Entry point whose catch block contains both required patterns
pub const GUARDED_MAIN: &str = r#"public partial class ScriptMain
{
    public void Main()
    {
        try
        {
            Run();
        }
        catch (Exception ex)
        {
            Dts.Events.FireError(0, "Load", ex.Message + ex.StackTrace, string.Empty, 0);
            Dts.TaskResult = (int)ScriptResults.Failure;
        }
    }
}
"#;

fn properties() -> Value {
    json!({ "fail_package_on_failure": true, "fail_parent_on_failure": true })
}

/// Package with an open-rowset source, an unlogged process task and an
/// unguarded script task
pub fn load_package(main: &str) -> Value {
    json!({
        "name": "Load",
        "protection_level": "DontSaveSensitive",
        "executables": [
            {
                "type": "task",
                "name": "DFT Load",
                "properties": properties(),
                "task": {
                    "kind": "pipeline",
                    "components": [
                        {
                            "id": 1,
                            "name": "OLE DB Source",
                            "class_id": "Microsoft.OLEDBSource",
                            "custom_properties": { "AccessMode": 0 }
                        },
                        { "id": 2, "name": "OLE DB Destination", "class_id": "Microsoft.OLEDBDestination" }
                    ],
                    "paths": [
                        { "start": { "component": 1, "synchronous_input_id": 0 }, "end": { "component": 2 } }
                    ]
                }
            },
            {
                "type": "container",
                "name": "SEQ Work",
                "executables": [
                    {
                        "type": "task",
                        "name": "EPT Unzip",
                        "properties": properties(),
                        "task": { "kind": "execute_process", "executable": "7z.exe" }
                    },
                    {
                        "type": "task",
                        "name": "ST Main",
                        "properties": properties(),
                        "task": {
                            "kind": "script",
                            "language": "CSharp",
                            "project_name": "ST_Load",
                            "files": { "ScriptMain.cs": main }
                        }
                    }
                ]
            }
        ]
    })
}

/// Package with a user-key protection level, an ignored variable
/// expression and one stored validation error
pub fn extract_package() -> Value {
    json!({
        "name": "Extract",
        "protection_level": "EncryptSensitiveWithUserKey",
        "variables": [
            { "name": "Folder", "expression": "@[User::Root] + \"\\\\in\"", "evaluate_as_expression": false }
        ],
        "validation": {
            "errors": [
                { "code": -1073450985, "source": "Extract", "description": "Connection manager not found" }
            ]
        }
    })
}

pub fn project(name: &str, main: &str) -> Value {
    json!({
        "name": name,
        "packages": [
            { "stream_name": "Load.dtsx", "package": load_package(main) },
            { "stream_name": "Extract.dtsx", "package": extract_package() }
        ]
    })
}

/// A project with nothing to report
pub fn clean_project(name: &str) -> Value {
    json!({
        "name": name,
        "packages": [
            {
                "stream_name": "Clean.dtsx",
                "package": { "name": "Clean", "protection_level": "ServerStorage" }
            }
        ]
    })
}

pub fn write_json(dir: &Path, file: &str, value: &Value) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}
