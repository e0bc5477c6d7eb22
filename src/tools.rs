use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::settings::{ApiSettings, FeatureToggles};

pub const MANAGE_MEMORY: &str = "manage_memory";
pub const READ_PAGE: &str = "read_page";

/// OpenAI-compatible tool definition as sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

struct ExclusionRule {
    tool_name: &'static str,
    enabled: fn(&FeatureToggles) -> bool,
}

const EXCLUSION_RULES: [ExclusionRule; 2] = [
    ExclusionRule {
        tool_name: MANAGE_MEMORY,
        enabled: memory_enabled,
    },
    ExclusionRule {
        tool_name: READ_PAGE,
        enabled: page_reader_enabled,
    },
];

fn memory_enabled(toggles: &FeatureToggles) -> bool {
    toggles.memory
}

fn page_reader_enabled(toggles: &FeatureToggles) -> bool {
    toggles.page_reader
}

static CATALOG: LazyLock<Vec<ToolDefinition>> = LazyLock::new(build_catalog);

/// Every tool the assistant knows about, regardless of settings.
pub fn all_tools() -> &'static [ToolDefinition] {
    &CATALOG
}

/// Tools to expose to the model for the given settings snapshot.
pub fn active_tools(settings: Option<&ApiSettings>) -> Vec<&'static ToolDefinition> {
    let toggles = FeatureToggles::from_settings(settings);
    tracing::debug!(
        enable_memory = toggles.memory,
        enable_zai_reader = toggles.page_reader,
        "resolving tool set"
    );
    let tools = resolve_tools(all_tools(), &toggles);
    tracing::debug!(active = %tool_names(&tools).join(", "), "active tools");
    tools
}

/// Filters `catalog` by the exclusion rules, keeping catalog order.
pub fn resolve_tools<'a>(
    catalog: &'a [ToolDefinition],
    toggles: &FeatureToggles,
) -> Vec<&'a ToolDefinition> {
    catalog
        .iter()
        .filter(|tool| {
            EXCLUSION_RULES
                .iter()
                .all(|rule| rule.tool_name != tool.name() || (rule.enabled)(toggles))
        })
        .collect()
}

pub fn tool_names<'a>(tools: &[&'a ToolDefinition]) -> Vec<&'a str> {
    tools.iter().map(|&tool| tool.name()).collect()
}

fn function_tool(name: &str, description: &str, parameters: Value) -> ToolDefinition {
    ToolDefinition {
        kind: "function".to_string(),
        function: FunctionDefinition {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        },
    }
}

fn build_catalog() -> Vec<ToolDefinition> {
    vec![
        function_tool(
            "run_command",
            "Execute a shell command in the workspace and return its output.",
            json!({
                "type": "object",
                "properties": {
                    "command": { "type": "string", "description": "Command line to run" },
                    "cwd": { "type": "string", "description": "Working directory, relative to the workspace" }
                },
                "required": ["command"]
            }),
        ),
        function_tool(
            "read_file",
            "Read the contents of a file.",
            json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "File path" }
                },
                "required": ["path"]
            }),
        ),
        function_tool(
            "write_file",
            "Create or overwrite a file with the given content.",
            json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "File path" },
                    "content": { "type": "string", "description": "Full file content" }
                },
                "required": ["path", "content"]
            }),
        ),
        function_tool(
            "edit_file",
            "Replace an exact snippet of text in a file.",
            json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "File path" },
                    "old_string": { "type": "string", "description": "Text to replace" },
                    "new_string": { "type": "string", "description": "Replacement text" }
                },
                "required": ["path", "old_string", "new_string"]
            }),
        ),
        function_tool(
            "list_directory",
            "List the entries of a directory.",
            json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Directory path" }
                },
                "required": ["path"]
            }),
        ),
        function_tool(
            "search_files",
            "Search file contents for a regular expression.",
            json!({
                "type": "object",
                "properties": {
                    "pattern": { "type": "string", "description": "Regular expression" },
                    "path": { "type": "string", "description": "Directory to search" }
                },
                "required": ["pattern"]
            }),
        ),
        function_tool(
            "web_search",
            "Search the web and return result titles, links and snippets.",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query" },
                    "max_results": { "type": "integer", "description": "Maximum number of results" }
                },
                "required": ["query"]
            }),
        ),
        function_tool(
            READ_PAGE,
            "Fetch a web page and return its readable text.",
            json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string", "description": "Page URL" }
                },
                "required": ["url"]
            }),
        ),
        function_tool(
            MANAGE_MEMORY,
            "Read or update long-term memory about the user and their projects.",
            json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["read", "create", "append", "delete"],
                        "description": "Memory operation"
                    },
                    "content": { "type": "string", "description": "Memory text for create/append" }
                },
                "required": ["action"]
            }),
        ),
        function_tool(
            "manage_todos",
            "Create or update the task plan shown to the user.",
            json!({
                "type": "object",
                "properties": {
                    "todos": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": { "type": "string" },
                                "content": { "type": "string" },
                                "status": {
                                    "type": "string",
                                    "enum": ["pending", "in_progress", "completed", "cancelled"]
                                }
                            },
                            "required": ["id", "content", "status"]
                        }
                    }
                },
                "required": ["todos"]
            }),
        ),
    ]
}

#[cfg(test)]
#[path = "../tests/unit/tools_tests.rs"]
mod tests;
