use crate::task::INPUT_NAME;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const INPUT_TYPES: &[&str] = &["string", "boolean", "multiLine", "pickList", "filePath"];

/// task.json: what the agent needs to know to show and invoke the task
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskManifest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub version: TaskVersion,
    #[serde(default)]
    pub instance_name_format: Option<String>,
    #[serde(default)]
    pub inputs: Vec<TaskInput>,
    #[serde(default)]
    pub execution: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TaskVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub name: String,
    #[serde(rename = "type")]
    pub input_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub help_mark_down: Option<String>,
}

pub fn load_manifest(path: &Path) -> anyhow::Result<TaskManifest> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    let m: TaskManifest = serde_json::from_str(&content).with_context(|| format!("failed to parse JSON {:?}", path))?;
    Ok(m)
}

/// Name present, input names unique, known input types, `samplestring` declared required
pub fn validate_manifest(m: &TaskManifest) -> anyhow::Result<()> {
    if m.name.trim().is_empty() {
        anyhow::bail!("task name is empty");
    }

    let mut names = HashSet::new();
    for input in &m.inputs {
        if input.name.trim().is_empty() {
            anyhow::bail!("task '{}' has an input without a name", m.name);
        }
        if !names.insert(input.name.as_str()) {
            anyhow::bail!("duplicate input name '{}'", input.name);
        }
        if !INPUT_TYPES.contains(&input.input_type.as_str()) {
            anyhow::bail!("input '{}' has unknown type '{}'", input.name, input.input_type);
        }
    }

    match m.inputs.iter().find(|i| i.name == INPUT_NAME) {
        Some(i) if i.required => Ok(()),
        Some(_) => anyhow::bail!("input '{}' must be required", INPUT_NAME),
        None => anyhow::bail!("task '{}' does not declare input '{}'", m.name, INPUT_NAME),
    }
}

pub fn validate_manifest_file(path: &Path) -> anyhow::Result<TaskManifest> {
    let manifest = load_manifest(path)?;
    validate_manifest(&manifest)?;
    println!("Task '{}' validated", manifest.name);
    Ok(manifest)
}
