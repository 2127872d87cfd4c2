//! Data Transfer Objects for application layer

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::application::ProjectSettingsOverrides;
use crate::generation::WorkflowContext;

/// Request to add a function to a project
///
/// Every optional field is a preset: when set, the matching prompt is skipped
/// and the value is validated as if the user had typed it.
#[derive(Debug, Clone, Default)]
pub struct CreateFunctionRequest {
    pub project_root: PathBuf,
    pub overrides: ProjectSettingsOverrides,
    pub template_id: Option<String>,
    pub function_name: Option<String>,
    pub package_name: Option<String>,
    pub settings: HashMap<String, String>,
}

impl CreateFunctionRequest {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }
}

/// Response from function creation
#[derive(Debug, Clone, Serialize)]
pub struct CreateFunctionResponse {
    pub template_id: String,
    pub function_name: String,
    /// Primary file of the new function, when one was produced
    pub primary_file: Option<PathBuf>,
    pub context: WorkflowContext,
}
