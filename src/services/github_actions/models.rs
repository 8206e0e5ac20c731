use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of a `workflow_dispatch` event.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRequest {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub inputs: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowRunList {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub jobs_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub run_url: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub name: String,
}
