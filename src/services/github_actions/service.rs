use async_trait::async_trait;
use std::collections::HashMap;

use super::errors::ActionsApiError;
use super::models::{JobList, WorkflowRunList};

/// The slice of the GitHub Actions REST API the connector needs: fire a
/// `workflow_dispatch` event, list recently created runs, and list the jobs
/// of one run.
#[async_trait]
pub trait ActionsApi: Send + Sync {
    async fn dispatch_workflow(
        &self,
        git_ref: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<(), ActionsApiError>;

    /// Lists runs created after `created_after` (`%Y-%m-%dT%H:%M`, UTC).
    async fn list_recent_runs(&self, created_after: &str)
        -> Result<WorkflowRunList, ActionsApiError>;

    async fn list_jobs(&self, jobs_url: &str) -> Result<JobList, ActionsApiError>;
}
