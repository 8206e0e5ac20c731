use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

use crate::responses::ExecutionResult;
use crate::services::github_actions::errors::ActionsApiError;
use crate::services::github_actions::service::ActionsApi;

/// Input key the dispatched workflow must echo back as a step name so the
/// poller can tell its run apart from concurrent ones. The workflow yml has
/// to declare an input with this name and a step whose name expands to it.
pub const CROSS_REFERENCE_KEY: &str = "workflow_cross_reference_id";

/// Lookback window of the run-list query when correlating.
const RUN_LOOKBACK_MINUTES: i64 = 5;
const CUTOFF_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Construction-time parameters of the command, as supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct StartActionWorkflowParams {
    pub github_repo_api_url: String,
    pub workflow_id: String,
    pub token: String,
    #[serde(default)]
    pub additional_workflow_inputs: HashMap<String, String>,
    #[serde(default = "default_github_ref")]
    pub github_ref: String,
}

fn default_github_ref() -> String {
    "main".to_string()
}

/// Tuning of the correlation loop. Defaults reproduce the historical
/// behavior: poll every 3 seconds, never give up, inspect the first job's
/// second step.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub job_index: usize,
    pub marker_step_index: usize,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: None,
            job_index: 0,
            marker_step_index: 1,
        }
    }
}

enum CommandError {
    Api { status: StatusCode, body: String },
    Unexpected(String),
}

impl From<ActionsApiError> for CommandError {
    fn from(err: ActionsApiError) -> Self {
        match err {
            ActionsApiError::Api { status, body } => CommandError::Api { status, body },
            other => CommandError::Unexpected(other.to_string()),
        }
    }
}

/// Dispatches a `workflow_dispatch` event carrying a fresh cross-reference
/// id, then polls recent runs until one echoes that id back as a step name.
pub struct StartActionWorkflow {
    params: StartActionWorkflowParams,
    poll: PollSettings,
    api: Arc<dyn ActionsApi>,
}

impl StartActionWorkflow {
    pub fn new(
        params: StartActionWorkflowParams,
        poll: PollSettings,
        api: Arc<dyn ActionsApi>,
    ) -> Self {
        Self { params, poll, api }
    }

    /// `config` and `task_data` are part of the command calling convention
    /// but carry nothing this command consumes.
    pub async fn execute(&self, _config: &Value, _task_data: &Value) -> ExecutionResult {
        match self.run().await {
            Ok(run_url) => ExecutionResult::ok(json!({ "run_url": run_url })),
            Err(CommandError::Api { status, body }) => {
                ExecutionResult::error(status.as_u16(), body)
            }
            Err(CommandError::Unexpected(message)) => ExecutionResult::error(500, message),
        }
    }

    async fn run(&self) -> Result<String, CommandError> {
        let cross_reference_id = new_cross_reference_id();
        let cutoff = run_cutoff(Utc::now());

        let mut inputs = self.params.additional_workflow_inputs.clone();
        inputs.insert(CROSS_REFERENCE_KEY.to_string(), cross_reference_id.clone());

        self.api
            .dispatch_workflow(&self.params.github_ref, &inputs)
            .await?;
        info!(
            workflow_id = %self.params.workflow_id,
            github_ref = %self.params.github_ref,
            "workflow dispatched, correlating run"
        );

        self.await_run(&cutoff, &cross_reference_id).await
    }

    async fn await_run(
        &self,
        cutoff: &str,
        cross_reference_id: &str,
    ) -> Result<String, CommandError> {
        let mut attempts = 0u32;
        loop {
            if let Some(max) = self.poll.max_attempts {
                if attempts >= max {
                    return Err(CommandError::Unexpected(format!(
                        "no matching workflow run found after {} poll attempts",
                        max
                    )));
                }
            }
            attempts += 1;

            let runs = self.api.list_recent_runs(cutoff).await?.workflow_runs;
            if runs.is_empty() {
                sleep(self.poll.interval).await;
                continue;
            }

            let mut wait_before_next = false;
            for run in &runs {
                let jobs = self.api.list_jobs(&run.jobs_url).await?.jobs;
                let Some(job) = jobs.get(self.poll.job_index) else {
                    // Jobs not registered yet; let the run materialize.
                    wait_before_next = true;
                    break;
                };
                if job.steps.len() <= self.poll.marker_step_index {
                    wait_before_next = true;
                    break;
                }
                if job.steps[self.poll.marker_step_index].name == cross_reference_id {
                    debug!(run_url = %job.run_url, "matched dispatched run");
                    return Ok(job.run_url.clone());
                }
            }

            // A complete snapshot with no matching step name re-lists right
            // away; only missing jobs or short step lists wait out the
            // interval. Historical behavior, kept as-is.
            if wait_before_next {
                sleep(self.poll.interval).await;
            }
        }
    }
}

fn new_cross_reference_id() -> String {
    #[cfg(test)]
    {
        if let Ok(value) = std::env::var("CONNECTOR_FIXED_CROSS_REFERENCE_ID") {
            if !value.trim().is_empty() {
                return value;
            }
        }
    }
    Uuid::new_v4().to_string()
}

fn run_cutoff(now: DateTime<Utc>) -> String {
    (now - chrono::Duration::minutes(RUN_LOOKBACK_MINUTES))
        .format(CUTOFF_FORMAT)
        .to_string()
}
