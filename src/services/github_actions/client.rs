use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::errors::ActionsApiError;
use super::models::{DispatchRequest, JobList, WorkflowRunList};
use super::service::ActionsApi;

pub const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "connector-github";

/// Live `ActionsApi` implementation against one repository's REST API.
#[derive(Clone)]
pub struct ActionsApiClient {
    client: Client,
    repo_api_url: String,
    workflow_id: String,
    token: String,
}

impl ActionsApiClient {
    pub fn new(client: Client, repo_api_url: &str, workflow_id: &str, token: &str) -> Self {
        Self {
            client,
            repo_api_url: repo_api_url.trim_end_matches('/').to_string(),
            workflow_id: workflow_id.to_string(),
            token: token.to_string(),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.token),
            )
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }
}

async fn expect_success(response: Response) -> Result<(), ActionsApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let status =
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Err(ActionsApiError::Api { status, body });
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ActionsApiError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        let status =
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Err(ActionsApiError::Api { status, body });
    }
    serde_json::from_str::<T>(&body).map_err(|err| ActionsApiError::InvalidResponse(err.to_string()))
}

#[async_trait]
impl ActionsApi for ActionsApiClient {
    async fn dispatch_workflow(
        &self,
        git_ref: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<(), ActionsApiError> {
        let url = format!(
            "{}/actions/workflows/{}/dispatches",
            self.repo_api_url,
            urlencoding::encode(&self.workflow_id)
        );
        let payload = DispatchRequest {
            git_ref: git_ref.to_string(),
            inputs: inputs.clone(),
        };
        let response = self
            .request(Method::POST, &url)
            .json(&payload)
            .send()
            .await?;
        expect_success(response).await
    }

    async fn list_recent_runs(
        &self,
        created_after: &str,
    ) -> Result<WorkflowRunList, ActionsApiError> {
        // `created` takes a search qualifier; %3E is the encoded `>` of ">{cutoff}".
        let url = format!(
            "{}/actions/runs?created=%3E{}",
            self.repo_api_url, created_after
        );
        let response = self.request(Method::GET, &url).send().await?;
        read_json(response).await
    }

    async fn list_jobs(&self, jobs_url: &str) -> Result<JobList, ActionsApiError> {
        let response = self.request(Method::GET, jobs_url).send().await?;
        read_json(response).await
    }
}
