use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::commands::start_action_workflow::{StartActionWorkflow, StartActionWorkflowParams};
use crate::responses::ExecutionResult;
use crate::services::github_actions::client::ActionsApiClient;
use crate::state::AppState;

/// Body of `POST /v1/do/github/start-action-workflow`: the command's
/// construction-time parameters plus the opaque `config`/`task_data` values
/// the invoking framework passes through.
#[derive(Debug, Deserialize)]
pub struct StartActionWorkflowRequest {
    #[serde(flatten)]
    pub params: StartActionWorkflowParams,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub task_data: Value,
}

pub async fn start_action_workflow(
    State(state): State<AppState>,
    Json(payload): Json<StartActionWorkflowRequest>,
) -> ExecutionResult {
    let api = ActionsApiClient::new(
        state.http_client.clone(),
        &payload.params.github_repo_api_url,
        &payload.params.workflow_id,
        &payload.params.token,
    );
    let command = StartActionWorkflow::new(payload.params, state.poll.clone(), Arc::new(api));
    command.execute(&payload.config, &payload.task_data).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde_json::{from_slice, json};
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/v1/do/github/start-action-workflow", post(start_action_workflow))
            .with_state(state)
    }

    #[tokio::test]
    async fn route_returns_envelope_with_upstream_status() {
        let server = httpmock::MockServer::start();
        let dispatch = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/actions/workflows/deploy.yml/dispatches");
            then.status(422)
                .header("content-type", "application/json")
                .body(json!({ "message": "No ref found for: nope" }).to_string());
        });

        let state = AppState {
            http_client: reqwest::Client::new(),
            poll: Default::default(),
        };
        let body = json!({
            "github_repo_api_url": server.url(""),
            "workflow_id": "deploy.yml",
            "token": "secret",
            "github_ref": "nope",
            "config": {},
            "task_data": {}
        });

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/do/github/start-action-workflow")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        dispatch.assert();
        assert_eq!(response.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: Value = from_slice(&bytes).unwrap();
        assert!(json["error"].as_str().unwrap().contains("No ref found"));
    }

    #[tokio::test]
    async fn route_defaults_ref_and_inputs_when_omitted() {
        let server = httpmock::MockServer::start();
        // Matching on "ref": "main" proves the default applied; dispatch then
        // fails fast so the handler never enters the polling loop.
        let dispatch = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/actions/workflows/deploy.yml/dispatches")
                .json_body_partial(json!({ "ref": "main" }).to_string());
            then.status(500).body("boom");
        });

        let state = AppState {
            http_client: reqwest::Client::new(),
            poll: Default::default(),
        };
        let body = json!({
            "github_repo_api_url": server.url(""),
            "workflow_id": "deploy.yml",
            "token": "secret"
        });

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/do/github/start-action-workflow")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        dispatch.assert();
        assert_eq!(
            response.status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
