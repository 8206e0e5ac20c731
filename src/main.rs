mod commands;
mod config;
mod responses;
mod routes;
mod services;
mod state;

use axum::{routing::post, Router};
use config::Config;
use reqwest::Client;
use state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use routes::connector::start_action_workflow;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let config = Config::from_env();

    let state = AppState {
        http_client: Client::new(),
        poll: config.poll.clone(),
    };

    let app = Router::new()
        .route(
            "/v1/do/github/start-action-workflow",
            post(start_action_workflow),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .expect("invalid CONNECTOR_BIND_ADDR");
    let listener = TcpListener::bind(addr).await.unwrap();
    info!("connector-github listening on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}
