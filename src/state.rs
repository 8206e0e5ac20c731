use reqwest::Client;

use crate::commands::start_action_workflow::PollSettings;

#[derive(Clone)]
pub struct AppState {
    pub http_client: Client,
    pub poll: PollSettings,
}
