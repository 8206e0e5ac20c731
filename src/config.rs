use std::env;
use std::time::Duration;

use crate::commands::start_action_workflow::PollSettings;

pub struct Config {
    pub bind_addr: String,
    pub poll: PollSettings,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok(); // Load .env file

        let bind_addr =
            env::var("CONNECTOR_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        let mut poll = PollSettings::default();
        if let Some(secs) = env::var("CONNECTOR_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            poll.interval = Duration::from_secs(secs);
        }
        poll.max_attempts = env::var("CONNECTOR_MAX_POLL_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok());
        if let Some(idx) = env::var("CONNECTOR_JOB_INDEX")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            poll.job_index = idx;
        }
        if let Some(idx) = env::var("CONNECTOR_MARKER_STEP_INDEX")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            poll.marker_step_index = idx;
        }

        Config { bind_addr, poll }
    }
}
