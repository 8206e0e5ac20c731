pub mod commands;
pub mod config;
pub mod responses;
pub mod routes;
pub mod services;
pub mod state;

pub use state::AppState;
