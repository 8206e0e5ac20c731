pub mod github_actions;
