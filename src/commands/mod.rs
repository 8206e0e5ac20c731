pub mod start_action_workflow;
