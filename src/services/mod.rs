pub mod auth;
pub mod step_up;
