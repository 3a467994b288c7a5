pub mod access;
pub mod step_up;
