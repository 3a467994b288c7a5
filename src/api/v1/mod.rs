/*
 * Responsibility
 * - v1 の公開ポイント (routes() / step_up_routes() の re-export など)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::{PREFIX, routes, step_up_routes};
