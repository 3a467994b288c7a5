/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、/user は access middleware + step-up gate の内側
 * - step-up が必要な route の宣言 (step_up_routes) もここで持つ
 */
use axum::{Router, http::Method, routing::get};

use crate::api::v1::handlers::{
    health::health,
    users::{create_user, delete_user, get_user, update_user},
};
use crate::middleware::auth::{access, step_up};
use crate::services::step_up::StepUpRoutes;
use crate::state::AppState;

pub const PREFIX: &str = "/api/v1";
const USER: &str = "/user";

pub fn routes(state: AppState) -> Router<AppState> {
    let users = Router::new().route(
        USER,
        get(get_user)
            .put(create_user)
            .post(update_user)
            .delete(delete_user),
    );
    // access (outer) -> step-up gate (route layer) -> handler
    let users = step_up::apply(users, state.clone());
    let users = access::apply(users, state);

    Router::new().route("/health", get(health)).merge(users)
}

/// Routes that require `acr` = required level, keyed the way `MatchedPath`
/// reports them once nested under `PREFIX`. Reads stay at the base level.
pub fn step_up_routes() -> StepUpRoutes {
    let user = format!("{PREFIX}{USER}");

    StepUpRoutes::new()
        .mark(Method::PUT, user.clone())
        .mark(Method::POST, user.clone())
        .mark(Method::DELETE, user)
}
