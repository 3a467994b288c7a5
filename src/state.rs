/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - users: in-memory repo, auth: TokenVerifier, step_up: StepUpGate
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::user_repo::UserRepo;
use crate::services::{auth::TokenVerifier, step_up::StepUpGate};

#[derive(Clone)]
pub struct AppState {
    pub users: UserRepo,
    pub auth: Arc<dyn TokenVerifier>,
    pub step_up: Arc<StepUpGate>,
}

impl AppState {
    pub fn new(users: UserRepo, auth: Arc<dyn TokenVerifier>, step_up: Arc<StepUpGate>) -> Self {
        Self {
            users,
            auth,
            step_up,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("users", &self.users)
            .field("step_up", &self.step_up)
            .finish_non_exhaustive()
    }
}
