/*!
 * Step-up authentication gate
 *
 * Responsibility:
 * - marked route に対して acr claim を確認し、Allow / Deny / ChallengeRedirect を決める
 * - HTTP レスポンスへの変換は middleware::auth::step_up 側の責務
 *
 * Public API:
 * - StepUpGate
 * - StepUpDecision, StepUpRequest, StepUpConfig, StepUpRoutes
 */

mod core;
mod types;

pub use core::{RedirectUrlComponents, StepUpGate};
pub use types::*;
