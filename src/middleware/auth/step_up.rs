//! Step-up gate middleware.
//!
//! Applied with `route_layer`, so it only runs for requests that matched a
//! route (and `MatchedPath` is available). The marked-route table lives in
//! `StepUpGate`; unmarked routes fall straight through.
//!
//! Responsibility:
//! - Collect method / matched route / headers / principal into a `StepUpRequest`
//! - Turn the `StepUpDecision` into a response (403 / 412) or call the handler

use axum::{
    Json, Router,
    body::Body,
    extract::{MatchedPath, OriginalUri, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::auth::Principal;
use crate::services::step_up::{StepUpDecision, StepUpRequest};
use crate::state::AppState;

/// 412 body: `{"status": 412, "authenticationUrl": "..."}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpChallenge {
    pub status: u16,
    pub authentication_url: String,
}

/// Must be applied inside (after) `middleware::auth::access`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, step_up_middleware))
}

async fn step_up_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let decision = {
        let extensions = req.extensions();
        // Nested routers see a stripped uri; log the one the client sent.
        let path = extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path())
            .unwrap_or_else(|| req.uri().path());

        state.step_up.evaluate(&StepUpRequest {
            method: req.method(),
            route: extensions.get::<MatchedPath>().map(MatchedPath::as_str),
            path,
            headers: req.headers(),
            principal: extensions.get::<Principal>(),
        })
    };

    match rejection(decision) {
        Some(response) => response,
        None => next.run(req).await,
    }
}

/// `None` means the request may proceed.
pub fn rejection(decision: StepUpDecision) -> Option<Response> {
    match decision {
        StepUpDecision::Allow => None,
        // empty body
        StepUpDecision::Deny => Some(StatusCode::FORBIDDEN.into_response()),
        StepUpDecision::ChallengeRedirect { url } => {
            let status = StatusCode::PRECONDITION_FAILED;
            let body = StepUpChallenge {
                status: status.as_u16(),
                authentication_url: url,
            };
            Some((status, Json(body)).into_response())
        }
    }
}
