//! Step-up authentication gate - core logic.
//!
//! Pure and synchronous: no I/O, no shared mutable state. The axum middleware
//! in `middleware::auth::step_up` feeds it a `StepUpRequest` and turns the
//! returned `StepUpDecision` into a response.

use axum::http::{HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{info, warn};
use url::form_urlencoded;

use super::types::{
    ACR_CLAIM_NAME, CALLBACK_URL_HEADER, ORIGIN_URL_HEADER, REQUIRED_ACR_LEVEL, StepUpConfig,
    StepUpDecision, StepUpError, StepUpRequest, StepUpRoutes,
};
use crate::services::auth::Principal;

#[derive(Debug, Clone)]
pub struct StepUpGate {
    config: StepUpConfig,
    routes: StepUpRoutes,
}

impl StepUpGate {
    pub fn new(config: StepUpConfig, routes: StepUpRoutes) -> Self {
        Self { config, routes }
    }

    pub fn routes(&self) -> &StepUpRoutes {
        &self.routes
    }

    pub fn evaluate(&self, req: &StepUpRequest<'_>) -> StepUpDecision {
        // Unmarked routes: one lookup, nothing else.
        let marked = req
            .route
            .is_some_and(|route| self.routes.is_marked(req.method, route));
        if !marked {
            return StepUpDecision::Allow;
        }

        let acr = match acr_claim(req.principal) {
            Ok(acr) => acr,
            Err(StepUpError::MissingOrInvalidIdentity) => {
                warn!(path = %req.path, "invalid authorization token found when querying");
                return StepUpDecision::Deny;
            }
            Err(err) => {
                warn!(path = %req.path, error = %err, "acr claim invalid or not found when querying");
                return StepUpDecision::Deny;
            }
        };

        // Only the exact JSON string counts; numbers and structures are a lower level.
        if acr.as_str() == Some(REQUIRED_ACR_LEVEL) {
            info!(path = %req.path, "calling resource with step-up authentication level");
            return StepUpDecision::Allow;
        }

        info!(path = %req.path, acr = %acr, "need to step-up authentication level");
        let url = RedirectUrlComponents::from_headers(&self.config, req.headers).to_url();
        StepUpDecision::ChallengeRedirect { url }
    }
}

fn acr_claim(principal: Option<&Principal>) -> Result<&Value, StepUpError> {
    let identity = principal
        .and_then(Principal::verified_identity)
        .ok_or(StepUpError::MissingOrInvalidIdentity)?;

    identity
        .claim_present(ACR_CLAIM_NAME)
        .ok_or(StepUpError::MissingAcrClaim)
}

/// Inputs of the identity provider re-authentication URL, gathered per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrlComponents<'a> {
    pub issuer_uri: &'a str,
    pub client_id: &'a str,
    pub origin_url: &'a [u8],
    pub callback_path: &'a [u8],
    pub required_level: &'a str,
}

impl<'a> RedirectUrlComponents<'a> {
    /// Missing headers fall back to `/`. Present values are taken as raw bytes,
    /// so non-ASCII (obs-text) survives into the redirect.
    pub fn from_headers(config: &'a StepUpConfig, headers: &'a HeaderMap) -> Self {
        Self {
            issuer_uri: config.issuer_uri(),
            client_id: config.client_id(),
            origin_url: header_or_root(headers, ORIGIN_URL_HEADER),
            callback_path: header_or_root(headers, CALLBACK_URL_HEADER),
            required_level: REQUIRED_ACR_LEVEL,
        }
    }

    /// `{issuer}/protocol/openid-connect/auth?...` with the origin and callback
    /// concatenated and form-urlencoded into `redirect_uri`.
    ///
    /// NOTE: origin and callback are not validated; an untrusted `x-api-cb`
    /// can steer the post-login redirect.
    pub fn to_url(&self) -> String {
        let raw_redirect = [self.origin_url, self.callback_path].concat();
        let redirect_uri = form_encode(&raw_redirect);

        format!(
            "{}/protocol/openid-connect/auth?client_id={}&redirect_uri={}&response_type=code&response_mode=query&scope=openid&acr_values={}",
            self.issuer_uri, self.client_id, redirect_uri, self.required_level
        )
    }
}

fn header_or_root<'a>(headers: &'a HeaderMap, name: &str) -> &'a [u8] {
    headers.get(name).map(HeaderValue::as_bytes).unwrap_or(b"/")
}

// application/x-www-form-urlencoded: space -> '+', not "%20"
fn form_encode(value: &[u8]) -> String {
    form_urlencoded::byte_serialize(value).collect()
}
