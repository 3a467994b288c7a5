/*
 * Responsibility
 * - step-up gate の入出力の型 (StepUpDecision / StepUpRequest / StepUpConfig)
 * - marked route のテーブル (StepUpRoutes)
 * - gate 内部で閉じるエラー (StepUpError)
 */
use std::collections::{HashMap, HashSet};

use axum::http::{HeaderMap, Method};

use crate::services::auth::Principal;

/// Claim carrying the authentication context class reference.
pub const ACR_CLAIM_NAME: &str = "acr";
/// Minimum acceptable `acr` value for marked routes.
pub const REQUIRED_ACR_LEVEL: &str = "2";
/// Header carrying the page the caller came from.
pub const ORIGIN_URL_HEADER: &str = "referer";
/// Header carrying the path the identity provider should send the caller back to.
pub const CALLBACK_URL_HEADER: &str = "x-api-cb";

/// Outcome of the step-up check for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepUpDecision {
    /// Proceed to the handler unchanged.
    Allow,
    /// No verified identity, or no `acr` claim. 403 with an empty body.
    Deny,
    /// The caller must re-authenticate at `REQUIRED_ACR_LEVEL`.
    ChallengeRedirect { url: String },
}

/// Errors that never leave the gate: each one becomes `StepUpDecision::Deny`,
/// except `MissingConfig` which only happens at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StepUpError {
    #[error("missing or invalid verified identity")]
    MissingOrInvalidIdentity,
    #[error("acr claim missing or not a scalar")]
    MissingAcrClaim,
    #[error("missing step-up configuration: {0}")]
    MissingConfig(&'static str),
}

/// Identity provider coordinates used to build the re-authentication URL.
///
/// Can only be built with both values present, so the gate never assembles a
/// URL from absent configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepUpConfig {
    issuer_uri: String,
    client_id: String,
}

impl StepUpConfig {
    pub fn new(
        issuer_uri: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Result<Self, StepUpError> {
        let issuer_uri = issuer_uri.into();
        let client_id = client_id.into();

        // `https://idp/realms/x/` + `/protocol/...` must not produce `//protocol`
        let issuer_uri = issuer_uri.trim().trim_end_matches('/').to_string();
        if issuer_uri.is_empty() {
            return Err(StepUpError::MissingConfig("issuer_uri"));
        }

        let client_id = client_id.trim().to_string();
        if client_id.is_empty() {
            return Err(StepUpError::MissingConfig("client_id"));
        }

        Ok(Self {
            issuer_uri,
            client_id,
        })
    }

    pub fn issuer_uri(&self) -> &str {
        &self.issuer_uri
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Declarative table of routes that require step-up authentication.
///
/// Keyed by the route pattern as axum reports it in `MatchedPath`
/// (e.g. `/api/v1/user`), then by method.
#[derive(Debug, Clone, Default)]
pub struct StepUpRoutes {
    marked: HashMap<String, HashSet<Method>>,
}

impl StepUpRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(mut self, method: Method, route: impl Into<String>) -> Self {
        self.marked.entry(route.into()).or_default().insert(method);
        self
    }

    pub fn is_marked(&self, method: &Method, route: &str) -> bool {
        self.marked
            .get(route)
            .is_some_and(|methods| methods.contains(method))
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }
}

/// Everything the gate looks at for one request.
///
/// `principal` is threaded in explicitly by the caller; the gate never reads
/// ambient state.
#[derive(Debug, Clone, Copy)]
pub struct StepUpRequest<'a> {
    pub method: &'a Method,
    /// Matched route pattern. `None` when the router did not match a route.
    pub route: Option<&'a str>,
    /// Concrete request path, for diagnostics only.
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    pub principal: Option<&'a Principal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_requires_issuer_and_client() {
        assert_eq!(
            StepUpConfig::new("", "abc123"),
            Err(StepUpError::MissingConfig("issuer_uri"))
        );
        assert_eq!(
            StepUpConfig::new("https://idp.example.com", "  "),
            Err(StepUpError::MissingConfig("client_id"))
        );
    }

    #[test]
    fn config_trims_trailing_slash_from_issuer() {
        let config = StepUpConfig::new("https://idp.example.com/realms/demo/", "abc123").unwrap();
        assert_eq!(config.issuer_uri(), "https://idp.example.com/realms/demo");
        assert_eq!(config.client_id(), "abc123");
    }

    #[test]
    fn routes_match_on_method_and_pattern() {
        let routes = StepUpRoutes::new()
            .mark(Method::PUT, "/api/v1/user")
            .mark(Method::DELETE, "/api/v1/user");

        assert!(routes.is_marked(&Method::PUT, "/api/v1/user"));
        assert!(routes.is_marked(&Method::DELETE, "/api/v1/user"));
        assert!(!routes.is_marked(&Method::GET, "/api/v1/user"));
        assert!(!routes.is_marked(&Method::PUT, "/api/v1/health"));
        assert!(!routes.is_empty());
        assert!(StepUpRoutes::new().is_empty());
    }
}
