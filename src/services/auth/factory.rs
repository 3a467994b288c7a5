//! Factories: build auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AccessJwtError, JwtVerifier, TokenVerifier};
use crate::services::step_up::{StepUpConfig, StepUpError, StepUpGate, StepUpRoutes};

pub fn build_token_verifier(config: &Config) -> Result<Arc<dyn TokenVerifier>, AccessJwtError> {
    let verifier = JwtVerifier::new(
        &config.access_jwt_public_key_pem,
        config.access_jwt_algorithm,
        &config.auth_issuer_uri,
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    )?;

    Ok(Arc::new(verifier))
}

/// `routes` is the marked-route table, usually `api::v1::step_up_routes()`.
pub fn build_step_up_gate(
    config: &Config,
    routes: StepUpRoutes,
) -> Result<Arc<StepUpGate>, StepUpError> {
    let step_up_config = StepUpConfig::new(&config.auth_issuer_uri, &config.auth_client_id)?;

    Ok(Arc::new(StepUpGate::new(step_up_config, routes)))
}
