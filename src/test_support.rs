//! Shared fixtures for router-level tests.
//!
//! `StubVerifier` accepts a handful of fixed bearer strings instead of JWTs:
//! - `acr-1` / `acr-2`: identity with that `acr`
//! - `no-acr`: identity without an `acr` claim
//! - anything else: rejected

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use serde_json::{Value, json};

use crate::api;
use crate::config::Config;
use crate::repos::user_repo::UserRepo;
use crate::services::auth::{AccessJwtError, TokenVerifier, VerifiedIdentity, build_step_up_gate};
use crate::state::AppState;

pub const SUBJECT: &str = "5d1f6c1e-0000-4000-8000-000000000001";

pub struct StubVerifier;

impl TokenVerifier for StubVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AccessJwtError> {
        let claims = match token {
            "acr-1" => json!({ "sub": SUBJECT, "acr": "1" }),
            "acr-2" => json!({ "sub": SUBJECT, "acr": "2" }),
            "no-acr" => json!({ "sub": SUBJECT }),
            _ => return Err(AccessJwtError::Jwt(ErrorKind::InvalidToken.into())),
        };
        let Value::Object(map) = claims else {
            unreachable!("json! object literal");
        };
        Ok(VerifiedIdentity::new(SUBJECT, map))
    }
}

pub fn config() -> Config {
    Config::from_lookup(|key| match key {
        "AUTH_ISSUER_URI" => Some("https://idp.example.com".into()),
        "AUTH_CLIENT_ID" => Some("abc123".into()),
        "ACCESS_JWT_PUBLIC_KEY_PEM" => Some("unused by StubVerifier".into()),
        _ => None,
    })
    .expect("test config")
}

pub fn state() -> AppState {
    let step_up = build_step_up_gate(&config(), api::v1::step_up_routes()).expect("step-up gate");
    AppState::new(UserRepo::seeded(), Arc::new(StubVerifier), step_up)
}
