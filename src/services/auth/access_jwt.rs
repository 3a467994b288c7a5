use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::{error::Error as StdError, fmt};

use super::identity::VerifiedIdentity;

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug)]
pub enum AccessJwtError {
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
    InvalidKey(jsonwebtoken::errors::Error),
    UnsupportedAlgorithm(Algorithm),
}

impl fmt::Display for AccessJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
            Self::InvalidKey(e) => write!(f, "invalid public key pem: {}", e),
            Self::UnsupportedAlgorithm(alg) => {
                write!(f, "unsupported access token algorithm: {:?}", alg)
            }
        }
    }
}

impl StdError for AccessJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) | Self::InvalidKey(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Turns a raw bearer token into a `VerifiedIdentity`.
///
/// The access middleware only knows this trait, so tests can swap in a stub.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AccessJwtError>;
}

/// Access-token verifier backed by a static public key (RS256 / ES256 / EdDSA).
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(
        public_key_pem: &str,
        algorithm: Algorithm,
        issuer: &str,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, AccessJwtError> {
        let pem = public_key_pem.as_bytes();
        let decoding_key = match algorithm {
            Algorithm::RS256 => DecodingKey::from_rsa_pem(pem),
            Algorithm::ES256 => DecodingKey::from_ec_pem(pem),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
            other => return Err(AccessJwtError::UnsupportedAlgorithm(other)),
        }
        .map_err(AccessJwtError::InvalidKey)?;

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = leeway_seconds;

        // Identity providers often put a generic audience (e.g. "account") in
        // access tokens; only check it when one is configured.
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature + `iss` / `exp` / `nbf` (+ `aud` when configured) and
    /// return every claim untouched.
    pub fn verify_claims(&self, token: &str) -> Result<Map<String, Value>, AccessJwtError> {
        let data =
            jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AccessJwtError> {
        let claims = self.verify_claims(token)?;

        let sub = claims
            .get("sub")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AccessJwtError::EmptyClaim("sub"))?
            .to_string();

        Ok(VerifiedIdentity::new(sub, claims))
    }
}
