pub mod access_jwt;
pub mod factory;
pub mod identity;

pub use access_jwt::{AccessJwtError, JwtVerifier, TokenVerifier};
pub use factory::{build_step_up_gate, build_token_verifier};
pub use identity::{Principal, VerifiedIdentity};
