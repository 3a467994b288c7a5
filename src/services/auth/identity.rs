/*
 * Responsibility
 * - 認証レイヤが request extensions に載せる「主体」(Principal) の型
 * - 署名検証済みトークンの claims を読み取り専用で公開する (VerifiedIdentity)
 *
 * Notes
 * - ここでは検証を行わない。検証は access_jwt (TokenVerifier) の責務
 * - step-up gate はこの型だけを見る
 */
use std::borrow::Cow;

use serde_json::{Map, Value};

/// Claims of an access token whose signature, issuer and lifetime were already
/// checked by a `TokenVerifier`. Lives for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    subject: String,
    claims: Map<String, Value>,
}

impl VerifiedIdentity {
    pub fn new(subject: impl Into<String>, claims: Map<String, Value>) -> Self {
        Self {
            subject: subject.into(),
            claims,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Present and not JSON `null`.
    pub fn claim_present(&self, name: &str) -> Option<&Value> {
        self.claim(name).filter(|v| !v.is_null())
    }

    /// Text view of a claim for diagnostics.
    ///
    /// - JSON strings are returned as-is
    /// - any other present value is rendered as JSON text (`2` -> `"2"`)
    /// - missing / null are `None`
    pub fn claim_str(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.claim_present(name)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Request-scoped authentication state.
///
/// The access middleware inserts exactly one of these into the request
/// extensions for every request it sees.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    /// A bearer token that passed verification.
    Bearer(VerifiedIdentity),
    /// No credentials were presented.
    Anonymous,
}

impl Principal {
    pub fn verified_identity(&self) -> Option<&VerifiedIdentity> {
        match self {
            Principal::Bearer(identity) => Some(identity),
            Principal::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(claims: Value) -> VerifiedIdentity {
        let Value::Object(map) = claims else {
            panic!("claims must be an object");
        };
        VerifiedIdentity::new("user-1", map)
    }

    #[test]
    fn claim_str_reads_strings_and_numbers() {
        let id = identity(json!({ "acr": "1", "level": 2 }));

        assert_eq!(id.claim_str("acr").as_deref(), Some("1"));
        assert_eq!(id.claim_str("level").as_deref(), Some("2"));
    }

    #[test]
    fn only_missing_and_null_claims_are_absent() {
        let id = identity(json!({
            "acr": null,
            "amr": ["pwd", "otp"],
            "cnf": { "jkt": "x" },
            "email_verified": true,
        }));

        assert_eq!(id.claim_present("acr"), None);
        assert_eq!(id.claim_present("missing"), None);
        assert_eq!(id.claim_present("email_verified"), Some(&json!(true)));

        assert_eq!(id.claim_str("acr"), None);
        assert_eq!(id.claim_str("missing"), None);
        assert_eq!(id.claim_str("amr").as_deref(), Some(r#"["pwd","otp"]"#));
        assert_eq!(id.claim_str("cnf").as_deref(), Some(r#"{"jkt":"x"}"#));
        assert_eq!(id.claim_str("email_verified").as_deref(), Some("true"));
    }

    #[test]
    fn anonymous_has_no_identity() {
        assert!(Principal::Anonymous.verified_identity().is_none());

        let bearer = Principal::Bearer(identity(json!({})));
        assert_eq!(bearer.verified_identity().map(|i| i.subject()), Some("user-1"));
    }
}
