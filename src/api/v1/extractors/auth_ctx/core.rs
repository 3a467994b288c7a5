use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Principal;
use crate::state::AppState;

use super::AuthCtx;

/// Handler で、 AuthCtx を受け取るための extractor
/// middleware が Principal を request.extensions() に insert 済みである前提
/// Bearer でない (Anonymous / middleware 未設定) 場合は 401 を返す
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .and_then(Principal::verified_identity)
            .cloned()
            .map(|identity| AuthCtxExtractor(AuthCtx::new(identity)))
            .ok_or(AppError::Unauthorized)
    }
}
