//! access token (JWT) 検証 → Principal を extensions に入れる
//!
//! - `Authorization` ヘッダなし: `Principal::Anonymous` を入れてそのまま通す
//!   (認証必須かどうかは step-up gate / AuthCtxExtractor が決める)
//! - `Authorization: Bearer <jwt>`: TokenVerifier で検証し `Principal::Bearer` を入れる
//! - 検証失敗 / Bearer 以外のスキーム: 401

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::Principal;
use crate::state::AppState;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// step-up gate より外側 (先に実行される側) に置くこと。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match req.headers().get(header::AUTHORIZATION) {
        None => Principal::Anonymous,
        Some(value) => {
            let token = value
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or(AppError::Unauthorized)?;

            // 署名 / iss / exp などの検証は TokenVerifier 側で実施
            match state.auth.verify(token) {
                Ok(identity) => Principal::Bearer(identity),
                Err(err) => {
                    tracing::warn!(error = %err, "access token verification failed");
                    return Err(AppError::Unauthorized);
                }
            }
        }
    };

    // middleware → step-up gate / extractor への受け渡し
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Extension, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use crate::test_support;

    async fn echo(Extension(principal): Extension<Principal>) -> String {
        match principal {
            Principal::Bearer(identity) => format!("bearer:{}", identity.subject()),
            Principal::Anonymous => "anonymous".to_string(),
        }
    }

    fn app() -> Router {
        let state = test_support::state();
        let router = Router::new().route("/whoami", get(echo));
        apply(router, state.clone()).with_state(state)
    }

    async fn call(authorization: Option<&str>) -> (StatusCode, String) {
        let mut req = Request::builder().uri("/whoami");
        if let Some(v) = authorization {
            req = req.header(header::AUTHORIZATION, v);
        }
        let res = app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn no_header_is_anonymous() {
        assert_eq!(call(None).await, (StatusCode::OK, "anonymous".to_string()));
    }

    #[tokio::test]
    async fn valid_bearer_becomes_principal() {
        let (status, body) = call(Some("Bearer acr-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("bearer:{}", test_support::SUBJECT));
    }

    #[tokio::test]
    async fn invalid_token_or_scheme_is_unauthorized() {
        let (status, _) = call(Some("Bearer garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
