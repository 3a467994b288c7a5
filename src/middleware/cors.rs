//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native mobile apps and server-to-server calls are not
//!   restricted by CORS.
//! - The SPA sends the step-up callback path in `x-api-cb`, so that header has to be
//!   allowed explicitly or the browser drops the preflight.
//!
//! Policy:
//! - Development: permissive (Allow-Origin: *), WITHOUT credentials.
//! - Production: allowlist origins from Config (comma-separated env var), WITHOUT credentials.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;
use crate::services::step_up::CALLBACK_URL_HEADER;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Do not combine wildcard origin (`Any`) with `allow_credentials(true)`.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}

fn layer(config: &Config) -> CorsLayer {
    let cors = if config.app_env.is_production() {
        // Empty allowlist: no CORS headers at all.
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        });

        CorsLayer::new().allow_origin(allow_origin)
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
        HeaderName::from_static(CALLBACK_URL_HEADER),
    ])
    .max_age(std::time::Duration::from_secs(60 * 10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::put;
    use tower::ServiceExt;

    fn config(app_env: &str, origins: &str) -> Config {
        let app_env = app_env.to_string();
        let origins = origins.to_string();
        Config::from_lookup(move |key| match key {
            "APP_ENV" => Some(app_env.clone()),
            "CORS_ALLOWED_ORIGINS" => Some(origins.clone()),
            "AUTH_ISSUER_URI" => Some("https://idp.example.com".into()),
            "AUTH_CLIENT_ID" => Some("abc123".into()),
            "ACCESS_JWT_PUBLIC_KEY_PEM" => Some("pem".into()),
            _ => None,
        })
        .unwrap()
    }

    async fn preflight(config: &Config, origin: &str) -> axum::response::Response {
        let app = apply(Router::new().route("/user", put(|| async {})), config);
        app.oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/user")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,x-api-cb")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn preflight_allows_callback_header() {
        let res = preflight(&config("development", ""), "https://app.example.com").await;

        assert_eq!(res.status(), StatusCode::OK);
        let allowed = res
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(allowed.contains("x-api-cb"), "allowed headers: {allowed}");
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn production_only_echoes_listed_origins() {
        let config = config("production", "https://app.example.com");

        let listed = preflight(&config, "https://app.example.com").await;
        assert_eq!(
            listed
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://app.example.com"
        );

        let other = preflight(&config, "https://evil.example.com").await;
        assert!(
            other
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
