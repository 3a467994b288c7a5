/*
 * Responsibility
 * - /user 系 CRUD handler (email をキーにした in-memory ストア)
 * - Query/Json を extractor で受け、DTO validation → repo 呼び出し
 * - step-up が必要かどうかは handler では判断しない (routes の step_up_routes が決める)
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::users::{EmailQuery, UserRequest, UserResponse},
    api::v1::extractors::AuthCtxExtractor,
    error::AppError,
    repos::user_repo::UserRow,
    state::AppState,
};

fn invalid_email(message: &'static str) -> AppError {
    AppError::bad_request("INVALID_EMAIL", message)
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(_auth): AuthCtxExtractor,
    Query(query): Query<EmailQuery>,
) -> Result<Json<UserResponse>, AppError> {
    query.validate().map_err(invalid_email)?;

    let row = state
        .users
        .get(&query.email)
        .await
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Json(req): Json<UserRequest>,
) -> Result<StatusCode, AppError> {
    req.validate().map_err(invalid_email)?;

    state.users.create(UserRow::new(req.email)).await;
    tracing::info!(subject = %auth.subject, "user created");

    Ok(StatusCode::OK)
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Query(query): Query<EmailQuery>,
    Json(req): Json<UserRequest>,
) -> Result<StatusCode, AppError> {
    query.validate().map_err(invalid_email)?;
    req.validate().map_err(invalid_email)?;

    state
        .users
        .update(&query.email, UserRow::new(req.email))
        .await;
    tracing::info!(subject = %auth.subject, "user updated");

    Ok(StatusCode::ACCEPTED)
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Query(query): Query<EmailQuery>,
) -> Result<StatusCode, AppError> {
    query.validate().map_err(invalid_email)?;

    let existed = state.users.delete(&query.email).await;
    tracing::info!(
        subject = %auth.subject,
        acr = ?auth.identity.claim_str("acr"),
        existed,
        "user deleted"
    );

    // idempotent: deleting an unknown email is still 204
    Ok(StatusCode::NO_CONTENT)
}
