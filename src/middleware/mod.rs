/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access (Bearer 検証 -> Principal), auth::step_up (step-up gate), cors, http
 */
pub mod auth;
pub mod cors;
pub mod http;
