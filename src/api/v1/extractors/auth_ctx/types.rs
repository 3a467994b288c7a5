/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - access middleware が Principal を request extensions に格納し、extractor がこの型に変換する
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - step-up (acr) の判定は gate の責務。handler は acr を見ない
 */
use crate::services::auth::VerifiedIdentity;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `subject` は token の `sub`
/// - `identity` は検証済み claims 全体 (監査ログ用)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    pub identity: VerifiedIdentity,
}

impl AuthCtx {
    pub fn new(identity: VerifiedIdentity) -> Self {
        Self {
            subject: identity.subject().to_string(),
            identity,
        }
    }
}
