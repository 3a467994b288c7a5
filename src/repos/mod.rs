/*
 * Responsibility
 * - データアクセス層の公開 (今は in-memory の users のみ)
 */
pub mod user_repo;
