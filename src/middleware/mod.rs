/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::gate::apply (route 単位), http::apply (全体)
 */
pub mod auth;
pub mod http;
