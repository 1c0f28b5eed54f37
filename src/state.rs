/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: AuthGate, authority: AuthorityClient, audit: AuditRecorder
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use crate::services::{audit::AuditRecorder, auth::AuthGate, authority::AuthorityClient};

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: AuthGate,
    pub authority: AuthorityClient,
    pub audit: AuditRecorder,
}

impl AppState {
    pub fn new(gate: AuthGate, authority: AuthorityClient, audit: AuditRecorder) -> Self {
        Self {
            gate,
            authority,
            audit,
        }
    }
}
