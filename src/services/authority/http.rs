use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::services::authority::client::{AuthorityError, RoleAuthority};
use crate::services::authority::types::{Envelope, UserFilters, UserPage, UserRole, UserSummary};

/// HTTP client for the identity service.
///
/// - One pooled `reqwest::Client` per process (cheap to clone).
/// - Each call is attempted exactly once, bounded by the configured timeout.
///   Fallback policy belongs to the caller.
#[derive(Clone, Debug)]
pub struct AuthorityClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthorityClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, AuthorityError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Joins onto the base as a path suffix (keeps any prefix the base already has).
    fn endpoint(&self, path: &str) -> Result<Url, AuthorityError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<String, AuthorityError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(AuthorityError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn get_data<T: DeserializeOwned>(&self, url: Url) -> Result<T, AuthorityError> {
        debug!(%url, "authority GET");
        let body = self.send(self.http.get(url)).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }

    /// `GET /api/v1/internal/users/{id}/role`
    pub async fn get_role(&self, subject_id: i64) -> Result<String, AuthorityError> {
        let url = self.endpoint(&format!("api/v1/internal/users/{subject_id}/role"))?;
        let role: UserRole = self.get_data(url).await?;
        Ok(role.role)
    }

    /// `GET /api/v1/internal/users/{id}`
    pub async fn get_user(&self, subject_id: i64) -> Result<UserSummary, AuthorityError> {
        let url = self.endpoint(&format!("api/v1/internal/users/{subject_id}"))?;
        self.get_data(url).await
    }

    /// `GET /api/v1/users?page=&size=&role=&email=`
    pub async fn list_users(
        &self,
        page: u32,
        size: u32,
        filters: &UserFilters,
    ) -> Result<UserPage, AuthorityError> {
        let mut url = self.endpoint("api/v1/users")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &page.to_string())
                .append_pair("size", &size.to_string());
            for (key, value) in filters.pairs() {
                query.append_pair(key, value);
            }
        }
        self.get_data(url).await
    }

    /// `PATCH /api/v1/internal/users/{id}/role` with `{"role": ...}`
    pub async fn update_role(&self, subject_id: i64, role: &str) -> Result<(), AuthorityError> {
        let url = self.endpoint(&format!("api/v1/internal/users/{subject_id}/role"))?;
        debug!(%url, role, "authority PATCH");
        self.send(self.http.patch(url).json(&json!({ "role": role })))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RoleAuthority for AuthorityClient {
    async fn get_role(&self, subject_id: i64) -> Result<String, AuthorityError> {
        AuthorityClient::get_role(self, subject_id).await
    }
}
