use serde::{Deserialize, Serialize};

/// Every authority response is wrapped as `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRole {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    pub items: Vec<UserSummary>,
    pub total: i64,
}

/// Optional filters forwarded as query parameters.
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub role: Option<String>,
    pub email: Option<String>,
}

impl UserFilters {
    pub(crate) fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [("role", self.role.as_deref()), ("email", self.email.as_deref())]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
    }
}
