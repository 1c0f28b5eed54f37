/*
 * Responsibility
 * - /users 系の request/response DTO
 * - validate() で形式チェック (handler で 400 に変換)
 */
use serde::{Deserialize, Serialize};

use crate::services::authority::{UserFilters, UserPage, UserSummary};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_SIZE: u32 = 20;

// page / size は文字列で受けて, 数値でなければ既定値に戻す (400 にはしない)
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
}

impl ListUsersQuery {
    /// Missing, non-numeric or non-positive values fall back to the defaults.
    pub fn page(&self) -> u32 {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn size(&self) -> u32 {
        positive_or(self.size.as_deref(), DEFAULT_SIZE)
    }

    pub fn filters(&self) -> UserFilters {
        UserFilters {
            role: non_blank(self.role.as_deref()),
            email: non_blank(self.email.as_deref()),
        }
    }
}

fn positive_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `GET /users` の応答: 実際に使った page / size も返す
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub items: Vec<UserSummary>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}

impl ListUsersResponse {
    pub fn new(page: UserPage, page_no: u32, size: u32) -> Self {
        Self {
            items: page.items,
            total: page.total,
            page: page_no,
            size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

impl ChangeRoleRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        match self.role.as_str() {
            "admin" | "user" => Ok(()),
            _ => Err("role must be \"admin\" or \"user\""),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChangeRoleResponse {
    pub id: i64,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults_and_fallbacks() {
        let q = ListUsersQuery::default();
        assert_eq!((q.page(), q.size()), (1, 20));

        let q = ListUsersQuery {
            page: Some("0".into()),
            size: Some("-5".into()),
            ..Default::default()
        };
        assert_eq!((q.page(), q.size()), (1, 20));

        let q = ListUsersQuery {
            page: Some("3".into()),
            size: Some("50".into()),
            ..Default::default()
        };
        assert_eq!((q.page(), q.size()), (3, 50));
    }

    #[test]
    fn non_numeric_paging_falls_back() {
        let q = ListUsersQuery {
            page: Some("abc".into()),
            size: Some("".into()),
            ..Default::default()
        };
        assert_eq!((q.page(), q.size()), (1, 20));
    }

    #[test]
    fn blank_filters_are_dropped() {
        let q = ListUsersQuery {
            role: Some("  ".into()),
            email: Some("a@example.com".into()),
            ..Default::default()
        };
        let f = q.filters();
        assert_eq!(f.role, None);
        assert_eq!(f.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn only_known_roles_are_accepted() {
        for ok in ["admin", "user"] {
            assert!(ChangeRoleRequest { role: ok.into() }.validate().is_ok());
        }
        for bad in ["", "Admin", "root"] {
            assert!(ChangeRoleRequest { role: bad.into() }.validate().is_err());
        }
    }
}
