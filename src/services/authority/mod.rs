pub mod client;
pub mod http;
pub mod types;

pub use client::{AuthorityError, RoleAuthority};
pub use http::AuthorityClient;
pub use types::{UserFilters, UserPage, UserSummary};
