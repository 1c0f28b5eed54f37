pub mod audit_repo;
pub mod error;
