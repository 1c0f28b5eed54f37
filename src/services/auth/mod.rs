pub mod error;
pub mod gate;
pub mod principal;
pub mod role;
pub mod token;
pub mod token_issuer;

pub use error::AuthError;
pub use gate::AuthGate;
pub use principal::{Principal, Role, RoleSource};
pub use role::{RoleResolution, RoleResolver};
pub use token::{TokenVerifier, VerifiedToken};
pub use token_issuer::TokenIssuer;
