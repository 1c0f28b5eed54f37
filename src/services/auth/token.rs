use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;

use crate::services::auth::error::AuthError;
use crate::services::auth::principal::Principal;

const BEARER_PREFIX: &str = "Bearer ";

/// Raw claims as issued by the identity service.
///
/// NOTE:
/// - `sub` is the canonical subject claim; `user_id` is still accepted because older
///   issuers put the subject there.
/// - Subject, `exp` and `is_admin` are kept as `Value` so a claim of an unexpected type
///   is judged here instead of failing the whole decode.
#[derive(Debug, Clone, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<Value>,
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    exp: Option<Value>,
    #[serde(default)]
    iat: Option<Value>,
    #[serde(default)]
    is_admin: Option<Value>,
}

/// Result of a successful verification.
///
/// `embedded_admin` is advisory only: it was fixed at issuance time and may be stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub principal: Principal,
    pub issued_at: Option<i64>,
    pub expires_at: i64,
    pub embedded_admin: Option<bool>,
}

/// HMAC (HS256/HS384/HS512) bearer token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Anything outside the HMAC family is rejected before the key is used.
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // exp is checked by hand below: strictly in the future, no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.validate_aud = false;
        // jsonwebtoken would parse a required exp as u64; negative or fractional values
        // must still reach the expiry check.
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify the raw `Authorization` header value (`Bearer <token>`).
    pub fn verify_header(&self, header: Option<&str>) -> Result<VerifiedToken, AuthError> {
        let token = extract_bearer(header)?;
        self.verify(token)
    }

    /// Verify a bare token against the current wall clock.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    pub(crate) fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedToken, AuthError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AuthError::InvalidCredential
            })?;
        let claims = data.claims;

        // Signature is valid at this point; only now does expiry matter.
        let expires_at = claims
            .exp
            .as_ref()
            .and_then(parse_exp)
            .ok_or(AuthError::InvalidCredential)?;
        if expires_at <= now {
            return Err(AuthError::ExpiredCredential);
        }

        let subject = claims
            .sub
            .as_ref()
            .and_then(parse_subject)
            .or_else(|| claims.user_id.as_ref().and_then(parse_subject))
            .ok_or(AuthError::InvalidCredential)?;

        Ok(VerifiedToken {
            principal: Principal::new(subject),
            issued_at: claims.iat.as_ref().and_then(Value::as_i64),
            expires_at,
            embedded_admin: claims.is_admin.as_ref().and_then(Value::as_bool),
        })
    }
}

/// `Bearer <token>` -> `<token>`.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let token = header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AuthError::MissingCredential)?;

    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

// Accepts a JSON number (integral floats like 42.0 included) or a numeric string;
// the id must be non-negative.
fn parse_subject(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (id >= 0).then_some(id)
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

// NumericDate seconds. A fractional part rounds up, so `exp <= now` stays exact for
// whole-second `now`.
fn parse_exp(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
            .map(|f| f.ceil() as i64)
    })
}
