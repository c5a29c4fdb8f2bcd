pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims, Role};

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use util::config;

/// Upper bound on token lifetime (one year).
const MAX_TOKEN_MINUTES: u64 = 60 * 24 * 365;

/// Signs a token for `subject` and returns it with its RFC 3339 expiry.
pub fn generate_jwt(
    subject: i64,
    admin: bool,
    role: Role,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let minutes = config::jwt_duration_minutes().min(MAX_TOKEN_MINUTES) as i64;
    let expiry = Utc::now() + Duration::minutes(minutes);

    let claims = Claims {
        sub: subject,
        exp: expiry.timestamp().max(0) as usize,
        admin,
        role,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
