use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// JWT Claims structure.
///
/// Whatever object the client posted to `/jwt` is carried in `extra`; only the
/// email is pulled out because ownership checks compare against it. A non-string
/// `email` stays in `extra` and reads back as no email at all.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_none"
    )]
    pub email: Option<String>,
    pub iat: usize, // Issued-at timestamp
    pub exp: usize, // Expiration timestamp
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

impl Claims {
    /// Build claims from a client payload. Any `exp`/`iat` the client sent is replaced.
    ///
    /// A string `email` in the payload becomes the claims' email; any other
    /// `email` value is kept verbatim in `extra`.
    pub fn from_payload(mut payload: Map<String, Value>, ttl_days: i64) -> Result<Self> {
        payload.remove("exp");
        payload.remove("iat");
        let email = match payload.remove("email") {
            Some(Value::String(email)) => Some(email),
            Some(other) => {
                payload.insert("email".into(), other);
                None
            }
            None => None,
        };

        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::days(ttl_days))
            .context("token lifetime overflows the calendar")?;

        Ok(Claims {
            email,
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
            extra: payload,
        })
    }
}

/// Sign a new JWT token.
pub fn sign(claims: &Claims, secret: &str) -> Result<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
///
/// Only the signature and `exp` are checked. Registered claims such as `aud`
/// are client data here, since `/jwt` signs whatever object it receives.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.validate_aud = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
