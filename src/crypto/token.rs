use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// The name of the cookie that carries the session token.
pub const TOKEN_COOKIE: &str = "token";
/// How long a session token stays valid after issuance.
pub const TOKEN_TTL_HOURS: i64 = 2;

/// The identity embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerIdentity {
    /// The owner's identifier.
    pub id: String,
    /// The owner's email address.
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Failures while issuing or verifying a session token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No signing secret is configured.
    #[error("token signing secret is not configured")]
    MissingSecret,

    /// The signature does not match.
    #[error("token signature is invalid")]
    Invalid,

    /// The token is past its expiry.
    #[error("token has expired")]
    Expired,

    /// The input is not a structurally valid token.
    #[error("token is malformed")]
    Malformed,

    /// The claims could not be signed.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl TokenError {
    /// Whether the failure is on the server's side rather than the caller's.
    pub fn is_server_side(&self) -> bool {
        matches!(self, TokenError::MissingSecret | TokenError::Encoding(_))
    }
}

/// Issues and verifies signed, time-bounded session tokens (HS256).
#[derive(Clone)]
pub struct TokenService {
    secret: Option<Zeroizing<Vec<u8>>>,
    ttl: Duration,
}

impl TokenService {
    /// Creates a new `TokenService`.
    ///
    /// # Arguments
    ///
    /// * `secret` - The signing secret, if one is configured.
    pub fn new(secret: Option<Zeroizing<Vec<u8>>>) -> Self {
        Self {
            secret,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Returns how long issued tokens stay valid.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn secret(&self) -> Result<&[u8], TokenError> {
        self.secret
            .as_ref()
            .map(|s| s.as_slice())
            .ok_or(TokenError::MissingSecret)
    }

    /// Issues a token for `identity`, valid for two hours from now.
    pub fn issue(&self, identity: &OwnerIdentity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a token as if it had been minted at `issued_at`.
    ///
    /// The same identity and instant always produce the same token.
    pub fn issue_at(
        &self,
        identity: &OwnerIdentity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let secret = self.secret()?;

        let claims = Claims {
            id: identity.id.clone(),
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verifies signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<OwnerIdentity, TokenError> {
        let secret = self.secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::Invalid,
            _ => TokenError::Malformed,
        })?;

        Ok(OwnerIdentity {
            id: data.claims.id,
            email: data.claims.email,
        })
    }
}
