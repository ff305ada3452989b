use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use shared::types::JwtClaims;

use crate::database::get_timestamp;

/// HS256 signing and verification keys derived from the configured secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mint a token for the given identity, valid for `ttl_secs`.
    pub fn issue(
        &self,
        username: &str,
        user_id: i64,
        role_id: Option<i64>,
        ttl_secs: u64,
    ) -> Result<String> {
        let now = get_timestamp().max(0) as usize;
        let claims = JwtClaims {
            name: username.to_string(),
            name_identifier: Some(user_id.to_string()),
            role_id: role_id.map(|id| id.to_string()),
            exp: now.saturating_add(usize::try_from(ttl_secs).unwrap_or(usize::MAX)),
            iat: now,
        };

        self.sign(&claims)
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &JwtClaims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .context("Failed to sign JWT")
    }

    /// Verify signature and expiry, returning the claims.
    pub fn decode(&self, token: &str) -> Result<JwtClaims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .context("Invalid JWT")?;
        Ok(data.claims)
    }
}
