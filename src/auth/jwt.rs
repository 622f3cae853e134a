use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use uuid::Uuid;

use super::{Claims, TokenPair};
use crate::{config::AuthConfig, error::AppError};

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

/// Internal split between "ran out" and "never valid". Externally both are a
/// single unauthorized condition; the distinction exists for diagnostics.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        tracing::debug!(reason = %err, "token verification failed");
        AppError::unauthenticated("Token is invalid or expired")
    }
}

/// Issues and verifies HS256 tokens. Access and refresh tokens are signed
/// with distinct secrets, so one kind never verifies as the other.
#[derive(Clone)]
pub struct TokenService {
    access: JwtKeys,
    refresh: JwtKeys,
    access_ttl_secs: usize,
    refresh_ttl_secs: usize,
}

impl TokenService {
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl_secs: usize,
        refresh_ttl_secs: usize,
    ) -> Self {
        Self {
            access: JwtKeys::from_secret(access_secret),
            refresh: JwtKeys::from_secret(refresh_secret),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self::new(
            cfg.access_secret.as_bytes(),
            cfg.refresh_secret.as_bytes(),
            cfg.access_ttl_secs,
            cfg.refresh_ttl_secs,
        )
    }

    pub fn access_ttl_secs(&self) -> usize {
        self.access_ttl_secs
    }

    pub fn issue_access_token(&self, subject: &Uuid) -> Result<String, AppError> {
        issue(&self.access, subject, self.access_ttl_secs)
    }

    pub fn issue_refresh_token(&self, subject: &Uuid) -> Result<String, AppError> {
        issue(&self.refresh, subject, self.refresh_ttl_secs)
    }

    pub fn issue_pair(&self, subject: &Uuid) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject)?,
            refresh_token: self.issue_refresh_token(subject)?,
            token_type: "Bearer",
            expires_in: self.access_ttl_secs,
        })
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Uuid, TokenError> {
        verify(&self.access, token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Uuid, TokenError> {
        verify(&self.refresh, token)
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or(0)
}

fn issue(keys: &JwtKeys, subject: &Uuid, ttl_secs: usize) -> Result<String, AppError> {
    let iat = now_unix();
    let claims = Claims {
        sub: subject.to_string(),
        iat,
        exp: iat + ttl_secs,
    };

    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, &claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

fn verify(keys: &JwtKeys, token: &str) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &keys.dec, &validation).map_err(|err| {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    })?;

    Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{TokenError, TokenService};

    fn service() -> TokenService {
        TokenService::new(b"access-secret", b"refresh-secret", 600, 3600)
    }

    #[test]
    fn access_token_roundtrips_subject() {
        let service = service();
        let subject = Uuid::new_v4();
        let token = service
            .issue_access_token(&subject)
            .expect("token should encode");

        let verified = service
            .verify_access_token(&token)
            .expect("token should verify");
        assert_eq!(verified, subject);
    }

    #[test]
    fn refresh_token_roundtrips_subject() {
        let service = service();
        let subject = Uuid::new_v4();
        let token = service
            .issue_refresh_token(&subject)
            .expect("token should encode");

        let verified = service
            .verify_refresh_token(&token)
            .expect("token should verify");
        assert_eq!(verified, subject);
    }

    #[test]
    fn refresh_token_never_verifies_as_access_token() {
        let service = service();
        let subject = Uuid::new_v4();
        let refresh = service
            .issue_refresh_token(&subject)
            .expect("token should encode");

        let err = service
            .verify_access_token(&refresh)
            .expect_err("cross-kind verification should fail");
        assert_eq!(err, TokenError::Invalid);
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let subject = Uuid::new_v4();
        let other = TokenService::new(b"other-access", b"other-refresh", 600, 3600);
        let token = other
            .issue_access_token(&subject)
            .expect("token should encode");

        let err = service()
            .verify_access_token(&token)
            .expect_err("verification should fail");
        assert_eq!(err, TokenError::Invalid);
    }

    #[test]
    fn expired_token_reports_expired_not_a_different_subject() {
        // jsonwebtoken applies a 60s leeway, so back-date well past it.
        let service = TokenService::new(b"access-secret", b"refresh-secret", 0, 3600);
        let subject = Uuid::new_v4();

        let iat = super::now_unix() - 120;
        let claims = super::Claims {
            sub: subject.to_string(),
            iat,
            exp: iat,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(b"access-secret"),
        )
        .expect("token should encode");

        let err = service
            .verify_access_token(&token)
            .expect_err("expired token should fail");
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = service()
            .verify_access_token("not-a-jwt")
            .expect_err("garbage should fail");
        assert_eq!(err, TokenError::Invalid);
    }

    #[test]
    fn token_error_surfaces_as_unauthenticated() {
        let err: crate::error::AppError = TokenError::Expired.into();
        assert_eq!(err.code(), "unauthenticated");
        let err: crate::error::AppError = TokenError::Invalid.into();
        assert_eq!(err.code(), "unauthenticated");
    }
}
