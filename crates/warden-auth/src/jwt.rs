//! Token issuance and verification.
//!
//! [`TokenCodec`] owns the HS256 signing and verification keys, built once from
//! [`JwtConfig`] at startup. Tokens are stateless: everything needed to accept one is in
//! its signed claims.
//!
//! Verification is strict:
//!
//! - the header algorithm must be exactly HS256, so a token signed with any other
//!   algorithm (or `none`) is rejected before its signature is looked at
//! - `exp` is required and checked with the configured leeway (0 by default)
//! - the payload must carry a recognised `type` tag
//!
//! # Example
//!
//! ```ignore
//! use warden_auth::TokenCodec;
//! use warden_config::JwtConfig;
//!
//! let codec = TokenCodec::new(&JwtConfig::from_env()?);
//! let sid = uuid::Uuid::new_v4();
//!
//! let pair = codec.issue_pair(identity.id, identity.uuid, sid)?;
//! let claims = codec.decode_access(&pair.access_token)?;
//! assert_eq!(claims.sid, sid);
//! ```

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use thiserror::Error;
use uuid::Uuid;

use warden_config::JwtConfig;

use crate::bearer::extract_bearer;
use crate::claims::{AccessClaims, RefreshClaims, TokenClaims, TokenKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("authorization header is missing")]
    Missing,

    #[error("authorization header is not a bearer credential")]
    MalformedHeader,

    #[error("token is invalid")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("expected {expected} token, found {found} token")]
    WrongKind {
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("session has been revoked")]
    Revoked,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Short label used for logs and metrics.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::MalformedHeader => "malformed_header",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
            Self::WrongKind { .. } => "wrong_kind",
            Self::Revoked => "revoked",
            Self::Signing(_) => "signing",
        }
    }
}

/// A signed token and the Unix time at which it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256];
        validation.leeway = config.leeway;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            access_ttl: config.access_token_expiry,
            refresh_ttl: config.refresh_token_expiry,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl
    }

    /// Clock skew tolerated past `exp`.
    pub fn leeway_secs(&self) -> i64 {
        i64::try_from(self.validation.leeway).unwrap_or(i64::MAX)
    }

    pub fn issue_access(
        &self,
        user_id: i64,
        user_uuid: Uuid,
        sid: Uuid,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = Utc::now().timestamp() + self.access_ttl;
        let claims = TokenClaims::Access(AccessClaims {
            user_id,
            user_uuid,
            sid,
            exp: expires_at,
        });

        Ok(IssuedToken {
            token: self.encode_claims(&claims)?,
            expires_at,
        })
    }

    pub fn issue_refresh(&self, user_uuid: Uuid, sid: Uuid) -> Result<IssuedToken, TokenError> {
        let expires_at = Utc::now().timestamp() + self.refresh_ttl;
        let claims = TokenClaims::Refresh(RefreshClaims {
            user_uuid,
            sid,
            exp: expires_at,
        });

        Ok(IssuedToken {
            token: self.encode_claims(&claims)?,
            expires_at,
        })
    }

    /// Issues an access and a refresh token for the same session.
    pub fn issue_pair(
        &self,
        user_id: i64,
        user_uuid: Uuid,
        sid: Uuid,
    ) -> Result<TokenPair, TokenError> {
        let access = self.issue_access(user_id, user_uuid, sid)?;
        let refresh = self.issue_refresh(user_uuid, sid)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in: self.access_ttl,
        })
    }

    /// Signs an arbitrary claim set. Issuance goes through the `issue_*` methods; this
    /// exists for callers that need to control `exp` directly.
    pub fn encode_claims(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies signature, algorithm and expiry, and returns the tagged claims.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }

    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        match self.decode(token)? {
            TokenClaims::Access(claims) => Ok(claims),
            TokenClaims::Refresh(_) => Err(TokenError::WrongKind {
                expected: TokenKind::Access,
                found: TokenKind::Refresh,
            }),
        }
    }

    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        match self.decode(token)? {
            TokenClaims::Refresh(claims) => Ok(claims),
            TokenClaims::Access(_) => Err(TokenError::WrongKind {
                expected: TokenKind::Refresh,
                found: TokenKind::Access,
            }),
        }
    }

    /// Validates a raw `Authorization` header value and returns its access claims.
    ///
    /// Revocation is not checked here; see [`crate::RevocationStore`].
    pub fn authenticate(&self, header: Option<&str>) -> Result<AccessClaims, TokenError> {
        let token = extract_bearer(header)?;
        self.decode_access(token)
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn codec() -> TokenCodec {
        TokenCodec::new(&JwtConfig::new(SECRET))
    }

    #[test]
    fn test_access_token_round_trip() {
        let codec = codec();
        let user_uuid = Uuid::new_v4();
        let sid = Uuid::new_v4();

        let issued = codec.issue_access(7, user_uuid, sid).unwrap();
        let claims = codec.decode_access(&issued.token).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.user_uuid, user_uuid);
        assert_eq!(claims.sid, sid);
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn test_access_token_expiry_is_fifteen_minutes() {
        let codec = codec();
        let before = Utc::now().timestamp();
        let issued = codec.issue_access(1, Uuid::new_v4(), Uuid::new_v4()).unwrap();
        let after = Utc::now().timestamp();

        assert!(issued.expires_at >= before + 900);
        assert!(issued.expires_at <= after + 900);
    }

    #[test]
    fn test_pair_shares_session() {
        let codec = codec();
        let user_uuid = Uuid::new_v4();
        let sid = Uuid::new_v4();

        let pair = codec.issue_pair(3, user_uuid, sid).unwrap();
        assert_eq!(pair.expires_in, 900);

        let access = codec.decode_access(&pair.access_token).unwrap();
        let refresh = codec.decode_refresh(&pair.refresh_token).unwrap();

        assert_eq!(access.sid, refresh.sid);
        assert_eq!(refresh.user_uuid, user_uuid);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let codec = codec();
        let pair = codec.issue_pair(3, Uuid::new_v4(), Uuid::new_v4()).unwrap();

        assert_eq!(
            codec.decode_access(&pair.refresh_token),
            Err(TokenError::WrongKind {
                expected: TokenKind::Access,
                found: TokenKind::Refresh,
            })
        );
        assert_eq!(
            codec.decode_refresh(&pair.access_token),
            Err(TokenError::WrongKind {
                expected: TokenKind::Refresh,
                found: TokenKind::Access,
            })
        );
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let claims = TokenClaims::Access(AccessClaims {
            user_id: 1,
            user_uuid: Uuid::new_v4(),
            sid: Uuid::new_v4(),
            exp: Utc::now().timestamp() - 120,
        });
        let token = codec.encode_claims(&claims).unwrap();

        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_leeway_accepts_recently_expired_token() {
        let mut config = JwtConfig::new(SECRET);
        config.leeway = 300;
        let codec = TokenCodec::new(&config);

        let claims = TokenClaims::Refresh(RefreshClaims {
            user_uuid: Uuid::new_v4(),
            sid: Uuid::new_v4(),
            exp: Utc::now().timestamp() - 60,
        });
        let token = codec.encode_claims(&claims).unwrap();

        assert!(codec.decode_refresh(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret() {
        let token = codec()
            .issue_access(1, Uuid::new_v4(), Uuid::new_v4())
            .unwrap()
            .token;
        let other = TokenCodec::new(&JwtConfig::new(
            "different-secret-key-at-least-32-characters",
        ));

        assert_eq!(other.decode(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_other_hmac_algorithm_rejected() {
        let claims = TokenClaims::Access(AccessClaims {
            user_id: 1,
            user_uuid: Uuid::new_v4(),
            sid: Uuid::new_v4(),
            exp: Utc::now().timestamp() + 600,
        });
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(codec().decode(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        // {"alg":"none","typ":"JWT"} . {} . (no signature)
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.e30.";
        assert_eq!(codec().decode(token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_untagged_payload_rejected() {
        #[derive(serde::Serialize)]
        struct Legacy {
            user_id: i64,
            exp: i64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &Legacy {
                user_id: 1,
                exp: Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(codec().decode(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tampered_token() {
        let codec = codec();
        let token = codec
            .issue_access(1, Uuid::new_v4(), Uuid::new_v4())
            .unwrap()
            .token;
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[2] = "c2lnbmF0dXJl";
        let tampered = parts.join(".");

        assert_eq!(codec.decode(&tampered), Err(TokenError::Invalid));
        assert_eq!(codec.decode("not-a-token"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_authenticate_header() {
        let codec = codec();
        let pair = codec.issue_pair(9, Uuid::new_v4(), Uuid::new_v4()).unwrap();

        let header = format!("Bearer {}", pair.access_token);
        assert_eq!(codec.authenticate(Some(&header)).unwrap().user_id, 9);

        let refresh_header = format!("Bearer {}", pair.refresh_token);
        assert!(matches!(
            codec.authenticate(Some(&refresh_header)),
            Err(TokenError::WrongKind { .. })
        ));

        let lowercase = format!("bearer {}", pair.access_token);
        assert_eq!(
            codec.authenticate(Some(&lowercase)),
            Err(TokenError::MalformedHeader)
        );
        assert_eq!(codec.authenticate(None), Err(TokenError::Missing));
    }

    #[test]
    fn test_debug_does_not_leak_keys() {
        let debug = format!("{:?}", codec());
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("HS256"));
    }
}
