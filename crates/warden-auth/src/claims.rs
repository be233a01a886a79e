//! Signed claim sets carried by access and refresh tokens.
//!
//! Both kinds are serialized flat with a `type` discriminator:
//!
//! ```text
//! {"type":"access","user_id":42,"user_uuid":"…","sid":"…","exp":1700000900}
//! {"type":"refresh","user_uuid":"…","sid":"…","exp":1700604800}
//! ```
//!
//! Decoding goes through [`TokenClaims`], so a payload without a recognised tag never
//! deserializes and callers must match on the kind before using the claims.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims of a short-lived access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Numeric identity id
    pub user_id: i64,
    /// Public identity UUID
    pub user_uuid: Uuid,
    /// Login session this token belongs to
    pub sid: Uuid,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Claims of a long-lived refresh token. Carries no numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub user_uuid: Uuid,
    pub sid: Uuid,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TokenClaims {
    Access(AccessClaims),
    Refresh(RefreshClaims),
}

impl TokenClaims {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Access(_) => TokenKind::Access,
            Self::Refresh(_) => TokenKind::Refresh,
        }
    }

    pub fn sid(&self) -> Uuid {
        match self {
            Self::Access(claims) => claims.sid,
            Self::Refresh(claims) => claims.sid,
        }
    }

    pub fn exp(&self) -> i64 {
        match self {
            Self::Access(claims) => claims.exp,
            Self::Refresh(claims) => claims.exp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
