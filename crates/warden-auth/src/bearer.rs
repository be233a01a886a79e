use crate::jwt::TokenError;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-sensitively and exactly one space must follow it.
/// A missing header, another scheme, or an empty token are all rejected.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, TokenError> {
    let value = header.ok_or(TokenError::Missing)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(TokenError::MalformedHeader)?;

    if token.trim().is_empty() {
        return Err(TokenError::MalformedHeader);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_token() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer(None), Err(TokenError::Missing));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            extract_bearer(Some("Basic dXNlcjpwYXNz")),
            Err(TokenError::MalformedHeader)
        );
        assert_eq!(
            extract_bearer(Some("bearer abc.def.ghi")),
            Err(TokenError::MalformedHeader)
        );
        assert_eq!(
            extract_bearer(Some("abc.def.ghi")),
            Err(TokenError::MalformedHeader)
        );
    }

    #[test]
    fn test_rejects_empty_token() {
        assert_eq!(extract_bearer(Some("Bearer ")), Err(TokenError::MalformedHeader));
        assert_eq!(extract_bearer(Some("Bearer    ")), Err(TokenError::MalformedHeader));
        assert_eq!(extract_bearer(Some("Bearer")), Err(TokenError::MalformedHeader));
    }
}
