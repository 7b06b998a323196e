use jiff::{Span, Timestamp};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token for API authentication (short-lived)
    Access,
    /// Refresh token for obtaining new access tokens (long-lived)
    Refresh,
}

/// JWT claims carrying user identity and token metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Username
    pub username: String,
    /// Token type (access or refresh)
    pub token_type: TokenType,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration time (unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(
        user_id: i32,
        email: String,
        username: String,
        token_type: TokenType,
        expiration_hours: i64,
    ) -> Self {
        let now = Timestamp::now();
        let exp = now
            .checked_add(Span::new().hours(expiration_hours))
            .unwrap_or(now);

        Self {
            sub: user_id.to_string(),
            email,
            username,
            token_type,
            iat: now.as_second(),
            exp: exp.as_second(),
        }
    }
}

/// Generates a signed JWT for a user.
pub fn generate_token(
    user_id: i32,
    email: String,
    username: String,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(user_id, email, username, token_type, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

pub fn generate_access_token(
    user_id: i32,
    email: String,
    username: String,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    generate_token(
        user_id,
        email,
        username,
        TokenType::Access,
        secret,
        expiration_hours,
    )
}

pub fn generate_refresh_token(
    user_id: i32,
    email: String,
    username: String,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    generate_token(
        user_id,
        email,
        username,
        TokenType::Refresh,
        secret,
        expiration_hours,
    )
}

/// Generates an (access, refresh) token pair.
pub fn generate_token_pair(
    user_id: i32,
    email: String,
    username: String,
    secret: &str,
    access_expiration_hours: i64,
    refresh_expiration_hours: i64,
) -> AppResult<(String, String)> {
    let access_token = generate_access_token(
        user_id,
        email.clone(),
        username.clone(),
        secret,
        access_expiration_hours,
    )?;
    let refresh_token =
        generate_refresh_token(user_id, email, username, secret, refresh_expiration_hours)?;
    Ok((access_token, refresh_token))
}

/// Validates and decodes a JWT, optionally checking the token type.
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })?;

    if let Some(expected) = expected_type {
        if claims.token_type != expected {
            return Err(AppError::Unauthorized {
                message: format!(
                    "Invalid token type: expected {:?}, got {:?}",
                    expected, claims.token_type
                ),
            });
        }
    }

    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing";

    #[test]
    fn test_generate_token() {
        let token = generate_token(
            1,
            "test@example.com".to_string(),
            "testuser".to_string(),
            TokenType::Access,
            TEST_SECRET,
            24,
        );

        assert!(token.is_ok());
        let token_str = token.unwrap();
        assert!(!token_str.is_empty());
        assert!(token_str.contains('.'));
    }

    #[test]
    fn test_generate_token_pair() {
        let result = generate_token_pair(
            1,
            "test@example.com".to_string(),
            "testuser".to_string(),
            TEST_SECRET,
            1,
            168,
        );

        assert!(result.is_ok());
        let (access_token, refresh_token) = result.unwrap();
        assert!(!access_token.is_empty());
        assert!(!refresh_token.is_empty());
        assert_ne!(access_token, refresh_token);
    }

    #[test]
    fn test_validate_token_success() {
        let token = generate_token(
            1,
            "test@example.com".to_string(),
            "testuser".to_string(),
            TokenType::Access,
            TEST_SECRET,
            24,
        )
        .unwrap();

        let claims = validate_token(&token, TEST_SECRET, None).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.username, "testuser");
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_wrong_token_type() {
        let access_token = generate_access_token(
            1,
            "test@example.com".to_string(),
            "testuser".to_string(),
            TEST_SECRET,
            1,
        )
        .unwrap();

        let result = validate_refresh_token(&access_token, TEST_SECRET);
        assert!(result.is_err());

        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("Invalid token type"));
        } else {
            panic!("Expected Unauthorized error for wrong token type");
        }
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let token = generate_token(
            1,
            "test@example.com".to_string(),
            "testuser".to_string(),
            TokenType::Access,
            TEST_SECRET,
            24,
        )
        .unwrap();

        let result = validate_token(&token, "wrong_secret", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token() {
        let token = generate_token(
            1,
            "test@example.com".to_string(),
            "testuser".to_string(),
            TokenType::Access,
            TEST_SECRET,
            -1, // already expired
        )
        .unwrap();

        let result = validate_token(&token, TEST_SECRET, None);
        assert!(result.is_err());

        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("expired"));
        } else {
            panic!("Expected Unauthorized error for expired token");
        }
    }

    #[test]
    fn test_claims_structure() {
        let claims = Claims::new(
            42,
            "user@example.com".to_string(),
            "username".to_string(),
            TokenType::Refresh,
            24,
        );

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert!(claims.exp > claims.iat);
    }
}
