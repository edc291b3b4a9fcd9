//! Authentication service for login and session tokens

use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::SessionUser;
use shared::types::{Id, UserRole};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub name: String,
    pub username: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Issued session
#[derive(Debug, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: SessionUser,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionCodec {
    secret: String,
    expiry: i64,
}

impl SessionCodec {
    pub fn new(secret: impl Into<String>, expiry: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt.secret.clone(), config.jwt.session_expiry)
    }

    /// Sign a token for the user
    pub fn issue(&self, user: &SessionUser) -> AppResult<SessionToken> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
            exp: (now + Duration::seconds(self.expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(SessionToken {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.expiry,
            user: user.clone(),
        })
    }

    /// Validate a token and return the user it carries
    pub fn verify(&self, token: &str) -> AppResult<SessionUser> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = data.claims;
        let id = claims.sub.parse::<Id>().map_err(|_| AppError::InvalidToken)?;

        Ok(SessionUser {
            id,
            name: claims.name,
            username: claims.username,
            role: claims.role,
        })
    }
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Id,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    codec: SessionCodec,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            codec: SessionCodec::from_config(config),
        }
    }

    /// Authenticate user with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<SessionToken> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, username, password_hash, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            tracing::info!(username, "Failed login attempt");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "User logged in");

        self.codec.issue(&SessionUser {
            id: user.id,
            name: user.name,
            username: user.username,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kasir() -> SessionUser {
        SessionUser {
            id: 2,
            name: "Kasir Toko".into(),
            username: "kasir".into(),
            role: UserRole::Cashier,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = SessionCodec::new("secret", 3600);
        let session = codec.issue(&kasir()).unwrap();
        assert_eq!(session.token_type, "Bearer");
        assert_eq!(codec.verify(&session.token).unwrap(), kasir());
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let token = SessionCodec::new("one", 3600).issue(&kasir()).unwrap().token;
        let result = SessionCodec::new("two", 3600).verify(&token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Past the default 60s leeway
        let token = SessionCodec::new("secret", -120).issue(&kasir()).unwrap().token;
        assert!(SessionCodec::new("secret", 3600).verify(&token).is_err());
    }
}
