//! Authentication tests
//!
//! Session tokens and password hashing, without a database

use proptest::prelude::*;
use sapi_seto_backend::error::AppError;
use sapi_seto_backend::services::SessionCodec;
use shared::models::SessionUser;
use shared::types::UserRole;

fn admin() -> SessionUser {
    SessionUser {
        id: 1,
        name: "Imam Rafi".into(),
        username: "imamrafi".into(),
        role: UserRole::Admin,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_session_token_carries_user() {
        let codec = SessionCodec::new("test-secret", 86400);
        let session = codec.issue(&admin()).unwrap();

        assert_eq!(session.expires_in, 86400);
        assert_eq!(session.user, admin());
        assert_eq!(codec.verify(&session.token).unwrap().role, UserRole::Admin);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = SessionCodec::new("test-secret", 86400);
        let mut token = codec.issue(&admin()).unwrap().token;
        token.push('x');
        assert!(matches!(codec.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let codec = SessionCodec::new("test-secret", 86400);
        assert!(codec.verify("not-a-token").is_err());
        assert!(codec.verify("").is_err());
    }

    #[test]
    fn test_bcrypt_hash_verifies() {
        // Lowest cost keeps the test fast
        let hash = bcrypt::hash("password123", 4).unwrap();
        assert!(bcrypt::verify("password123", &hash).unwrap());
        assert!(!bcrypt::verify("password124", &hash).unwrap());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Any user survives a token round trip unchanged
    #[test]
    fn prop_token_round_trip(
        id in 1i64..1_000_000,
        name in "[A-Za-z ]{3,30}",
        username in "[a-z0-9]{3,16}",
        is_admin in any::<bool>(),
    ) {
        let user = SessionUser {
            id,
            name,
            username,
            role: if is_admin { UserRole::Admin } else { UserRole::Cashier },
        };
        let codec = SessionCodec::new("prop-secret", 3600);
        let token = codec.issue(&user).unwrap().token;
        prop_assert_eq!(codec.verify(&token).unwrap(), user);
    }
}
