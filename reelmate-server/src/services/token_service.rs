use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use reelmate_shared::errors::AppError;
use reelmate_shared::types::auth::Claims;

pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, AppError> {
    let claims = Claims::new(user_id, email.to_string(), ttl_secs);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("JWT encoding failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    #[test]
    fn token_round_trip_preserves_identity() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "a@x.com", "test-secret", 3600).unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, user_id);
        assert_eq!(decoded.claims.email, "a@x.com");
        assert!(!decoded.claims.is_expired());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let token = create_access_token(Uuid::new_v4(), "a@x.com", "test-secret", 3600).unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
