use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            email,
            iat: now,
            exp: now + duration_secs,
            jti: Uuid::now_v7(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Identity asserted by a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_claims_are_not_expired() {
        let claims = Claims::new(Uuid::new_v4(), "a@x.com".into(), 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn past_expiry_is_detected() {
        let mut claims = Claims::new(Uuid::new_v4(), "a@x.com".into(), 3600);
        claims.exp = Utc::now().timestamp() - 10;
        assert!(claims.is_expired());
    }

    #[test]
    fn auth_user_carries_identity() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, "a@x.com".into(), 3600);
        let user = AuthUser::from(claims);
        assert_eq!(user.id, id);
        assert_eq!(user.email, "a@x.com");
    }
}
