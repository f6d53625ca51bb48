use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{matches, media, partner_requests, swipes, users};

// --- Users ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub partner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

// --- Media ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = media)]
pub struct Media {
    pub id: Uuid,
    pub title: String,
    pub poster_url: Option<String>,
    pub genre: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Partner Requests ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = partner_requests)]
pub struct PartnerRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = partner_requests)]
pub struct NewPartnerRequest {
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: String,
}

// --- Swipes ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = swipes)]
pub struct Swipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub media_id: Uuid,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swipes)]
pub struct NewSwipe {
    pub user_id: Uuid,
    pub media_id: Uuid,
    pub liked: bool,
}

// --- Matches ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub media_id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub media_id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serialization_strips_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            display_name: None,
            avatar_url: None,
            partner_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@x.com");
    }
}
