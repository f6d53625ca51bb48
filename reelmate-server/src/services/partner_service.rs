use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use reelmate_shared::errors::AppError;

use crate::models::{PartnerRequest, User};
use crate::schema::{partner_requests, users};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

/// A recipient's decision on a pending request.
pub fn is_decision(status: &str) -> bool {
    status == STATUS_ACCEPTED || status == STATUS_REJECTED
}

/// Point both users at each other. Both writes commit or roll back together
/// so the link can never be observed half-set. Any existing links on either
/// side are overwritten.
pub fn link_partners(
    conn: &mut PgConnection,
    user_id: Uuid,
    partner_id: Uuid,
) -> Result<User, AppError> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let updated: User = diesel::update(users::table.find(user_id))
            .set((
                users::partner_id.eq(Some(partner_id)),
                users::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)?;

        diesel::update(users::table.find(partner_id))
            .set((
                users::partner_id.eq(Some(user_id)),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        Ok(updated)
    })
    .map_err(AppError::from)
}

/// Clear the caller's link and, if the far side still points back, clear it
/// too. Returns whether a link was removed. Request history is untouched.
pub fn unlink_partners(conn: &mut PgConnection, user_id: Uuid) -> Result<bool, AppError> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let partner_id: Option<Uuid> = users::table
            .find(user_id)
            .select(users::partner_id)
            .first(conn)?;

        let Some(partner_id) = partner_id else {
            return Ok(false);
        };

        diesel::update(users::table.find(user_id))
            .set((
                users::partner_id.eq(None::<Uuid>),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        diesel::update(
            users::table
                .find(partner_id)
                .filter(users::partner_id.eq(user_id)),
        )
        .set((
            users::partner_id.eq(None::<Uuid>),
            users::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;

        Ok(true)
    })
    .map_err(AppError::from)
}

/// Apply the recipient's decision. Accepting links both users; the status
/// flip and both partner writes commit or roll back together.
pub fn resolve_request(
    conn: &mut PgConnection,
    request: &PartnerRequest,
    decision: &str,
) -> Result<PartnerRequest, AppError> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let updated: PartnerRequest = diesel::update(partner_requests::table.find(request.id))
            .set((
                partner_requests::status.eq(decision),
                partner_requests::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)?;

        if decision == STATUS_ACCEPTED {
            diesel::update(users::table.find(request.recipient_id))
                .set((
                    users::partner_id.eq(Some(request.requester_id)),
                    users::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            diesel::update(users::table.find(request.requester_id))
                .set((
                    users::partner_id.eq(Some(request.recipient_id)),
                    users::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
        }

        Ok(updated)
    })
    .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_accepted_and_rejected_are_decisions() {
        assert!(is_decision(STATUS_ACCEPTED));
        assert!(is_decision(STATUS_REJECTED));
        assert!(!is_decision(STATUS_PENDING));
        assert!(!is_decision("maybe"));
        assert!(!is_decision(""));
    }
}
