use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::models::NewMatch;
use crate::schema::matches;

/// Matches store the user pair normalised (smaller id first) so the
/// (media, pair) uniqueness key is independent of which side swiped last.
pub fn ordered_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Insert the match row for this pair and media unless it already exists.
/// Returns whether a new row was created.
pub fn record_match(
    conn: &mut PgConnection,
    media_id: Uuid,
    a: Uuid,
    b: Uuid,
) -> QueryResult<bool> {
    let (user1_id, user2_id) = ordered_pair(a, b);
    let inserted = diesel::insert_into(matches::table)
        .values(&NewMatch {
            media_id,
            user1_id,
            user2_id,
        })
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(inserted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_ordered_regardless_of_argument_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(ordered_pair(a, b), ordered_pair(b, a));
    }

    #[test]
    fn smaller_id_comes_first() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let (first, second) = ordered_pair(a, b);
        assert!(first <= second);
    }

    #[test]
    fn identical_ids_are_preserved() {
        let a = Uuid::new_v4();
        assert_eq!(ordered_pair(a, a), (a, a));
    }
}
