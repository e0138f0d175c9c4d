use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

/// User model for reading from database
/// Derives Queryable for SELECT operations and Selectable for type-safe column selection
#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// NewUser model for inserting new records
/// Derives Insertable for INSERT operations
///
/// The id is generated application-side (UUID v4); timestamps come from the
/// column defaults.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl NewUser {
    /// Builds an insertable user with a freshly generated id.
    pub fn new(
        username: String,
        email: String,
        password: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password,
            first_name,
            last_name,
        }
    }
}

/// UpdateUser model for partial updates
/// Derives AsChangeset for UPDATE operations with optional fields
///
/// `None` fields are left untouched by the UPDATE statement. The merge rules
/// (blank username/email ignored, names overwritten whenever supplied) live in
/// the service layer; by the time a changeset reaches the repository every
/// `Some` value is meant to be written.
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateUser {
    /// True when no column would be written.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_generates_distinct_ids() {
        let a = NewUser::new(
            "alice".into(),
            "alice@example.com".into(),
            "secret1".into(),
            None,
            None,
        );
        let b = NewUser::new(
            "bob".into(),
            "bob@example.com".into(),
            "secret2".into(),
            None,
            None,
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_changeset_is_detected() {
        assert!(UpdateUser::default().is_empty());
        let update = UpdateUser {
            first_name: Some(String::new()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
