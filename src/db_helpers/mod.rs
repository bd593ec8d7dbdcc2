use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

mod contact_helpers;
mod follow_helpers;
mod like_helpers;
mod prompt_helpers;
mod user_helpers;

pub use contact_helpers::*;
pub use follow_helpers::*;
pub use like_helpers::*;
pub use prompt_helpers::*;
pub use user_helpers::*;

pub(crate) const USER_COLUMNS: &str =
    "id, username, email, password, full_name, bio, website, location, image, created_at";

/// Accumulates `column = ?` fragments for dynamic UPDATE statements, binding
/// only the fields the request actually carried.
pub(crate) struct UpdateBuilder {
    columns: Vec<&'static str>,
    params: Vec<String>,
}

impl UpdateBuilder {
    pub(crate) fn new() -> Self {
        Self {
            columns: Vec::new(),
            params: Vec::new(),
        }
    }

    pub(crate) fn set(mut self, column: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.columns.push(column);
            self.params.push(value);
        }
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the `SET` fragment and the parameters to bind, in order.
    pub(crate) fn build(self) -> (String, Vec<String>) {
        let fragment = self
            .columns
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        (fragment, self.params)
    }
}

// ----------------- Shared user lookups -----------------

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::UpdateBuilder;

    #[test]
    fn update_builder_skips_absent_fields() {
        let builder = UpdateBuilder::new()
            .set("title", Some("New".to_string()))
            .set("description", None)
            .set("category", Some("Writing".to_string()));
        let (fragment, params) = builder.build();
        assert_eq!(fragment, "title = ?, category = ?");
        assert_eq!(params, vec!["New", "Writing"]);
    }

    #[test]
    fn update_builder_reports_empty() {
        assert!(UpdateBuilder::new().set("title", None).is_empty());
    }
}
