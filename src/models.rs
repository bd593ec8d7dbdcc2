use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a submitted prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Closed,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Prompt {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub category: String,
    /// Comma-joined in storage; split into a list at the response boundary.
    pub tags: String,
    pub image: String,
    pub author: String,
    /// None for anonymous legacy rows.
    pub user_id: Option<i64>,
    pub likes: i64,
    pub approval_status: ApprovalStatus,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<NaiveDateTime>,
    pub rejection_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Like {
    pub prompt_id: i64,
    pub user_id: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Follow {
    pub follower_id: i64,
    pub followed_id: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub category: String,
    pub status: ContactStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fallback gallery image for submissions that arrive without one.
pub fn placeholder_image(category: &str) -> &'static str {
    match category {
        "Art & Design" => "/placeholders/art-design.webp",
        "Photography" => "/placeholders/photography.webp",
        "Writing" => "/placeholders/writing.webp",
        "Marketing" => "/placeholders/marketing.webp",
        "Development" => "/placeholders/development.webp",
        _ => "/placeholders/default.webp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_falls_back_for_unknown_category() {
        assert_eq!(placeholder_image("Art & Design"), "/placeholders/art-design.webp");
        assert_eq!(placeholder_image("Knitting"), "/placeholders/default.webp");
    }
}
