use serde::{Deserialize, Serialize};

use crate::models::{ApprovalStatus, ContactMessage, ContactStatus, Prompt, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
}

impl UserResponse {
    pub fn new(
        User {
            username,
            email,
            bio,
            image,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            username,
            email,
            bio: bio.unwrap_or_default(),
            image,
            token,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ProfileResponse {
    pub username: String,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub bio: String,
    pub website: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub following: bool,
    /// Counted on demand from the follow edges, never persisted.
    #[serde(rename = "followersCount")]
    pub followers_count: i64,
    #[serde(rename = "followingCount")]
    pub following_count: i64,
}

impl ProfileResponse {
    pub fn new(user: User, following: bool, followers_count: i64, following_count: i64) -> Self {
        ProfileResponse {
            username: user.username,
            full_name: user.full_name,
            bio: user.bio.unwrap_or_default(),
            website: user.website,
            location: user.location,
            image: user.image,
            following,
            followers_count,
            following_count,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PromptResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image: String,
    pub author: String,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    pub likes: i64,
    #[serde(rename = "approvalStatus")]
    pub approval_status: ApprovalStatus,
    #[serde(rename = "reviewedBy")]
    pub reviewed_by: Option<i64>,
    #[serde(rename = "reviewedAt")]
    pub reviewed_at: Option<String>,
    #[serde(rename = "rejectionReason")]
    pub rejection_reason: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<Prompt> for PromptResponse {
    fn from(prompt: Prompt) -> Self {
        PromptResponse {
            id: prompt.id,
            title: prompt.title,
            description: prompt.description,
            prompt: prompt.prompt,
            category: prompt.category,
            tags: prompt
                .tags
                .split(',')
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            image: prompt.image,
            author: prompt.author,
            user_id: prompt.user_id,
            likes: prompt.likes,
            approval_status: prompt.approval_status,
            reviewed_by: prompt.reviewed_by,
            reviewed_at: prompt.reviewed_at.map(|at| at.to_string()),
            rejection_reason: prompt.rejection_reason,
            created_at: prompt.created_at.to_string(),
            updated_at: prompt.updated_at.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LikeResponse {
    #[serde(rename = "promptId")]
    pub prompt_id: i64,
    pub liked: bool,
    /// Denormalized counter after recomputation, for client reconciliation.
    pub likes: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LikeStatusResponse {
    #[serde(rename = "promptId")]
    pub prompt_id: i64,
    pub liked: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub category: String,
    pub status: ContactStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<ContactMessage> for ContactResponse {
    fn from(message: ContactMessage) -> Self {
        ContactResponse {
            id: message.id,
            name: message.name,
            email: message.email,
            subject: message.subject,
            message: message.message,
            category: message.category,
            status: message.status,
            created_at: message.created_at.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct StatsResponse {
    #[serde(rename = "totalPrompts")]
    pub total_prompts: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    #[serde(rename = "totalUsers")]
    pub total_users: i64,
    #[serde(rename = "totalLikes")]
    pub total_likes: i64,
    #[serde(rename = "contactMessages")]
    pub contact_messages: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct InlineImage {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GenerateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UploadResponse {
    pub url: String,
}
