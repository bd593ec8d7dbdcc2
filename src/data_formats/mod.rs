mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

use crate::models::ApprovalStatus;

#[derive(Deserialize, Serialize, Debug)]
pub struct PromptQueryParams {
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive substring match across title, description, prompt
    /// text, author and category.
    #[serde(default)]
    pub search: Option<String>,
    /// `trending` sorts by like count descending; anything else is newest
    /// first.
    #[serde(default)]
    pub sort: Option<String>,
    /// Listing non-approved prompts requires SuperAdmin.
    #[serde(default)]
    pub status: Option<ApprovalStatus>,
    #[serde(default = "get_default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

impl Default for PromptQueryParams {
    fn default() -> Self {
        PromptQueryParams {
            category: None,
            search: None,
            sort: None,
            status: None,
            limit: get_default_limit(),
            offset: 0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LikeQueryParams {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "promptId")]
    pub prompt_id: i64,
}

fn get_default_limit() -> u32 {
    20
}
