use serde::{Deserialize, Serialize};

use super::response::{ProfileResponse, PromptResponse};

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

impl<T> UserWrapper<T> {
    pub fn wrap_with_user_data(request: T) -> UserWrapper<T> {
        UserWrapper { user: request }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileWrapper {
    pub profile: ProfileResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultiplePromptsWrapper {
    pub prompts: Vec<PromptResponse>,
    #[serde(rename = "promptsCount")]
    pub prompts_count: usize,
}
