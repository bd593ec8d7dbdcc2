use serde::{Deserialize, Serialize};

use crate::errors::RequestError;
use crate::models::ContactStatus;

// ----------------- User Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

// ----------------- Prompt Requests -----------------

/// Tags arrive either as a JSON list or a comma-separated string, depending
/// on which client submitted the form. Normalized to a trimmed list with
/// empty entries dropped.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum TagsField {
    List(Vec<String>),
    Csv(String),
}

impl TagsField {
    pub fn normalize(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            TagsField::List(tags) => tags.iter().map(String::as_str).collect(),
            TagsField::Csv(csv) => csv.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreatePromptRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Option<TagsField>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl CreatePromptRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("prompt", &self.prompt),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(RequestError::Validation(format!("{} is required", field)));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdatePromptRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<TagsField>,
    pub image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RejectPromptRequest {
    /// Free text, empty string allowed.
    #[serde(default)]
    pub reason: Option<String>,
}

// ----------------- Like Requests -----------------
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Like,
    Unlike,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LikeRequest {
    #[serde(rename = "promptId")]
    pub prompt_id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub action: LikeAction,
}

// ----------------- Contact Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub category: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(RequestError::Validation(format!("{} is required", field)));
            }
        }
        if !is_valid_email(&self.email) {
            return Err(RequestError::Validation(
                "email address is not valid".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ContactStatusRequest {
    pub status: ContactStatus,
}

// ----------------- Admin Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct AssignSuperAdminRequest {
    pub email: String,
}

// ----------------- Generative Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct GeneratePromptRequest {
    pub prompt: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

// ----------------- Upload Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct UploadGeneratedImageRequest {
    /// Base64-encoded image bytes as returned by the generative API.
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Basic shape check: one `@`, non-empty local part, dotted domain, no
/// whitespace. Deliverability is the SMTP relay's problem.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = match parts.next() {
        Some(domain) => domain,
        None => return false,
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_normalize_from_list_and_csv() {
        let list = TagsField::List(vec![
            " sunset ".to_string(),
            String::new(),
            "mountains".to_string(),
        ]);
        assert_eq!(list.normalize(), vec!["sunset", "mountains"]);

        let csv = TagsField::Csv("sunset, ,mountains,".to_string());
        assert_eq!(csv.normalize(), vec!["sunset", "mountains"]);
    }

    #[test]
    fn tags_deserialize_both_shapes() {
        let from_list: CreatePromptRequest =
            serde_json::from_str(r#"{"title":"t","tags":["a","b"]}"#).unwrap();
        assert_eq!(from_list.tags.unwrap().normalize(), vec!["a", "b"]);

        let from_csv: CreatePromptRequest =
            serde_json::from_str(r#"{"title":"t","tags":"a, b"}"#).unwrap();
        assert_eq!(from_csv.tags.unwrap().normalize(), vec!["a", "b"]);
    }

    #[test]
    fn create_prompt_requires_all_fields() {
        let request: CreatePromptRequest =
            serde_json::from_str(r#"{"title":"t","description":"d","prompt":"p"}"#).unwrap();
        assert!(request.validate().is_err());

        let request: CreatePromptRequest = serde_json::from_str(
            r#"{"title":"t","description":"d","prompt":"p","category":"Art & Design"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@.com"));
    }
}
