use axum::http::{StatusCode, Uri};

mod contact;
mod generate;
mod likes;
mod moderation;
mod profiles;
mod prompts;
mod stats;
mod uploads;
mod users;

pub use contact::*;
pub use generate::*;
pub use likes::*;
pub use moderation::*;
pub use profiles::*;
pub use prompts::*;
pub use stats::*;
pub use uploads::*;
pub use users::*;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}
