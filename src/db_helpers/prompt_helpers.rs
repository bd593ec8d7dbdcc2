use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::{CreatePromptRequest, PromptQueryParams, UpdatePromptRequest};
use crate::errors::RequestError;
use crate::models::{placeholder_image, ApprovalStatus, Prompt};

use super::UpdateBuilder;

pub(crate) const PROMPT_COLUMNS: &str = "id, title, description, prompt, category, tags, image, \
     author, user_id, likes, approval_status, reviewed_by, reviewed_at, rejection_reason, \
     created_at, updated_at";

const SEARCH_CLAUSE: &str = " AND (instr(lower(title), lower(?)) > 0 \
     OR instr(lower(description), lower(?)) > 0 \
     OR instr(lower(prompt), lower(?)) > 0 \
     OR instr(lower(author), lower(?)) > 0 \
     OR instr(lower(category), lower(?)) > 0)";

pub async fn list_prompts_in_db(
    pool: &SqlitePool,
    params: &PromptQueryParams,
) -> Result<Vec<Prompt>, RequestError> {
    let status = params.status.unwrap_or(ApprovalStatus::Approved);
    let mut query = format!(
        "SELECT {} FROM prompts WHERE approval_status = ?",
        PROMPT_COLUMNS
    );
    let mut binds: Vec<String> = Vec::new();

    if let Some(category) = &params.category {
        query.push_str(" AND lower(category) = lower(?)");
        binds.push(category.clone());
    }
    if let Some(search) = &params.search {
        if !search.trim().is_empty() {
            query.push_str(SEARCH_CLAUSE);
            for _ in 0..5 {
                binds.push(search.clone());
            }
        }
    }
    // Trending is plain like-count order, ties broken by newest first. The
    // id tiebreak keeps pagination stable for rows created in the same
    // second.
    if params.sort.as_deref() == Some("trending") {
        query.push_str(" ORDER BY likes DESC, created_at DESC, id DESC");
    } else {
        query.push_str(" ORDER BY created_at DESC, id DESC");
    }
    query.push_str(" LIMIT ? OFFSET ?");

    let mut result = sqlx::query_as::<Sqlite, Prompt>(&query).bind(status);
    for bind in &binds {
        result = result.bind(bind.as_str());
    }
    let prompts = result
        .bind(i64::from(params.limit))
        .bind(i64::from(params.offset))
        .fetch_all(pool)
        .await?;
    Ok(prompts)
}

pub async fn get_prompt_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Prompt>, RequestError> {
    let query = format!("SELECT {} FROM prompts WHERE id = ?", PROMPT_COLUMNS);
    let result = sqlx::query_as::<Sqlite, Prompt>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn insert_prompt_in_db(
    pool: &SqlitePool,
    user_id: Option<i64>,
    author: &str,
    status: ApprovalStatus,
    request: &CreatePromptRequest,
) -> Result<Prompt, RequestError> {
    let tags = request
        .tags
        .as_ref()
        .map(|tags| tags.normalize().join(","))
        .unwrap_or_default();
    let image = match request.image.as_deref() {
        Some(image) if !image.trim().is_empty() => image.to_string(),
        _ => placeholder_image(&request.category).to_string(),
    };

    let query = format!(
        "INSERT INTO prompts (title, description, prompt, category, tags, image, author, \
         user_id, approval_status) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
        PROMPT_COLUMNS
    );
    let prompt = sqlx::query_as::<Sqlite, Prompt>(&query)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.prompt)
        .bind(&request.category)
        .bind(&tags)
        .bind(&image)
        .bind(author)
        .bind(user_id)
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(prompt)
}

pub async fn update_prompt_in_db(
    pool: &SqlitePool,
    id: i64,
    owner_id: i64,
    request: UpdatePromptRequest,
) -> Result<Prompt, RequestError> {
    let existing = match get_prompt_by_id(pool, id).await? {
        Some(prompt) => prompt,
        None => return Err(RequestError::NotFound("Prompt not found")),
    };
    if existing.user_id != Some(owner_id) {
        return Err(RequestError::Forbidden);
    }

    let builder = UpdateBuilder::new()
        .set("title", request.title)
        .set("description", request.description)
        .set("prompt", request.prompt)
        .set("category", request.category)
        .set("tags", request.tags.map(|tags| tags.normalize().join(",")))
        .set("image", request.image);
    if builder.is_empty() {
        return Ok(existing);
    }
    let (fragment, params) = builder.build();

    let query = format!(
        "UPDATE prompts SET {}, updated_at = CURRENT_TIMESTAMP WHERE id = ? AND user_id = ?",
        fragment
    );
    let mut result = sqlx::query(&query);
    for param in &params {
        result = result.bind(param.as_str());
    }
    result.bind(id).bind(owner_id).execute(pool).await?;

    match get_prompt_by_id(pool, id).await? {
        Some(prompt) => Ok(prompt),
        None => Err(RequestError::NotFound("Prompt not found")),
    }
}

/// Removes a prompt and its dependent like rows in one transaction, so a
/// failed prompt delete can never strand already-deleted likes.
pub async fn delete_prompt_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM likes WHERE prompt_id = ?")
        .bind(id)
        .execute(&mut tx)
        .await?;
    let result = sqlx::query("DELETE FROM prompts WHERE id = ?")
        .bind(id)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Prompt not found"));
    }
    tx.commit().await?;
    Ok(())
}

pub async fn approve_prompt_in_db(
    pool: &SqlitePool,
    id: i64,
    reviewer_id: i64,
) -> Result<Prompt, RequestError> {
    review_prompt(pool, id, reviewer_id, ApprovalStatus::Approved, None).await
}

pub async fn reject_prompt_in_db(
    pool: &SqlitePool,
    id: i64,
    reviewer_id: i64,
    reason: Option<String>,
) -> Result<Prompt, RequestError> {
    review_prompt(pool, id, reviewer_id, ApprovalStatus::Rejected, reason).await
}

async fn review_prompt(
    pool: &SqlitePool,
    id: i64,
    reviewer_id: i64,
    status: ApprovalStatus,
    reason: Option<String>,
) -> Result<Prompt, RequestError> {
    let existing = match get_prompt_by_id(pool, id).await? {
        Some(prompt) => prompt,
        None => return Err(RequestError::NotFound("Prompt not found")),
    };
    if existing.approval_status != ApprovalStatus::Pending {
        return Err(RequestError::Validation(
            "only pending prompts can be reviewed".to_string(),
        ));
    }

    sqlx::query(
        "UPDATE prompts SET approval_status = ?, reviewed_by = ?, \
         reviewed_at = CURRENT_TIMESTAMP, rejection_reason = ?, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ? AND approval_status = 'pending'",
    )
    .bind(status)
    .bind(reviewer_id)
    .bind(reason)
    .bind(id)
    .execute(pool)
    .await?;

    match get_prompt_by_id(pool, id).await? {
        Some(prompt) => Ok(prompt),
        None => Err(RequestError::NotFound("Prompt not found")),
    }
}

pub async fn count_prompts_by_status(
    pool: &SqlitePool,
    status: ApprovalStatus,
) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT COUNT(*) FROM prompts WHERE approval_status = ?",
    )
    .bind(status)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn count_prompts(pool: &SqlitePool) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM prompts")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
