use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{header::CONTENT_TYPE, Request},
    Extension, Json,
};

use crate::{
    config::Config,
    data_formats::{GeneratePromptRequest, GenerateResponse},
    errors::RequestError,
    generative::{build_request, call_generative, validate_image_part, MAX_REFERENCE_IMAGES},
};

const MISSING_GENERATIVE_CONFIG: &str = "GENERATIVE_API_URL and GENERATIVE_API_KEY must be set";

/// Accepts either JSON `{prompt, type}` or a multipart image to describe.
pub async fn generate_prompt(
    Extension(client): Extension<reqwest::Client>,
    Extension(config): Extension<Arc<Config>>,
    request: Request<Body>,
) -> Result<Json<GenerateResponse>, RequestError> {
    let generative = config
        .generative
        .as_ref()
        .ok_or(RequestError::Misconfigured(MISSING_GENERATIVE_CONFIG))?;

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let upstream_request = if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| RequestError::Validation(e.to_string()))?;
        let mut image = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| RequestError::Validation(e.to_string()))?
        {
            let name = field.name().map(str::to_string);
            if name.as_deref() == Some("image") {
                let mime_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RequestError::Validation(e.to_string()))?;
                let mime_type = validate_image_part(mime_type.as_deref(), bytes.len())?;
                image = Some((mime_type, bytes.to_vec()));
            }
        }
        let image = image.ok_or_else(|| {
            RequestError::Validation("multipart field 'image' is required".to_string())
        })?;
        build_request(
            "Describe this image as a detailed, reusable image-generation prompt.",
            &[image],
        )
    } else {
        let Json(body) = Json::<GeneratePromptRequest>::from_request(request, &())
            .await
            .map_err(|e| RequestError::Validation(e.to_string()))?;
        if body.prompt.trim().is_empty() {
            return Err(RequestError::Validation("prompt is required".to_string()));
        }
        let instruction = match body.kind.as_deref() {
            Some("enhance") => format!(
                "Rewrite and enrich this image-generation prompt while keeping its intent: {}",
                body.prompt
            ),
            _ => format!(
                "Write a detailed, high-quality image-generation prompt for: {}",
                body.prompt
            ),
        };
        build_request(&instruction, &[])
    };

    let result = call_generative(&client, generative, &upstream_request).await?;
    Ok(Json(result))
}

/// Multipart: a `prompt` text field, an optional `image` to edit and up to
/// five `reference` images for style.
pub async fn generate_image(
    Extension(client): Extension<reqwest::Client>,
    Extension(config): Extension<Arc<Config>>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, RequestError> {
    let generative = config
        .generative
        .as_ref()
        .ok_or(RequestError::Misconfigured(MISSING_GENERATIVE_CONFIG))?;

    let mut prompt = None;
    let mut images: Vec<(String, Vec<u8>)> = Vec::new();
    let mut reference_count = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::Validation(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("prompt") => {
                prompt = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| RequestError::Validation(e.to_string()))?,
                );
            }
            Some(name) if name == "image" || name.starts_with("reference") => {
                if name.starts_with("reference") {
                    reference_count += 1;
                    if reference_count > MAX_REFERENCE_IMAGES {
                        return Err(RequestError::Validation(format!(
                            "at most {} reference images are allowed",
                            MAX_REFERENCE_IMAGES
                        )));
                    }
                }
                let mime_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RequestError::Validation(e.to_string()))?;
                let mime_type = validate_image_part(mime_type.as_deref(), bytes.len())?;
                images.push((mime_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let prompt = match prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => {
            return Err(RequestError::Validation(
                "multipart field 'prompt' is required".to_string(),
            ))
        }
    };

    let upstream_request = build_request(&prompt, &images);
    let result = call_generative(&client, generative, &upstream_request).await?;
    Ok(Json(result))
}
