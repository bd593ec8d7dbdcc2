use std::sync::Arc;

use axum::{extract::Multipart, Extension, Json};

use crate::{
    config::Config,
    data_formats::{UploadGeneratedImageRequest, UploadResponse},
    errors::RequestError,
    generative::{validate_image_part, MAX_IMAGE_BYTES},
};

/// Multipart image upload. Local disk stands in for the hosted bucket; the
/// returned URL path is what gets stored on the prompt record.
pub async fn upload_image(
    Extension(config): Extension<Arc<Config>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, RequestError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != "file" && name != "image" {
            continue;
        }
        let mime_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RequestError::Validation(e.to_string()))?;
        let mime_type = validate_image_part(mime_type.as_deref(), bytes.len())?;
        let url = store_image_bytes(&config, &mime_type, &bytes).await?;
        return Ok(Json(UploadResponse { url }));
    }
    Err(RequestError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}

/// Persists an image the generative API returned as base64 inline data.
pub async fn upload_generated_image(
    Extension(config): Extension<Arc<Config>>,
    Json(request): Json<UploadGeneratedImageRequest>,
) -> Result<Json<UploadResponse>, RequestError> {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    if !request.mime_type.starts_with("image/") {
        return Err(RequestError::Validation(format!(
            "unsupported content type {}, expected an image",
            request.mime_type
        )));
    }
    let bytes = STANDARD
        .decode(&request.data)
        .map_err(|_| RequestError::Validation("data is not valid base64".to_string()))?;
    if bytes.is_empty() {
        return Err(RequestError::Validation("image data is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(RequestError::Validation(format!(
            "image exceeds the {} byte limit",
            MAX_IMAGE_BYTES
        )));
    }

    let url = store_image_bytes(&config, &request.mime_type, &bytes).await?;
    Ok(Json(UploadResponse { url }))
}

async fn store_image_bytes(
    config: &Config,
    mime_type: &str,
    bytes: &[u8],
) -> Result<String, RequestError> {
    let file_name = format!("{}.{}", uuid::Uuid::new_v4(), extension_for_mime(mime_type));
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|e| RequestError::Upstream(format!("failed to store upload: {}", e)))?;
    let path = config.upload_dir.join(&file_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| RequestError::Upstream(format!("failed to store upload: {}", e)))?;
    Ok(format!("/uploads/{}", file_name))
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/avif" => "avif",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config(upload_dir: PathBuf) -> Arc<Config> {
        Arc::new(Config {
            database_url: "sqlite::memory:".to_string(),
            service_key: None,
            generative: None,
            smtp: None,
            upload_dir,
        })
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/x-unknown"), "bin");
    }

    #[tokio::test]
    async fn upload_generated_image_writes_file() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().to_path_buf());
        let request = UploadGeneratedImageRequest {
            data: STANDARD.encode(b"not really a png"),
            mime_type: "image/png".to_string(),
        };
        let Json(response) = upload_generated_image(Extension(config), Json(request))
            .await
            .unwrap();
        assert!(response.url.starts_with("/uploads/"));
        assert!(response.url.ends_with(".png"));

        let file_name = response.url.trim_start_matches("/uploads/");
        let stored = std::fs::read(dir.path().join(file_name)).unwrap();
        assert_eq!(stored, b"not really a png");
    }

    #[tokio::test]
    async fn upload_generated_image_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().to_path_buf());

        let bad_mime = UploadGeneratedImageRequest {
            data: "QUJD".to_string(),
            mime_type: "text/plain".to_string(),
        };
        assert!(matches!(
            upload_generated_image(Extension(config.clone()), Json(bad_mime)).await,
            Err(RequestError::Validation(_))
        ));

        let bad_base64 = UploadGeneratedImageRequest {
            data: "%%%".to_string(),
            mime_type: "image/png".to_string(),
        };
        assert!(matches!(
            upload_generated_image(Extension(config), Json(bad_base64)).await,
            Err(RequestError::Validation(_))
        ));
    }
}
