use serde::{Deserialize, Serialize};

use crate::config::GenerativeConfig;
use crate::data_formats::{GenerateResponse, InlineImage};
use crate::errors::RequestError;

/// Per-part ceiling, enforced before forwarding to bound cost and latency.
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;
pub const MAX_REFERENCE_IMAGES: usize = 5;

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    // The upstream API answers in camelCase but some responses use
    // snake_case. Both collapse to one shape here.
    #[serde(
        default,
        rename = "inlineData",
        alias = "inline_data",
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize, Debug)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Content,
}

/// One text part followed by any attached images as base64 inline data.
pub fn build_request(text: &str, images: &[(String, Vec<u8>)]) -> GenerateContentRequest {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let mut parts = vec![Part {
        text: Some(text.to_string()),
        inline_data: None,
    }];
    for (mime_type, bytes) in images {
        parts.push(Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.clone(),
                data: STANDARD.encode(bytes),
            }),
        });
    }
    GenerateContentRequest {
        contents: vec![Content { parts }],
    }
}

/// Rejects non-image and oversized parts before anything leaves the server.
pub fn validate_image_part(
    content_type: Option<&str>,
    len: usize,
) -> Result<String, RequestError> {
    let mime_type = match content_type {
        Some(mime_type) if mime_type.starts_with("image/") => mime_type.to_string(),
        Some(other) => {
            return Err(RequestError::Validation(format!(
                "unsupported content type {}, expected an image",
                other
            )))
        }
        None => {
            return Err(RequestError::Validation(
                "image part is missing a content type".to_string(),
            ))
        }
    };
    if len == 0 {
        return Err(RequestError::Validation("image part is empty".to_string()));
    }
    if len > MAX_IMAGE_BYTES {
        return Err(RequestError::Validation(format!(
            "image exceeds the {} byte limit",
            MAX_IMAGE_BYTES
        )));
    }
    Ok(mime_type)
}

/// Forwards the request to the configured model endpoint. Upstream failures
/// surface directly with their detail attached; there is no retry.
pub async fn call_generative(
    client: &reqwest::Client,
    config: &GenerativeConfig,
    request: &GenerateContentRequest,
) -> Result<GenerateResponse, RequestError> {
    let response = client
        .post(&config.api_url)
        .header("x-goog-api-key", &config.api_key)
        .json(request)
        .send()
        .await
        .map_err(|e| RequestError::Upstream(format!("generation failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(RequestError::Upstream(format!(
            "generation failed: upstream returned {}: {}",
            status, detail
        )));
    }

    let parsed: GenerateContentResponse = response
        .json()
        .await
        .map_err(|e| RequestError::Upstream(format!("generation failed: {}", e)))?;
    extract_result(parsed)
}

fn extract_result(response: GenerateContentResponse) -> Result<GenerateResponse, RequestError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| RequestError::Upstream("generation failed: empty response".to_string()))?;

    let mut text = None;
    let mut image = None;
    for part in candidate.content.parts {
        if text.is_none() {
            if let Some(part_text) = part.text {
                text = Some(part_text);
            }
        }
        if image.is_none() {
            if let Some(inline) = part.inline_data {
                image = Some(InlineImage {
                    mime_type: inline.mime_type,
                    data: inline.data,
                });
            }
        }
    }
    if text.is_none() && image.is_none() {
        return Err(RequestError::Upstream(
            "generation failed: response had no usable parts".to_string(),
        ));
    }
    Ok(GenerateResponse { text, image })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_non_image_and_oversize() {
        assert!(validate_image_part(Some("image/png"), 100).is_ok());
        assert!(matches!(
            validate_image_part(Some("text/plain"), 100),
            Err(RequestError::Validation(_))
        ));
        assert!(matches!(
            validate_image_part(None, 100),
            Err(RequestError::Validation(_))
        ));
        assert!(matches!(
            validate_image_part(Some("image/png"), MAX_IMAGE_BYTES + 1),
            Err(RequestError::Validation(_))
        ));
    }

    #[test]
    fn extract_handles_both_inline_data_casings() {
        let camel: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"QUJD"}}]}}]}"#,
        )
        .unwrap();
        let result = extract_result(camel).unwrap();
        assert_eq!(result.image.unwrap().mime_type, "image/png");

        let snake: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inline_data":{"mime_type":"image/png","data":"QUJD"}}]}}]}"#,
        )
        .unwrap();
        assert!(extract_result(snake).unwrap().image.is_some());
    }

    #[test]
    fn extract_fails_on_empty_candidates() {
        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_result(empty),
            Err(RequestError::Upstream(_))
        ));
    }

    #[test]
    fn build_request_attaches_images_as_base64() {
        let request = build_request("a sunset", &[("image/png".to_string(), vec![65, 66, 67])]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "a sunset");
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "QUJD");
    }
}
