//! Shared plumbing for chat-completions endpoints.
//!
//! Both remote models speak the same wire dialect: POST a JSON body with a
//! `messages` array, read `choices[0].message.content` back. Exactly one
//! attempt per call; retry policy is the caller's concern and the pipeline
//! deliberately has none.

use crate::error::{RemoteEndpoint, Result, VisaidError};
use serde_json::Value;

/// Pull the completion text out of a chat response body.
///
/// Returns `None` for missing or empty content; both count as malformed.
pub(crate) fn extract_content(value: &Value) -> Option<String> {
    value
        .pointer("/choices/0/message/content")?
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// POST `body` to `endpoint_url` and return the completion text.
pub(crate) async fn post_chat(
    client: &reqwest::Client,
    endpoint_url: &str,
    api_key: &str,
    body: &Value,
    which: RemoteEndpoint,
) -> Result<String> {
    let response = client
        .post(endpoint_url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| VisaidError::Remote {
            endpoint: which,
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(VisaidError::Remote {
            endpoint: which,
            status: Some(status.as_u16()),
            message: if detail.is_empty() {
                format!("endpoint returned {status}")
            } else {
                format!("endpoint returned {status}: {detail}")
            },
        });
    }

    let value: Value = response.json().await.map_err(|e| VisaidError::Remote {
        endpoint: which,
        status: Some(status.as_u16()),
        message: format!("response body was not JSON: {e}"),
    })?;

    extract_content(&value).ok_or_else(|| VisaidError::Remote {
        endpoint: which,
        status: Some(status.as_u16()),
        message: "malformed response: missing choices[0].message.content".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_content_happy_path() {
        let body = json!({
            "choices": [{"message": {"content": "a chair in front of you"}}]
        });
        assert_eq!(
            extract_content(&body),
            Some("a chair in front of you".to_string())
        );
    }

    #[test]
    fn test_extract_content_trims_whitespace() {
        let body = json!({"choices": [{"message": {"content": "  turn left \n"}}]});
        assert_eq!(extract_content(&body), Some("turn left".to_string()));
    }

    #[test]
    fn test_extract_content_missing_choices() {
        assert_eq!(extract_content(&json!({"error": "rate limited"})), None);
    }

    #[test]
    fn test_extract_content_empty_choices() {
        assert_eq!(extract_content(&json!({"choices": []})), None);
    }

    #[test]
    fn test_extract_content_empty_string_is_malformed() {
        let body = json!({"choices": [{"message": {"content": "   "}}]});
        assert_eq!(extract_content(&body), None);
    }

    #[test]
    fn test_extract_content_non_string_content() {
        let body = json!({"choices": [{"message": {"content": 42}}]});
        assert_eq!(extract_content(&body), None);
    }
}
