//! Status checking and contextual decoding for upstream responses.

use crate::errors::TransportError;
use reqwest::Response;
use serde::de::DeserializeOwned;

/// Maximum characters to keep from an upstream body in error context.
const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Returns the response if its status is 2xx, otherwise an `Api` error.
pub(crate) async fn check_response(response: Response) -> Result<Response, TransportError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(read_error_with_context(response).await)
    }
}

/// Reads a failed response into a `TransportError::Api` with a body preview.
///
/// The preview only ever reaches logs; callers see the narrowed error.
async fn read_error_with_context(response: Response) -> TransportError {
    let status_code = response.status().as_u16();

    let error_body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("Failed to read error body: {}", e));

    TransportError::Api {
        status_code,
        message: truncate_for_context(&error_body, ERROR_BODY_PREVIEW_LENGTH),
    }
}

/// Decodes `body` as `T`, reporting shape mismatches as `MalformedResponse`.
pub(crate) fn deserialize_with_context<T: DeserializeOwned>(
    body: &str,
    context: &str,
) -> Result<T, TransportError> {
    serde_json::from_str(body).map_err(|e| {
        TransportError::MalformedResponse(format!(
            "{context}: {e} | Context: {}",
            truncate_for_context(body, ERROR_BODY_PREVIEW_LENGTH)
        ))
    })
}

/// Truncates a string to `max_len` bytes on a char boundary, adding "..." if cut.
fn truncate_for_context(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncate_at = s
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..truncate_at])
    }
}
