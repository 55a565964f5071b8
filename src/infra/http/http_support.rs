use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::core::errors::HelperError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const HELPER_USER_AGENT: &str = concat!("SummitLabHelpers/", env!("CARGO_PKG_VERSION"));

/// Builds the one client an invocation uses. No retries are layered on top.
pub fn build_client(bearer_token: Option<&str>, timeout: Duration) -> Result<Client, HelperError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(HELPER_USER_AGENT));
    if let Some(token) = bearer_token {
        headers.insert(AUTHORIZATION, bearer_header(token)?);
    }

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| HelperError::remote(format!("Failed to build HTTP client: {}", e)))
}

pub fn bearer_header(token: &str) -> Result<HeaderValue, HelperError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| HelperError::invalid_input("Token contains characters not allowed in a header"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Turn a non-success response into the matching error, keeping the body
/// text for the message.
pub async fn ensure_success(response: Response, what: &str) -> Result<Response, HelperError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = summarize_body(&body);
    tracing::debug!("{} failed with {}: {}", what, status, body);
    Err(HelperError::from_status(
        status.as_u16(),
        if detail.is_empty() {
            format!("{} failed", what)
        } else {
            format!("{} failed: {}", what, detail)
        },
    ))
}

/// Check the status, then decode the body.
pub async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, HelperError> {
    let response = ensure_success(response, what).await?;
    let status = response.status().as_u16();
    response.json::<T>().await.map_err(|e| HelperError::RemoteService {
        status: Some(status),
        message: format!("{} returned an unreadable body: {}", what, e),
    })
}

/// Error bodies can be whole HTML pages; keep the first line, capped.
fn summarize_body(body: &str) -> String {
    let first_line = body.lines().next().unwrap_or_default().trim();
    let mut summary: String = first_line.chars().take(200).collect();
    if first_line.chars().count() > 200 {
        summary.push_str("...");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_body() {
        assert_eq!(summarize_body(""), "");
        assert_eq!(summarize_body("  Unauthorized \nmore"), "Unauthorized");
        let long = "x".repeat(300);
        let summary = summarize_body(&long);
        assert_eq!(summary.len(), 203);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_bearer_header_rejects_newlines() {
        assert!(bearer_header("abc").is_ok());
        assert!(matches!(
            bearer_header("abc\ndef"),
            Err(HelperError::InvalidInput(_))
        ));
    }
}
