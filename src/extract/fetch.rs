use crate::error::FetchError;
use std::time::Duration;

const USER_AGENT: &str = concat!("pageask/", env!("CARGO_PKG_VERSION"));

/// A downloaded page body plus the metadata extraction needs.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects.
    pub url: String,
    pub body: String,
    pub is_html: bool,
}

/// Download a page for extraction.
///
/// Non-HTML responses are still returned; the caller decides whether to run
/// the structured extractor or treat the body as plain text.
pub async fn fetch_page(url: &str, timeout_secs: u64) -> Result<FetchedPage, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let is_html = response
        .headers()
        .get_all(reqwest::header::CONTENT_TYPE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|ct| ct.contains("text/html"));

    let final_url = response.url().to_string();
    let body = response.text().await.map_err(|e| FetchError::Request {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok(FetchedPage {
        url: final_url,
        body,
        is_html,
    })
}
