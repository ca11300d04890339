use crate::error::ProviderError;
use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    let mut end = from;
    for (i, c) in input[from..].char_indices() {
        if is_secret_char(c) {
            end = from + i + c.len_utf8();
        } else {
            break;
        }
    }
    end
}

fn scrub_after_marker(scrubbed: &mut String, marker: &str) {
    let mut search_from = 0;
    loop {
        let Some(rel) = scrubbed[search_from..].find(marker) else {
            break;
        };

        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        // Skip bare markers without a token value.
        if end == content_start {
            search_from = content_start;
            continue;
        }

        scrubbed.replace_range(start..end, "[REDACTED]");
        search_from = start + "[REDACTED]".len();
    }
}

const PATTERNS: [&str; 10] = [
    "sk-",
    "AIza",
    "ghp_",
    "Authorization: Bearer ",
    "authorization: bearer ",
    "api_key=",
    "access_token=",
    "key=",
    "\"api_key\":\"",
    "\"access_token\":\"",
];

/// Scrub known secret-like token patterns from provider error strings.
///
/// Covers the credential shapes this crate actually sends upstream: OpenAI
/// `sk-` keys, Google `AIza`/`key=` query credentials, bearer headers, and
/// the common JSON/query echo forms upstream error bodies use.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !PATTERNS.iter().any(|pattern| input.contains(pattern)) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for pattern in PATTERNS {
        scrub_after_marker(&mut scrubbed, pattern);
    }

    Cow::Owned(scrubbed)
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let scrubbed = scrubbed.as_ref();
    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &scrubbed[..end])
}

/// Build a sanitized `ProviderError::Http` from a failed upstream response.
pub async fn http_error(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    ProviderError::Http {
        provider: provider.to_string(),
        status,
        message: sanitize_api_error(&body),
    }
}
