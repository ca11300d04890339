//! End-to-end pipeline tests: HTML in, provider answer out, against a
//! mocked upstream.

use pageask::assistant::Assistant;
use pageask::extract::{ExtractOptions, extract};
use pageask::providers::openai::OpenAiProvider;
use pageask::providers::{ProviderOptions, create_provider};
use pageask::error::ProviderError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html>
<head>
    <title>Rust Release Notes</title>
    <meta name="description" content="What changed in this release">
</head>
<body>
    <nav>Home | About | Contact</nav>
    <div class="ads">Subscribe now!</div>
    <main>
        <h1>Rust 1.80</h1>
        <p>This release stabilizes LazyCell and LazyLock.</p>
    </main>
    <footer>All rights reserved</footer>
</body>
</html>"#;

#[tokio::test]
async fn extracted_page_text_reaches_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "It stabilizes LazyCell."}}]
        })))
        .mount(&server)
        .await;

    let content = extract(PAGE, "https://example.com/rust", &ExtractOptions::full());
    assert_eq!(content.title, "Rust Release Notes");
    assert!(content.content.contains("LazyCell"));
    assert!(!content.content.contains("Subscribe now"));

    let provider = OpenAiProvider::with_options(Some("sk-test"), Some(&server.uri()), None, 5);
    let assistant = Assistant::new(Box::new(provider));
    let answer = assistant
        .ask("what does this release stabilize?", &content.content)
        .await
        .unwrap();
    assert_eq!(answer, "It stabilizes LazyCell.");

    // The upstream request carried both the page context and the question.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    let user_content = body["messages"][1]["content"].as_str().unwrap();
    assert!(user_content.contains("LazyCell"));
    assert!(user_content.contains("what does this release stabilize?"));
}

#[tokio::test]
async fn upstream_failure_surfaces_as_typed_error_not_a_crash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::with_options(Some("sk-test"), Some(&server.uri()), None, 5);
    let assistant = Assistant::new(Box::new(provider));

    let err = assistant.ask("q", "ctx").await.unwrap_err();
    assert_eq!(err.status(), Some(502));

    let status = assistant.test_connection().await;
    assert!(!status.success);
    assert!(status.message.contains("502"));
}

#[tokio::test]
async fn unknown_provider_fails_fast_without_network() {
    let Err(err) = create_provider("llama9", Some("key"), &ProviderOptions::default()) else {
        panic!("unknown provider must not dispatch");
    };
    assert!(matches!(
        err,
        ProviderError::Unsupported { name } if name == "llama9"
    ));
}

#[tokio::test]
async fn degraded_extraction_still_feeds_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .mount(&server)
        .await;

    let mut opts = ExtractOptions::full();
    opts.denylist.push("not a selector !!!".to_string());
    let content = extract(PAGE, "https://example.com/rust", &opts);
    assert!(content.error.is_some());
    assert!(content.content.contains("LazyCell"));

    let provider = OpenAiProvider::with_options(Some("sk-test"), Some(&server.uri()), None, 5);
    let assistant = Assistant::new(Box::new(provider));
    let answer = assistant.ask("summarize", &content.content).await.unwrap();
    assert_eq!(answer, "ok");
}
