//! Integration tests for log redaction.

use design_review_app::redact_sensitive;

#[test]
fn log_redaction_tests_removes_bearer_tokens() {
    let redacted = redact_sensitive("authorization=Bearer abc123");

    assert!(redacted.contains("<redacted>"));
    assert!(!redacted.contains("abc123"));
}

#[test]
fn log_redaction_tests_removes_provider_api_keys() {
    let redacted = redact_sensitive("upstream said: invalid api_key: sk-live-999, retry later");

    assert!(!redacted.contains("sk-live-999"));
    assert!(redacted.ends_with(", retry later"));
}

#[test]
fn log_redaction_tests_keeps_words_that_only_contain_markers() {
    assert_eq!(
        redact_sensitive("max tokens exceeded"),
        "max tokens exceeded"
    );
}
