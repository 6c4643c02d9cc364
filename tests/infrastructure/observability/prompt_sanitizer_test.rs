use classroom_assistant::infrastructure::observability::sanitize_prompt;

#[test]
fn given_blank_prompt_when_sanitizing_then_marks_empty() {
    assert_eq!(sanitize_prompt("   \n\t"), "[EMPTY]");
}

#[test]
fn given_multiline_question_when_sanitizing_then_collapses_to_one_line() {
    assert_eq!(
        sanitize_prompt("What is\n  osmosis?\n"),
        "What is osmosis?"
    );
}

#[test]
fn given_long_prompt_when_sanitizing_then_truncates_with_total_length() {
    let prompt = "é".repeat(150);

    let sanitized = sanitize_prompt(&prompt);

    assert!(sanitized.starts_with(&"é".repeat(100)));
    assert!(sanitized.ends_with("... (150 chars total)"));
}

#[test]
fn given_credentials_when_sanitizing_then_redacts_every_occurrence() {
    let sanitized =
        sanitize_prompt("use api_key=abc123 and token=xyz then Bearer sk-live and token=again");

    assert!(!sanitized.contains("abc123"));
    assert!(!sanitized.contains("xyz"));
    assert!(!sanitized.contains("sk-live"));
    assert!(!sanitized.contains("again"));
    assert!(sanitized.contains("api_key=[REDACTED]"));
    assert!(sanitized.contains("Bearer [REDACTED]"));
}
