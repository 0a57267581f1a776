use super::*;

#[test]
fn token_estimate_basics() {
    assert_eq!(estimate_token_count(""), 0);
    assert_eq!(estimate_token_count("hello world"), 2);
    assert_eq!(estimate_token_count("This is a test."), 5);
}

#[test]
fn short_text_is_not_truncated() {
    let text = "a short catalog entry";
    assert_eq!(truncate_to_token_budget(text, 100), text);
}

#[test]
fn oversized_text_is_cut_at_word_boundary() {
    let text = "word ".repeat(600);
    let truncated = truncate_to_token_budget(&text, 100);

    assert!(estimate_token_count(&truncated) <= 100);
    assert!(!truncated.is_empty());
    assert!(!truncated.ends_with(' '));
    assert!(truncated.split_whitespace().all(|w| w == "word"));
}

#[test]
fn tiny_budget_still_keeps_one_word() {
    let truncated = truncate_to_token_budget("alpha beta gamma", 1);
    assert_eq!(truncated, "alpha");
}
