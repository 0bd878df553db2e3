use section_core::tokenizer::{terms, tokenize};

#[test]
fn it_normalizes_and_lowercases() {
    let words = tokenize("Section ３０２ IPC: MURDER");
    assert_eq!(words, vec!["section", "302", "ipc", "murder"]);
}

#[test]
fn it_filters_stopwords_and_short_tokens() {
    let words = tokenize("The quick brown fox and the lazy dog, a b c");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(!words.iter().any(|w| w.chars().count() < 2));
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_builds_bigrams_across_removed_stopwords() {
    let t = terms("punishment for theft");
    assert_eq!(t, vec!["punishment", "theft", "punishment theft"]);
}
