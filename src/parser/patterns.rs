// file: src/parser/patterns.rs
// description: compiled regex patterns for text boundaries and tokens
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Split boundaries, strongest first
    pub static ref PARAGRAPH_BREAK: Regex = Regex::new(
        r"\n[ \t]*\n"
    ).expect("PARAGRAPH_BREAK regex is valid");

    pub static ref SENTENCE_END: Regex = Regex::new(
        r#"[.!?]["')\]]*\s+"#
    ).expect("SENTENCE_END regex is valid");

    pub static ref LINE_BREAK: Regex = Regex::new(
        r"\n"
    ).expect("LINE_BREAK regex is valid");

    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).expect("WHITESPACE regex is valid");

    // Sentences within a retrieved passage
    pub static ref SENTENCE: Regex = Regex::new(
        r#"[^.!?\n]+(?:[.!?]+["')\]]*|\n|$)"#
    ).expect("SENTENCE regex is valid");

    // Word tokens for lexical scoring
    pub static ref WORD: Regex = Regex::new(
        r"[\p{L}\p{N}]+"
    ).expect("WORD regex is valid");
}

/// Lowercased word tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}
