// file: src/parser/normalizer.rs
// description: Whitespace normalization for text extracted from PDF pages
// reference: PDF content stream text layout

use crate::error::Result;

pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, content: &str) -> Result<String> {
        let mut normalized = content.to_string();

        normalized = self.normalize_page_breaks(&normalized);
        normalized = self.normalize_line_endings(&normalized);
        normalized = self.normalize_blank_lines(&normalized);

        Ok(normalized.trim().to_string())
    }

    fn normalize_page_breaks(&self, content: &str) -> String {
        content.replace("\r\n", "\n").replace(['\r', '\u{000C}'], "\n\n")
    }

    fn normalize_line_endings(&self, content: &str) -> String {
        content
            .lines()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Runs of blank lines collapse to a single paragraph break.
    fn normalize_blank_lines(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut newlines = 0;

        for ch in content.chars() {
            if ch == '\n' {
                newlines += 1;
                if newlines <= 2 {
                    result.push(ch);
                }
            } else {
                newlines = 0;
                result.push(ch);
            }
        }

        result
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
