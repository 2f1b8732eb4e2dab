//! Survey question splitting for the bulk convenience tool.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+[.)]\s*").expect("numbering pattern compiles"));

/// Split free text into individual questions.
///
/// One question per non-empty line, with leading numbering (`1. `, `2) `)
/// stripped. Text with no usable lines falls back to the whole trimmed
/// input as a single question; empty input yields nothing.
pub fn split_questions(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let mut questions = Vec::new();
    for line in trimmed.lines() {
        let line = NUMBERING_RE.replace(line, "");
        let line = line.trim();
        if !line.is_empty() {
            questions.push(line.to_string());
        }
    }
    if questions.is_empty() {
        vec![trimmed.to_string()]
    } else {
        questions
    }
}

// ============================================================================
// TESTS
// ============================================================================
