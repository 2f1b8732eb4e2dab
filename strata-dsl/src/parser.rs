//! Dispatch loop and payload helpers.

use crate::action::Action;
use crate::error::ParseError;
use crate::grammar;
use once_cell::sync::Lazy;
use regex::Regex;
use strata_core::{RecordData, Value};

/// Resolve an instruction to exactly one typed action.
///
/// Rules are tried in grammar priority order and matching commits to the
/// first one that accepts. On no match the original text comes back in
/// the error — the caller sees exactly what failed to parse.
pub fn parse_instruction(instruction: &str) -> Result<Action, ParseError> {
    let raw = instruction.trim();
    for rule in grammar::rules() {
        if let Some(action) = rule.try_match(raw)? {
            return Ok(action);
        }
    }
    Err(ParseError::Unrecognized {
        instruction: raw.to_string(),
    })
}

static KV_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\w+)\s*[:=]\s*['"]?(.*?)['"]?$"#).expect("kv pattern compiles"));

/// Parse an inline `key: value, key = value` payload into record data.
///
/// Values stay text: instruction-sourced data is untyped by design, the
/// same way a generic-mode table is. Parts without a `key: value` shape
/// are skipped rather than failing the whole instruction.
pub fn parse_kv_pairs(text: &str) -> RecordData {
    let mut data = RecordData::new();
    for part in split_outside_quotes(text) {
        if let Some(caps) = KV_RE.captures(part.trim()) {
            data.insert(
                caps[1].to_string(),
                Value::Text(caps[2].trim().to_string()),
            );
        }
    }
    data
}

/// Split on commas that sit outside single or double quotes.
fn split_outside_quotes(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    for (idx, c) in text.char_indices() {
        match (c, quote) {
            ('\'' | '"', None) => quote = Some(c),
            (c, Some(q)) if c == q => quote = None,
            (',', None) => {
                parts.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

// ============================================================================
// TESTS
// ============================================================================
