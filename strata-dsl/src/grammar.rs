//! The instruction grammar: an ordered table of (pattern, extractor)
//! entries evaluated in priority order.
//!
//! Ordering is load-bearing. Matching commits to the first rule whose
//! pattern matches and whose extractor accepts, so every rule that is a
//! more specific form of a later one must sit above it: table-shaping
//! rules come before the record-create rule (otherwise `create table x`
//! reads as a record insert into a table literally named `table`), and
//! the find-update form comes before plain update-by-id.

use crate::action::Action;
use crate::error::ParseError;
use crate::parser::parse_kv_pairs;
use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use strata_core::parse_fields_text;

/// One grammar rule. The extractor may decline (`Ok(None)`) to let later
/// rules have a try, or commit with an error when the shape matched but
/// the payload is unusable.
pub struct Rule {
    pub name: &'static str,
    regex: Regex,
    extract: fn(&Captures<'_>, &str) -> Result<Option<Action>, ParseError>,
}

impl Rule {
    fn new(
        name: &'static str,
        pattern: &str,
        extract: fn(&Captures<'_>, &str) -> Result<Option<Action>, ParseError>,
    ) -> Self {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .expect("grammar pattern compiles");
        Self {
            name,
            regex,
            extract,
        }
    }

    pub(crate) fn try_match(
        &self,
        instruction: &str,
    ) -> Result<Option<Action>, ParseError> {
        match self.regex.captures(instruction) {
            Some(caps) => (self.extract)(&caps, instruction),
            None => Ok(None),
        }
    }
}

/// The grammar, in priority order.
pub fn rules() -> &'static [Rule] {
    &RULES
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(
            "add_survey_questions",
            r"(?:add|store|save)\s+(?:these\s+|this\s+)?(?:survey\s+)?questions?\b\s*(?::|\s+to\s+(?:the\s+)?(?:db|database)\b)?\s*:?\s*(.*)",
            extract_survey,
        ),
        Rule::new(
            "add_to_database",
            r"(?:add|store|save)\s+(?:to|in)\s+(?:the\s+)?(?:mcp\s+)?(?:server\s+)?(?:db|database)\b\s*:?\s*(.*)",
            extract_survey,
        ),
        Rule::new(
            "create_table",
            r#"(?:create|add)\s+(?:a\s+)?table\s+['"]?(\w+)['"]?\s*(?:with\s+)?(?:fields?\s*:?\s*)?(.*)"#,
            extract_create_table,
        ),
        Rule::new(
            "alter_table",
            r#"alter\s+(?:the\s+)?table\s+['"]?(\w+)['"]?\s*(?:set\s+)?(?:fields?\s*:?\s*)?(.*)"#,
            extract_alter_table,
        ),
        Rule::new(
            "drop_table",
            r#"(?:drop|delete|remove)\s+(?:the\s+)?table\s+['"]?(\w+)['"]?"#,
            extract_drop_table,
        ),
        Rule::new(
            "find_update_and_get",
            r#"(?:update|change|edit)\s+(?:the\s+)?(?:record\s+)?(?:in\s+)?(?:table\s+)?['"]?(\w+)['"]?\s+where\s+(\w+)\s*(?:=|:|\s+is\b)\s*['"]?([^'"]+?)['"]?\s+set\s+(.+?)(?:\s+and\s+(?:get|return)(?:\s+it)?)?\s*$"#,
            extract_find_update_get,
        ),
        Rule::new(
            "update_record",
            r#"(?:update|change|edit)\s+(?:record\s+)?(?:id\s+)?(\d+)\s+(?:in\s+)?(?:table\s+)?['"]?(\w+)['"]?\s*(?:set\s+)?(.*)"#,
            extract_update,
        ),
        Rule::new(
            "get_record",
            r#"(?:get|fetch|read|show)\s+(?:record\s+)?(?:id\s+)?(\d+)\s+(?:from\s+)?(?:table\s+)?['"]?(\w+)['"]?"#,
            extract_get,
        ),
        Rule::new(
            "delete_record",
            r#"(?:delete|remove)\s+(?:record\s+)?(?:id\s+)?(\d+)\s+(?:from\s+)?(?:table\s+)?['"]?(\w+)['"]?"#,
            extract_delete,
        ),
        Rule::new(
            "list_records",
            r#"(?:list|show|get\s+all|fetch\s+all)\s+(?:all\s+)?(?:records?\s+)?(?:from\s+)?(?:table\s+)?['"]?(\w+)['"]?"#,
            extract_list,
        ),
        Rule::new(
            "create_record",
            r#"(?:add|create|insert)\s+(?:a\s+|an\s+)?(?:new\s+)?(?:record\s+)?(?:(?:in|into)\s+)?(?:table\s+)?['"]?(\w+)['"]?\s*(?:with\s+)?(.*)"#,
            extract_create_record,
        ),
    ]
});

// ============================================================================
// EXTRACTORS
// ============================================================================

fn extract_survey(caps: &Captures<'_>, raw: &str) -> Result<Option<Action>, ParseError> {
    let mut content = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    if content.is_empty() {
        if let Some((_, after)) = raw.split_once(':') {
            content = after.trim().to_string();
        }
    }
    if content.is_empty() {
        // Nothing to store; let a later rule claim the instruction.
        return Ok(None);
    }
    Ok(Some(Action::AddSurveyQuestions { content }))
}

fn extract_create_table(caps: &Captures<'_>, _raw: &str) -> Result<Option<Action>, ParseError> {
    let table_name = caps[1].to_string();
    let fields = parse_fields_text(caps.get(2).map_or("", |m| m.as_str()))?;
    Ok(Some(Action::CreateTable { table_name, fields }))
}

fn extract_alter_table(caps: &Captures<'_>, _raw: &str) -> Result<Option<Action>, ParseError> {
    let table_name = caps[1].to_string();
    let fields = parse_fields_text(caps.get(2).map_or("", |m| m.as_str()))?;
    Ok(Some(Action::AlterTable { table_name, fields }))
}

fn extract_drop_table(caps: &Captures<'_>, _raw: &str) -> Result<Option<Action>, ParseError> {
    Ok(Some(Action::DropTable {
        table_name: caps[1].to_string(),
    }))
}

fn extract_find_update_get(
    caps: &Captures<'_>,
    _raw: &str,
) -> Result<Option<Action>, ParseError> {
    let data = parse_kv_pairs(&caps[4]);
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(Action::FindUpdateGetRecord {
        table_name: caps[1].to_string(),
        field: caps[2].to_string(),
        value: caps[3].trim().to_string(),
        data,
    }))
}

fn extract_update(caps: &Captures<'_>, _raw: &str) -> Result<Option<Action>, ParseError> {
    let id = caps[1].parse().map_err(|_| ParseError::Unrecognized {
        instruction: caps[0].to_string(),
    })?;
    Ok(Some(Action::UpdateRecord {
        table_name: caps[2].to_string(),
        id,
        data: parse_kv_pairs(caps.get(3).map_or("", |m| m.as_str())),
    }))
}

fn extract_get(caps: &Captures<'_>, _raw: &str) -> Result<Option<Action>, ParseError> {
    let id = caps[1].parse().map_err(|_| ParseError::Unrecognized {
        instruction: caps[0].to_string(),
    })?;
    Ok(Some(Action::GetRecord {
        table_name: caps[2].to_string(),
        id,
    }))
}

fn extract_delete(caps: &Captures<'_>, _raw: &str) -> Result<Option<Action>, ParseError> {
    let id = caps[1].parse().map_err(|_| ParseError::Unrecognized {
        instruction: caps[0].to_string(),
    })?;
    Ok(Some(Action::DeleteRecord {
        table_name: caps[2].to_string(),
        id,
    }))
}

fn extract_list(caps: &Captures<'_>, _raw: &str) -> Result<Option<Action>, ParseError> {
    Ok(Some(Action::ListRecords {
        table_name: caps[1].to_string(),
    }))
}

fn extract_create_record(caps: &Captures<'_>, _raw: &str) -> Result<Option<Action>, ParseError> {
    Ok(Some(Action::CreateRecord {
        table_name: caps[1].to_string(),
        data: parse_kv_pairs(caps.get(2).map_or("", |m| m.as_str())),
    }))
}
