//! Merges model output into the record and decides assisted-mode control
//! flow. No rendering concerns here: this module's output is record
//! mutations and cursor movement.

use serde_json::{json, Value};

use crate::conversation::session::{ConversationSession, Cursor, UnconfirmedField};
use crate::flow::Category;
use crate::llm_client::extraction::{ExtractedField, ExtractionResponse};
use crate::record::normalize::{normalize_city_state, normalize_phone};
use crate::record::GATE_PAIRS;

/// Extractions at or above this confidence are applied directly; below it
/// they wait for explicit confirmation. The extraction prompt documents the
/// same split, so this is wire contract, not tuning.
pub const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Outcome of handing a model response to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    /// A newer user message superseded this response; nothing was applied.
    Stale,
}

/// Merges extracted fields into the record.
///
/// Clear fields first (contradiction resets), then regular fields split at
/// the confidence threshold: high-confidence values are normalized and
/// written through the path mutator; low-confidence values replace any
/// pending extraction for the same path and wait for confirmation.
pub fn apply_extracted_fields(session: &mut ConversationSession, fields: Vec<ExtractedField>) {
    let (clear_fields, regular): (Vec<_>, Vec<_>) = fields.into_iter().partition(|f| f.clear);

    for field in clear_fields {
        let reset = if field.value.is_null() {
            json!([])
        } else {
            field.value
        };
        session.record.clear_section(&field.path, reset);
        if let Some(category) = category_for_path(&field.path) {
            reset_entry_counter(session, category);
        }
    }

    let (high, low): (Vec<_>, Vec<_>) = regular
        .into_iter()
        .partition(|f| f.confidence >= CONFIDENCE_THRESHOLD);

    for field in high {
        apply_confirmed_field(session, &field.path, field.value);
    }

    for field in low {
        session.unconfirmed.retain(|u| u.path != field.path);
        session.unconfirmed.push(UnconfirmedField {
            path: field.path,
            value: field.value,
            confidence: field.confidence,
        });
    }
}

/// Applies a full model response: transcript, fields, cursor movement.
/// `seq` is the message sequence the extraction was issued for; a session
/// that has moved on discards the response unapplied.
pub fn handle_ai_response(
    session: &mut ConversationSession,
    response: ExtractionResponse,
    seq: u64,
) -> ResponseOutcome {
    if seq != session.message_seq {
        return ResponseOutcome::Stale;
    }

    session.push_assistant(&response.assistant_message);
    apply_extracted_fields(session, response.extracted_fields);

    if let Some(section) = response.suggested_section {
        session.jump_to_section(section);
    }
    if response.follow_up_needed {
        let category = session.category();
        session.follow_ups.increment(category);
    }
    if response.is_complete {
        session.jump_to_section(Category::Complete);
    }
    ResponseOutcome::Applied
}

/// Whether another follow-up question is allowed in this category before
/// forcing progression.
pub fn should_continue_follow_up(category: Category, count: u32) -> bool {
    count < category.follow_up_limit()
}

/// Resolves a pending low-confidence extraction. `accept` writes it through
/// the same normalization as a high-confidence field; reject just drops it.
/// Returns `false` when no pending field matches the path.
pub fn resolve_unconfirmed(session: &mut ConversationSession, path: &str, accept: bool) -> bool {
    let Some(pos) = session.unconfirmed.iter().position(|u| u.path == path) else {
        return false;
    };
    let field = session.unconfirmed.remove(pos);
    if accept {
        apply_confirmed_field(session, &field.path, field.value);
    }
    true
}

/// Writes one extraction the user's side of the contract already trusts.
/// Gate-flag paths go through `ResumeRecord::set_gate_flag` so a `false`
/// empties the paired collection; everything else is normalized and written
/// through the path mutator. Entity-bearing values (company, school,
/// organization, reference name) also land in the conversation context.
fn apply_confirmed_field(session: &mut ConversationSession, path: &str, value: Value) {
    if let Some((collection, flag)) = gate_pair_for_flag(path) {
        let Some(answer) = value.as_bool() else {
            // a non-bool at a flag path would corrupt the gate; drop it
            return;
        };
        session.record.set_gate_flag(flag, answer);
        if !answer {
            if let Some(category) = category_for_path(collection) {
                reset_entry_counter(session, category);
            }
        }
        session.context.add_topic(top_segment(collection));
        return;
    }
    let value = normalize_for_path(path, value);
    if let Some(entity) = entity_value(path, &value) {
        session.context.add_entity(entity);
    }
    session.record.set(path, value);
    session.context.add_topic(top_segment(path));
}

fn reset_entry_counter(session: &mut ConversationSession, category: Category) {
    match &mut session.cursor {
        Cursor::Guided(c) => c.reset_entry_count(category),
        Cursor::Assisted(c) => c.reset_entry_count(category),
    }
}

fn gate_pair_for_flag(path: &str) -> Option<(&'static str, &'static str)> {
    GATE_PAIRS.iter().copied().find(|(_, flag)| *flag == path)
}

/// Extracted string values worth remembering as named entities.
fn entity_value<'a>(path: &str, value: &'a Value) -> Option<&'a str> {
    const ENTITY_FIELDS: &[&str] = &[".company", ".school", ".organization", ".name"];
    if ENTITY_FIELDS.iter().any(|suffix| path.ends_with(suffix)) {
        value.as_str()
    } else {
        None
    }
}

/// Routes string values through the matching normalizer based on the path's
/// final segment.
fn normalize_for_path(path: &str, value: Value) -> Value {
    let Some(text) = value.as_str() else {
        return value;
    };
    if path.ends_with(".phone") || path.ends_with(".contact") {
        // .contact may hold an email; normalize_phone leaves those alone
        Value::String(normalize_phone(text))
    } else if path.ends_with(".location") || path.ends_with(".city") {
        Value::String(normalize_city_state(text))
    } else {
        value
    }
}

/// First path segment, used as the answered-topic key.
fn top_segment(path: &str) -> &str {
    let end = path
        .find(['.', '['])
        .unwrap_or(path.len());
    &path[..end]
}

fn category_for_path(path: &str) -> Option<Category> {
    match top_segment(path) {
        "workExperience" => Some(Category::Work),
        "education" => Some(Category::Education),
        "volunteering" => Some(Category::Volunteering),
        "references" => Some(Category::References),
        _ => None,
    }
}
