//! Turn handling for both collection modes.
//!
//! Guided mode interprets the answer against the current question and moves
//! the cursor itself. Assisted mode runs the classifiers first; only when no
//! rule short-circuits does the turn go out to the extraction model. The
//! caller performs the model call so no session lock is held across the
//! network suspension point.

use serde::Serialize;
use serde_json::{json, Value};

use crate::assisted::fallback::{fallback_message, frustration_ack};
use crate::assisted::orchestrator::should_continue_follow_up;
use crate::classifiers::{
    detect_escape_phrase, detect_frustration, detect_no_email, detect_vague_answer,
};
use crate::conversation::session::{ConversationSession, Cursor};
use crate::flow::questions::InputKind;
use crate::flow::Category;
use crate::llm_client::extraction::ExtractionRequest;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<&'static str>,
    pub category: Category,
    pub complete: bool,
}

/// Result of the synchronous half of an assisted turn.
pub enum AssistedTurn {
    /// A classifier resolved the turn; no model call needed.
    Scripted(EngineReply),
    /// Hand this to the extraction backend, then apply its response under
    /// the same sequence number.
    NeedsExtraction {
        request: ExtractionRequest,
        seq: u64,
    },
}

fn prompt_for(session: &ConversationSession) -> EngineReply {
    match &session.cursor {
        Cursor::Guided(cursor) => {
            if cursor.is_complete() {
                return EngineReply {
                    message: fallback_message(Category::Complete, session.record.language())
                        .to_string(),
                    question_id: None,
                    category: Category::Complete,
                    complete: true,
                };
            }
            let q = cursor.current();
            let prompt = match session.record.language() {
                "es" => q.prompt_es,
                _ => q.prompt_en,
            };
            EngineReply {
                message: prompt.to_string(),
                question_id: Some(q.id),
                category: q.category,
                complete: false,
            }
        }
        Cursor::Assisted(c) => {
            let message = if c.category == Category::Intro {
                assisted_welcome(session.record.language()).to_string()
            } else {
                fallback_message(c.category, session.record.language()).to_string()
            };
            EngineReply {
                message,
                question_id: None,
                category: c.category,
                complete: c.category == Category::Complete,
            }
        }
    }
}

/// Opening message for a fresh session: the first question (guided) or the
/// intro script (assisted).
pub fn greeting(session: &mut ConversationSession) -> EngineReply {
    let reply = prompt_for(session);
    session.push_assistant(&reply.message);
    reply
}

// ───────────────────────────────────────────────────────────────────────
// Guided mode
// ───────────────────────────────────────────────────────────────────────

const AFFIRMATIVES: &[&str] = &[
    "yes", "yeah", "yep", "yup", "sure", "si", "sí", "claro", "ok", "okay", "correct",
    "right", "i do", "i have", "definitely", "of course",
];

const NEGATIVES: &[&str] = &["no", "nope", "nah", "not really", "none", "no.", "nothing"];

fn parse_confirm(text: &str) -> Option<bool> {
    let lowered = text.trim().trim_end_matches(['.', '!']).to_lowercase();
    if AFFIRMATIVES.contains(&lowered.as_str()) || lowered.starts_with("yes") {
        return Some(true);
    }
    if NEGATIVES.contains(&lowered.as_str())
        || lowered.starts_with("no ")
        || lowered.starts_with("i don't")
        || lowered.starts_with("i do not")
    {
        return Some(false);
    }
    None
}

fn parse_language(text: &str) -> Option<&'static str> {
    let lowered = text.trim().to_lowercase();
    if lowered.contains("espa") || lowered.contains("spanish") || lowered == "es" {
        return Some("es");
    }
    if lowered.contains("english") || lowered.contains("ingl") || lowered == "en" {
        return Some("en");
    }
    None
}

/// Splits a free-text list answer into array items for `skills.*` paths.
fn split_list(text: &str) -> Value {
    let items: Vec<Value> = text
        .split([',', ';', '\n'])
        .flat_map(|chunk| chunk.split(" and "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| json!(s))
        .collect();
    json!(items)
}

fn clarify_message(language: &str) -> &'static str {
    match language {
        "es" => "Perdón, no le entendí. ¿Es un sí o un no?",
        _ => "Sorry, I didn't catch that. Is that a yes or a no?",
    }
}

fn review_stay_message(language: &str) -> &'static str {
    match language {
        "es" => {
            "De acuerdo. Use el botón de regresar para volver a cualquier \
             pregunta y corregirla, y dígame cuando esté listo."
        }
        _ => {
            "Alright. Use the back button to return to any question and fix \
             it, then let me know when it looks good."
        }
    }
}

/// Handles one guided-mode answer and returns the next prompt.
pub fn handle_guided_message(session: &mut ConversationSession, text: &str) -> EngineReply {
    session.push_user(text);
    let language = session.record.language().to_string();

    let Cursor::Guided(ref cursor) = session.cursor else {
        return prompt_for(session);
    };
    if cursor.is_complete() {
        return prompt_for(session);
    }
    let q = cursor.current();
    let entry_idx = cursor.entry_index(q.category);

    if detect_frustration(text) {
        let mut reply = prompt_for(session);
        reply.message = format!("{} {}", frustration_ack(&language), reply.message);
        session.push_assistant(&reply.message);
        return reply;
    }

    match q.input_kind {
        InputKind::Select if q.id == "language_select" => {
            if let Some(lang) = parse_language(text) {
                session.record.set("language", json!(lang));
                advance(session);
            } else {
                let reply = EngineReply {
                    message: "English or Spanish? / ¿Inglés o español?".to_string(),
                    question_id: Some(q.id),
                    category: q.category,
                    complete: false,
                };
                session.push_assistant(&reply.message);
                return reply;
            }
        }
        InputKind::Confirm => match parse_confirm(text) {
            Some(answer) => {
                if q.id.ends_with("_add_another") {
                    if answer {
                        let category = q.category;
                        session.record_entry_added(category);
                        if let Cursor::Guided(c) = &mut session.cursor {
                            c.loop_to_section_details(category);
                        }
                    } else {
                        advance(session);
                    }
                } else if q.id == "review_confirm" {
                    if answer {
                        advance(session);
                    } else {
                        let reply = EngineReply {
                            message: review_stay_message(&language).to_string(),
                            question_id: Some(q.id),
                            category: q.category,
                            complete: false,
                        };
                        session.push_assistant(&reply.message);
                        return reply;
                    }
                } else {
                    if let Some(path) = q.resolved_path(entry_idx) {
                        if crate::record::GATE_PAIRS.iter().any(|(_, f)| *f == path) {
                            session.record.set_gate_flag(&path, answer);
                        } else {
                            session.record.set(&path, json!(answer));
                        }
                    }
                    advance(session);
                }
            }
            None => {
                let reply = EngineReply {
                    message: clarify_message(&language).to_string(),
                    question_id: Some(q.id),
                    category: q.category,
                    complete: false,
                };
                session.push_assistant(&reply.message);
                return reply;
            }
        },
        _ => {
            // free-text answers
            if q.input_kind == InputKind::Email && detect_no_email(text) {
                session.record.set("personalInfo.noEmail", json!(true));
                advance(session);
            } else if detect_escape_phrase(text, Some(q.category)) {
                advance(session);
            } else {
                let verdict = detect_vague_answer(text, q.category);
                if verdict.is_vague {
                    let count = session.follow_ups.count(q.category);
                    if should_continue_follow_up(q.category, count) {
                        session.follow_ups.increment(q.category);
                        let reply = EngineReply {
                            message: verdict.follow_up.unwrap_or_else(|| {
                                clarify_message(&language).to_string()
                            }),
                            question_id: Some(q.id),
                            category: q.category,
                            complete: false,
                        };
                        session.push_assistant(&reply.message);
                        return reply;
                    }
                    // ceiling reached: take the thin answer and move on
                }
                if let Some(path) = q.resolved_path(entry_idx) {
                    let value = guided_value(q.input_kind, &path, text);
                    session.record.set(&path, value);
                }
                advance(session);
            }
        }
    }

    let reply = prompt_for(session);
    session.push_assistant(&reply.message);
    reply
}

fn guided_value(kind: InputKind, path: &str, text: &str) -> Value {
    use crate::record::normalize::{normalize_city_state, normalize_phone};
    let text = text.trim();
    match kind {
        InputKind::Phone => json!(normalize_phone(text)),
        _ if path.ends_with(".location") => json!(normalize_city_state(text)),
        _ if path.starts_with("skills.") && path.ends_with('s') => split_list(text),
        _ => json!(text),
    }
}

fn advance(session: &mut ConversationSession) {
    let departed = session.category();
    if let Cursor::Guided(c) = &mut session.cursor {
        c.advance(&session.record);
    }
    if session.category() != departed {
        session.follow_ups.reset(departed);
    }
}

/// Guided-mode back action.
pub fn handle_guided_back(session: &mut ConversationSession) -> EngineReply {
    let departed = session.category();
    if let Cursor::Guided(c) = &mut session.cursor {
        c.retreat(&session.record);
    }
    if session.category() != departed {
        session.follow_ups.reset(departed);
    }
    let reply = prompt_for(session);
    session.push_assistant(&reply.message);
    reply
}

// ───────────────────────────────────────────────────────────────────────
// Assisted mode
// ───────────────────────────────────────────────────────────────────────

fn assisted_welcome(language: &str) -> &'static str {
    match language {
        "es" => {
            "¡Hola! Estoy aquí para ayudarle a armar su currículum. \
             Cuénteme un poco sobre usted y el tipo de trabajo que busca."
        }
        _ => {
            "Hi! I'm here to help you put a résumé together. Tell me a \
             little about yourself and the kind of work you're looking for."
        }
    }
}

fn no_email_ack(language: &str) -> &'static str {
    match language {
        "es" => {
            "No hay problema, podemos seguir sin correo electrónico. \
             ¿Cuál es un buen número de teléfono para usted?"
        }
        _ => {
            "No problem, we can skip email. What's a good phone number for \
             you instead?"
        }
    }
}

fn scripted(session: &mut ConversationSession, message: String) -> AssistedTurn {
    session.push_assistant(&message);
    AssistedTurn::Scripted(EngineReply {
        message,
        question_id: None,
        category: session.category(),
        complete: session.is_complete(),
    })
}

/// Synchronous half of an assisted turn: transcript, sequence bump, and the
/// classifier gauntlet. Returns either a scripted reply or the extraction
/// request to send out.
pub fn prepare_assisted_turn(session: &mut ConversationSession, text: &str) -> AssistedTurn {
    session.push_user(text);
    let seq = session.next_seq();
    let category = session.category();
    let language = session.record.language().to_string();

    if detect_frustration(text) {
        // the model should see the tone on whatever turn reaches it next
        session.context.user_tone = Some("frustrated".to_string());
        return scripted(session, frustration_ack(&language).to_string());
    }

    if category == Category::Personal && detect_no_email(text) {
        session.record.set("personalInfo.noEmail", json!(true));
        return scripted(session, no_email_ack(&language).to_string());
    }

    if detect_escape_phrase(text, Some(category)) {
        let next = category.next();
        session.jump_to_section(next);
        let message = fallback_message(session.category(), &language).to_string();
        return scripted(session, message);
    }

    let verdict = detect_vague_answer(text, category);
    if verdict.is_vague {
        let count = session.follow_ups.count(category);
        if should_continue_follow_up(category, count) {
            session.follow_ups.increment(category);
            let message = verdict
                .follow_up
                .unwrap_or_else(|| fallback_message(category, &language).to_string());
            return scripted(session, message);
        }
        // ceiling reached: force progression to the next section
        let next = category.next();
        session.jump_to_section(next);
        let message = fallback_message(session.category(), &language).to_string();
        return scripted(session, message);
    }

    AssistedTurn::NeedsExtraction {
        request: ExtractionRequest {
            user_message: text.to_string(),
            transcript: session.transcript_tail(),
            current_record: session.record.data().clone(),
            current_category: category,
            language,
            follow_up_count: session.follow_ups.count(category),
            conversation_context: Some(session.context.clone()),
        },
        seq,
    }
}

/// Degraded path when the extraction backend is unavailable: a scripted
/// per-category message so the conversation keeps moving.
pub fn assisted_fallback_reply(session: &mut ConversationSession, rate_limited: bool) -> EngineReply {
    let language = session.record.language().to_string();
    let message = if rate_limited {
        match language.as_str() {
            "es" => {
                "Estoy recibiendo muchas solicitudes en este momento. \
                 Espere unos segundos y vuelva a intentarlo."
                    .to_string()
            }
            _ => "I'm getting a lot of requests right now. Give me a few \
                  seconds and try again."
                .to_string(),
        }
    } else {
        fallback_message(session.category(), &language).to_string()
    };
    session.push_assistant(&message);
    EngineReply {
        message,
        question_id: None,
        category: session.category(),
        complete: session.is_complete(),
    }
}
