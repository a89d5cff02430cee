//! Per-conversation persisted state.
//!
//! One `ConversationSession` serves both collection modes behind a
//! mode-tagged cursor, so section ordering, entry counters, and follow-up
//! bookkeeping cannot drift between them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assisted::context::ConversationContext;
use crate::flow::guided::GuidedCursor;
use crate::flow::Category;
use crate::record::ResumeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Guided,
    Assisted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Assisted mode tracks only the active section; question-level position is
/// the model's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistedCursor {
    pub category: Category,
    entry_counts: HashMap<Category, usize>,
}

impl AssistedCursor {
    pub fn new() -> Self {
        Self {
            category: Category::Intro,
            entry_counts: HashMap::new(),
        }
    }

    pub fn entry_index(&self, category: Category) -> usize {
        self.entry_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn record_entry_added(&mut self, category: Category) {
        *self.entry_counts.entry(category).or_insert(0) += 1;
    }

    pub fn reset_entry_count(&mut self, category: Category) {
        self.entry_counts.insert(category, 0);
    }
}

impl Default for AssistedCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Cursor {
    Guided(GuidedCursor),
    Assisted(AssistedCursor),
}

/// Follow-up questions asked per category. Counters reset when the cursor
/// (re)enters a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowUpCounts {
    counts: HashMap<Category, u32>,
}

impl FollowUpCounts {
    pub fn count(&self, category: Category) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, category: Category) -> u32 {
        let c = self.counts.entry(category).or_insert(0);
        *c += 1;
        *c
    }

    pub fn reset(&mut self, category: Category) {
        self.counts.insert(category, 0);
    }
}

/// An extracted field below the confidence threshold, parked until the user
/// confirms or rejects it. Keyed by path: a newer extraction for the same
/// path replaces the pending one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnconfirmedField {
    pub path: String,
    pub value: serde_json::Value,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSession {
    pub id: Uuid,
    pub record: ResumeRecord,
    pub cursor: Cursor,
    pub transcript: Vec<ChatTurn>,
    pub follow_ups: FollowUpCounts,
    pub context: ConversationContext,
    pub unconfirmed: Vec<UnconfirmedField>,
    /// Monotonic per-session message counter. Extraction results carry the
    /// sequence they were issued for; a mismatch means a newer user message
    /// superseded them and they are discarded.
    pub message_seq: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How many transcript turns accompany an extraction request.
pub const TRANSCRIPT_TAIL: usize = 10;

impl ConversationSession {
    pub fn new(mode: Mode, language: &str) -> Self {
        let cursor = match mode {
            Mode::Guided => Cursor::Guided(GuidedCursor::new()),
            Mode::Assisted => Cursor::Assisted(AssistedCursor::new()),
        };
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            record: ResumeRecord::new(language),
            cursor,
            transcript: Vec::new(),
            follow_ups: FollowUpCounts::default(),
            context: ConversationContext::default(),
            unconfirmed: Vec::new(),
            message_seq: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.cursor {
            Cursor::Guided(_) => Mode::Guided,
            Cursor::Assisted(_) => Mode::Assisted,
        }
    }

    pub fn category(&self) -> Category {
        match &self.cursor {
            Cursor::Guided(c) => c.category(),
            Cursor::Assisted(c) => c.category,
        }
    }

    pub fn is_complete(&self) -> bool {
        match &self.cursor {
            Cursor::Guided(c) => c.is_complete(),
            Cursor::Assisted(c) => c.category == Category::Complete,
        }
    }

    pub fn entry_index(&self, category: Category) -> usize {
        match &self.cursor {
            Cursor::Guided(c) => c.entry_index(category),
            Cursor::Assisted(c) => c.entry_index(category),
        }
    }

    pub fn record_entry_added(&mut self, category: Category) {
        match &mut self.cursor {
            Cursor::Guided(c) => c.record_entry_added(category),
            Cursor::Assisted(c) => c.record_entry_added(category),
        }
    }

    /// Realigns the cursor to `category` and resets its follow-up counter.
    pub fn jump_to_section(&mut self, category: Category) {
        match &mut self.cursor {
            Cursor::Guided(c) => c.jump_to_section(category, &self.record),
            Cursor::Assisted(c) => c.category = category,
        }
        self.follow_ups.reset(category);
    }

    pub fn push_user(&mut self, content: &str) {
        self.push_turn("user", content);
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.push_turn("assistant", content);
    }

    fn push_turn(&mut self, role: &str, content: &str) {
        self.transcript.push(ChatTurn {
            role: role.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    pub fn transcript_tail(&self) -> Vec<ChatTurn> {
        let start = self.transcript.len().saturating_sub(TRANSCRIPT_TAIL);
        self.transcript[start..].to_vec()
    }

    /// Bumps and returns the sequence a new user message runs under.
    pub fn next_seq(&mut self) -> u64 {
        self.message_seq += 1;
        self.message_seq
    }
}
