//! Guided-mode cursor over the question graph.
//!
//! The cursor is an index into `QUESTION_GRAPH` plus per-section entry
//! counters. Skip predicates and whole-section gate skipping are applied
//! while moving, in both directions. Running off the end sets a terminal
//! flag rather than an out-of-range index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::flow::questions::{
    first_detail_index, first_question_index, Question, QUESTION_GRAPH,
};
use crate::flow::Category;
use crate::record::ResumeRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidedCursor {
    index: usize,
    complete: bool,
    /// Zero-based index of the entry currently being collected, per section.
    entry_counts: HashMap<Category, usize>,
}

impl Default for GuidedCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl GuidedCursor {
    pub fn new() -> Self {
        Self {
            index: 0,
            complete: false,
            entry_counts: HashMap::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current(&self) -> &'static Question {
        &QUESTION_GRAPH[self.index.min(QUESTION_GRAPH.len() - 1)]
    }

    pub fn category(&self) -> Category {
        if self.complete {
            Category::Complete
        } else {
            self.current().category
        }
    }

    /// Entry index the current question applies to within its section.
    pub fn entry_index(&self, category: Category) -> usize {
        self.entry_counts.get(&category).copied().unwrap_or(0)
    }

    /// "Add another" was confirmed: the next pass over the section's detail
    /// questions collects the following entry.
    pub fn record_entry_added(&mut self, category: Category) {
        *self.entry_counts.entry(category).or_insert(0) += 1;
    }

    pub fn reset_entry_count(&mut self, category: Category) {
        self.entry_counts.insert(category, 0);
    }

    fn should_skip(&self, question: &Question, record: &ResumeRecord) -> bool {
        if let Some(skip) = question.skip {
            if skip(record, self.entry_index(question.category)) {
                return true;
            }
        }
        if question.gated {
            if let Some((_, flag)) = question.category.gated_section() {
                // Only an explicit "no" skips a whole section. Unanswered
                // means ask.
                if record.gate_flag(flag) == Some(false) {
                    return true;
                }
            }
        }
        false
    }

    /// Steps to the next question that should be asked. Sets the terminal
    /// flag when the sequence is exhausted.
    pub fn advance(&mut self, record: &ResumeRecord) {
        let mut i = self.index + 1;
        while i < QUESTION_GRAPH.len() && self.should_skip(&QUESTION_GRAPH[i], record) {
            i += 1;
        }
        if i >= QUESTION_GRAPH.len() {
            self.complete = true;
            self.index = QUESTION_GRAPH.len() - 1;
        } else {
            self.index = i;
        }
    }

    /// Mirror of [`advance`] in the negative direction; stops at index 0.
    pub fn retreat(&mut self, record: &ResumeRecord) {
        self.complete = false;
        let mut i = self.index;
        while i > 0 {
            i -= 1;
            if !self.should_skip(&QUESTION_GRAPH[i], record) {
                self.index = i;
                return;
            }
        }
        self.index = 0;
    }

    /// Realigns the cursor to the first askable question of a section. Used
    /// by assisted mode after a model-suggested section change.
    pub fn jump_to_section(&mut self, category: Category, record: &ResumeRecord) {
        if category == Category::Complete {
            self.complete = true;
            self.index = QUESTION_GRAPH.len() - 1;
            return;
        }
        let Some(start) = first_question_index(category) else {
            return;
        };
        self.complete = false;
        let mut i = start;
        while i < QUESTION_GRAPH.len() && self.should_skip(&QUESTION_GRAPH[i], record) {
            i += 1;
        }
        if i >= QUESTION_GRAPH.len() {
            self.complete = true;
            self.index = QUESTION_GRAPH.len() - 1;
        } else {
            self.index = i;
        }
    }

    /// Loops back to the section's first detail question for the next entry.
    pub fn loop_to_section_details(&mut self, category: Category) {
        if let Some(i) = first_detail_index(category) {
            self.index = i;
            self.complete = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answer_confirm(cursor: &mut GuidedCursor, record: &mut ResumeRecord, value: bool) {
        let q = cursor.current();
        if let Some(path) = q.resolved_path(cursor.entry_index(q.category)) {
            if crate::record::GATE_PAIRS.iter().any(|(_, f)| *f == path) {
                record.set_gate_flag(&path, value);
            } else {
                record.set(&path, json!(value));
            }
        }
        cursor.advance(record);
    }

    fn answer_text(cursor: &mut GuidedCursor, record: &mut ResumeRecord, text: &str) {
        let q = cursor.current();
        if let Some(path) = q.resolved_path(cursor.entry_index(q.category)) {
            record.set(&path, json!(text));
        }
        cursor.advance(record);
    }

    #[test]
    fn test_starts_at_language_question() {
        let cursor = GuidedCursor::new();
        assert_eq!(cursor.current().id, "language_select");
        assert_eq!(cursor.category(), Category::Language);
        assert!(!cursor.is_complete());
    }

    #[test]
    fn test_advance_steps_through_personal() {
        let record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        cursor.advance(&record);
        assert_eq!(cursor.current().id, "intro_objective");
        cursor.advance(&record);
        assert_eq!(cursor.current().id, "personal_name");
    }

    #[test]
    fn test_gate_false_skips_all_work_detail_questions() {
        let mut record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        // walk to work_has
        while cursor.current().id != "work_has" {
            cursor.advance(&record);
        }
        answer_confirm(&mut cursor, &mut record, false);
        // next stop must be education's gate, never work_company_1 etc.
        assert_eq!(cursor.current().id, "edu_has");
    }

    #[test]
    fn test_gate_true_presents_work_details() {
        let mut record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        while cursor.current().id != "work_has" {
            cursor.advance(&record);
        }
        answer_confirm(&mut cursor, &mut record, true);
        assert_eq!(cursor.current().id, "work_company_1");
    }

    #[test]
    fn test_is_current_skips_end_date() {
        let mut record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        while cursor.current().id != "work_has" {
            cursor.advance(&record);
        }
        answer_confirm(&mut cursor, &mut record, true);
        answer_text(&mut cursor, &mut record, "Acme Grocery");
        answer_text(&mut cursor, &mut record, "Cashier");
        answer_text(&mut cursor, &mut record, "March 2022");
        assert_eq!(cursor.current().id, "work_current_1");
        answer_confirm(&mut cursor, &mut record, true);
        assert_eq!(cursor.current().id, "work_responsibilities_1");
    }

    #[test]
    fn test_second_entry_uses_incremented_index() {
        let mut record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        while cursor.current().id != "work_add_another" {
            if cursor.current().id == "work_has" {
                answer_confirm(&mut cursor, &mut record, true);
            } else {
                answer_text(&mut cursor, &mut record, "something");
            }
        }
        cursor.record_entry_added(Category::Work);
        cursor.loop_to_section_details(Category::Work);
        assert_eq!(cursor.current().id, "work_company_1");
        assert_eq!(cursor.entry_index(Category::Work), 1);
        let q = cursor.current();
        assert_eq!(
            q.resolved_path(cursor.entry_index(Category::Work)).unwrap(),
            "workExperience[1].company"
        );
    }

    #[test]
    fn test_retreat_stops_at_zero() {
        let record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        cursor.retreat(&record);
        assert_eq!(cursor.current().id, "language_select");
        cursor.advance(&record);
        cursor.retreat(&record);
        assert_eq!(cursor.current().id, "language_select");
    }

    #[test]
    fn test_retreat_skips_same_questions_as_advance() {
        let mut record = ResumeRecord::new("en");
        record.set("personalInfo.noEmail", json!(true));
        let mut cursor = GuidedCursor::new();
        while cursor.current().id != "personal_phone" {
            cursor.advance(&record);
        }
        cursor.retreat(&record);
        // email question is skipped in reverse too
        assert_eq!(cursor.current().id, "personal_name");
    }

    #[test]
    fn test_jump_to_section() {
        let record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        cursor.jump_to_section(Category::Skills, &record);
        assert_eq!(cursor.current().id, "skills_overview");
        assert_eq!(cursor.category(), Category::Skills);
    }

    #[test]
    fn test_jump_to_gated_section_with_gate_false_lands_on_gate_question() {
        let mut record = ResumeRecord::new("en");
        record.set_gate_flag("hasWorkExperience", false);
        let mut cursor = GuidedCursor::new();
        cursor.jump_to_section(Category::Work, &record);
        // the gate question itself is never section-skipped
        assert_eq!(cursor.current().id, "work_has");
    }

    #[test]
    fn test_end_of_sequence_sets_complete() {
        let record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        for _ in 0..QUESTION_GRAPH.len() + 5 {
            cursor.advance(&record);
        }
        assert!(cursor.is_complete());
        assert_eq!(cursor.category(), Category::Complete);
        // index stays in range
        let _ = cursor.current();
    }

    #[test]
    fn test_full_no_work_walk_never_presents_work_details() {
        let mut record = ResumeRecord::new("en");
        let mut cursor = GuidedCursor::new();
        let mut seen = Vec::new();
        let mut guard = 0;
        while !cursor.is_complete() && guard < 200 {
            guard += 1;
            let q = cursor.current();
            seen.push(q.id);
            match q.id {
                "work_has" => answer_confirm(&mut cursor, &mut record, false),
                _ if q.input_kind == crate::flow::questions::InputKind::Confirm => {
                    answer_confirm(&mut cursor, &mut record, q.id != "edu_has")
                }
                _ => answer_text(&mut cursor, &mut record, "an answer here"),
            }
        }
        for banned in ["work_company_1", "work_title_1", "work_responsibilities_1"] {
            assert!(!seen.contains(&banned), "presented {banned}");
        }
        assert!(cursor.is_complete());
    }
}
