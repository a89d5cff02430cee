//! The accumulated résumé record.
//!
//! The record is a nested `serde_json::Value` tree because both collection
//! modes address it with the same dot/bracket path strings the extraction
//! model emits. Typed helpers on [`ResumeRecord`] keep the gate-flag /
//! sequence-length invariant honest; everything else goes through the path
//! mutator.

pub mod normalize;
pub mod path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Gated collections: `(collection path, gate flag key)`.
///
/// Invariant: a flag explicitly `false` implies the paired collection is
/// empty. [`ResumeRecord::set_gate_flag`] and [`ResumeRecord::clear_section`]
/// maintain both sides together.
pub const GATE_PAIRS: &[(&str, &str)] = &[
    ("workExperience", "hasWorkExperience"),
    ("education", "hasEducation"),
    ("volunteering", "hasVolunteering"),
    ("references", "hasReferences"),
    ("skills.technicalSkills", "hasTechnicalSkills"),
    ("skills.softSkills", "hasSoftSkills"),
    ("skills.certifications", "hasCertifications"),
    ("skills.languages", "hasLanguages"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeRecord {
    data: Value,
}

impl ResumeRecord {
    /// Empty record skeleton. Gate flags start absent ("unanswered"), not
    /// `false` — absence must never trigger whole-section skipping.
    pub fn new(language: &str) -> Self {
        Self {
            data: json!({
                "language": language,
                "personalInfo": {},
                "workExperience": [],
                "education": [],
                "volunteering": [],
                "references": [],
                "skills": {
                    "technicalSkills": [],
                    "softSkills": [],
                    "certifications": [],
                    "languages": []
                }
            }),
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        path::get_path(&self.data, path)
    }

    pub fn set(&mut self, path: &str, value: Value) {
        path::set_path_mut(&mut self.data, path, value);
    }

    pub fn language(&self) -> &str {
        self.data
            .get("language")
            .and_then(|v| v.as_str())
            .unwrap_or("en")
    }

    /// `None` means the flag has not been answered yet.
    pub fn gate_flag(&self, flag: &str) -> Option<bool> {
        self.data.get(flag).and_then(|v| v.as_bool())
    }

    /// Sets a gate flag. Setting `false` also empties the paired collection
    /// so flag and sequence length never disagree.
    pub fn set_gate_flag(&mut self, flag: &str, value: bool) {
        self.set(flag, Value::Bool(value));
        if !value {
            if let Some((collection, _)) = GATE_PAIRS.iter().find(|(_, f)| *f == flag) {
                self.set(collection, json!([]));
            }
        }
    }

    /// Contradiction reset: replaces the value at `section_path` with
    /// `reset` (an empty sequence unless the extraction says otherwise) and
    /// forces the paired gate flag, if any, to `false`.
    pub fn clear_section(&mut self, section_path: &str, reset: Value) {
        self.set(section_path, reset);
        if let Some((_, flag)) = GATE_PAIRS.iter().find(|(c, _)| *c == section_path) {
            self.set(flag, Value::Bool(false));
        }
    }

    /// Number of entries currently stored under a collection path.
    pub fn section_len(&self, section_path: &str) -> usize {
        self.get(section_path)
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0)
    }

    /// Minimal-field check surfaced at the review step. Reports, never
    /// enforces: a name plus at least one contact channel.
    pub fn missing_minimal_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.has_nonempty_string("personalInfo.fullName") {
            missing.push("personalInfo.fullName");
        }
        let has_email = self.has_nonempty_string("personalInfo.email");
        let has_phone = self.has_nonempty_string("personalInfo.phone");
        if !has_email && !has_phone {
            missing.push("personalInfo.email|personalInfo.phone");
        }
        missing
    }

    fn has_nonempty_string(&self, path: &str) -> bool {
        self.get(path)
            .and_then(|v| v.as_str())
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_skeleton() {
        let r = ResumeRecord::new("en");
        assert_eq!(r.language(), "en");
        assert_eq!(r.section_len("workExperience"), 0);
        assert!(r.gate_flag("hasWorkExperience").is_none());
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let mut r = ResumeRecord::new("en");
        r.set("personalInfo.fullName", json!("Rosa Diaz"));
        assert_eq!(r.get("personalInfo.fullName"), Some(&json!("Rosa Diaz")));
    }

    #[test]
    fn test_gate_false_empties_collection() {
        let mut r = ResumeRecord::new("en");
        r.set("workExperience[0].company", json!("Acme"));
        assert_eq!(r.section_len("workExperience"), 1);

        r.set_gate_flag("hasWorkExperience", false);
        assert_eq!(r.gate_flag("hasWorkExperience"), Some(false));
        assert_eq!(r.section_len("workExperience"), 0);
    }

    #[test]
    fn test_gate_true_keeps_collection() {
        let mut r = ResumeRecord::new("en");
        r.set("education[0].school", json!("State U"));
        r.set_gate_flag("hasEducation", true);
        assert_eq!(r.section_len("education"), 1);
    }

    #[test]
    fn test_clear_section_resets_flag_and_entries() {
        let mut r = ResumeRecord::new("en");
        r.set_gate_flag("hasVolunteering", true);
        r.set("volunteering[0].organization", json!("Food Bank"));

        r.clear_section("volunteering", json!([]));
        assert_eq!(r.section_len("volunteering"), 0);
        assert_eq!(r.gate_flag("hasVolunteering"), Some(false));
    }

    #[test]
    fn test_clear_skills_sublist() {
        let mut r = ResumeRecord::new("en");
        r.set("skills.technicalSkills", json!(["forklift"]));
        r.clear_section("skills.technicalSkills", json!([]));
        assert_eq!(r.section_len("skills.technicalSkills"), 0);
        assert_eq!(r.gate_flag("hasTechnicalSkills"), Some(false));
    }

    #[test]
    fn test_minimal_fields_empty_record() {
        let r = ResumeRecord::new("en");
        let missing = r.missing_minimal_fields();
        assert!(missing.contains(&"personalInfo.fullName"));
        assert!(missing.contains(&"personalInfo.email|personalInfo.phone"));
    }

    #[test]
    fn test_minimal_fields_phone_counts_as_contact() {
        let mut r = ResumeRecord::new("en");
        r.set("personalInfo.fullName", json!("Rosa Diaz"));
        r.set("personalInfo.phone", json!("(555) 123-4567"));
        assert!(r.missing_minimal_fields().is_empty());
    }
}
