//! Vague-answer detection with section-aware follow-up prompts.

use crate::classifiers::detect_escape_phrase;
use crate::flow::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct VagueVerdict {
    pub is_vague: bool,
    pub follow_up: Option<String>,
}

impl VagueVerdict {
    fn clear() -> Self {
        Self {
            is_vague: false,
            follow_up: None,
        }
    }

    fn vague(follow_up: &str) -> Self {
        Self {
            is_vague: true,
            follow_up: Some(follow_up.to_string()),
        }
    }
}

/// Clear negatives. Never vague: a "no" needs no follow-up.
const NO_VARIANTS: &[&str] = &["no", "nope", "nah", "no thanks", "not really", "none"];

/// Generic filler replies that carry no information.
const FILLER_REPLIES: &[&str] = &[
    "yes", "yeah", "yep", "ok", "okay", "sure", "um", "uh", "hmm", "idk",
    "i don't know", "dunno", "maybe", "i guess", "fine", "good", "cool",
];

const FILLER_FOLLOW_UP: &str =
    "Could you tell me a little more? Even a detail or two helps.";

fn elaboration_follow_up(category: Category) -> Option<&'static str> {
    match category {
        Category::Work => Some(
            "Could you tell me more about what you did there? \
             Tasks you handled, people you helped, anything you were proud of.",
        ),
        Category::Education => Some(
            "Could you share a bit more about your school or training? \
             The name and what you studied is a great start.",
        ),
        Category::Skills => {
            Some("Could you name a few specific skills? Anything counts, big or small.")
        }
        _ => None,
    }
}

/// Flags replies too thin to build a résumé line from.
///
/// Two independent rules: a fixed filler table ("yes", "um", "idk", ...)
/// is always vague with a generic prompt; in sections that need elaboration
/// (work, education, skills) any reply under three words that is not itself
/// an escape phrase is vague with a section-specific prompt.
pub fn detect_vague_answer(message: &str, category: Category) -> VagueVerdict {
    let msg = message.trim();
    if msg.is_empty() {
        return VagueVerdict::clear();
    }
    let lowered = msg
        .trim_end_matches(['.', '!', '?'])
        .to_lowercase();

    if NO_VARIANTS.contains(&lowered.as_str()) {
        return VagueVerdict::clear();
    }

    if FILLER_REPLIES.contains(&lowered.as_str()) {
        return VagueVerdict::vague(FILLER_FOLLOW_UP);
    }

    if let Some(prompt) = elaboration_follow_up(category) {
        let word_count = msg.split_whitespace().count();
        if word_count < 3 && !detect_escape_phrase(msg, Some(category)) {
            return VagueVerdict::vague(prompt);
        }
    }

    VagueVerdict::clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_variants_are_not_vague() {
        for msg in ["no", "Nope", "not really", "none", "No."] {
            let v = detect_vague_answer(msg, Category::Work);
            assert!(!v.is_vague, "{msg:?} should not be vague");
            assert!(v.follow_up.is_none());
        }
    }

    #[test]
    fn test_filler_replies_are_vague_in_any_section() {
        for msg in ["yes", "ok", "um", "idk", "maybe", "I guess"] {
            assert!(detect_vague_answer(msg, Category::Personal).is_vague);
            assert!(detect_vague_answer(msg, Category::Work).is_vague);
        }
        let v = detect_vague_answer("ok", Category::Review);
        assert_eq!(v.follow_up.as_deref(), Some(FILLER_FOLLOW_UP));
    }

    #[test]
    fn test_short_answer_in_work_is_vague_with_section_prompt() {
        let v = detect_vague_answer("stocked shelves", Category::Work);
        assert!(v.is_vague);
        assert!(v.follow_up.unwrap().contains("what you did there"));
    }

    #[test]
    fn test_short_answer_outside_elaboration_sections_is_fine() {
        let v = detect_vague_answer("Rosa Diaz", Category::Personal);
        assert!(!v.is_vague);
        assert!(!detect_vague_answer("Austin TX", Category::Review).is_vague);
    }

    #[test]
    fn test_short_escape_phrase_is_not_vague() {
        assert!(!detect_vague_answer("skip", Category::Work).is_vague);
        assert!(!detect_vague_answer("move on", Category::Skills).is_vague);
    }

    #[test]
    fn test_three_word_answers_pass() {
        assert!(!detect_vague_answer("cooked and cleaned", Category::Work).is_vague);
    }

    #[test]
    fn test_education_and_skills_prompts_differ() {
        let edu = detect_vague_answer("school", Category::Education)
            .follow_up
            .unwrap();
        let skills = detect_vague_answer("typing", Category::Skills)
            .follow_up
            .unwrap();
        assert!(edu.contains("school or training"));
        assert!(skills.contains("specific skills"));
    }

    #[test]
    fn test_empty_message_is_not_vague() {
        assert!(!detect_vague_answer("   ", Category::Work).is_vague);
    }
}
