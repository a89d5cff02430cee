//! Escape-phrase detection: the user wants out of the current line of
//! questioning.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::flow::questions::confirm_gated_categories;
use crate::flow::Category;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("escape rule must compile"))
        .collect()
}

/// Direct requests to move along.
static DIRECT_REQUESTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bskip\b",
        r"(?i)\bpass\b",
        r"(?i)\bmove on\b",
        r"(?i)\bnext question\b",
        r"(?i)\blet'?s (continue|keep going)\b",
    ])
});

/// The user says this topic is exhausted.
static COMPLETION_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bthat'?s (all|it|everything)\b",
        r"(?i)\bi'?m (done|finished)\b",
        r"(?i)\ball done\b",
        r"(?i)\bnothing (else|more)\b",
        r"(?i)\bno more\b",
    ])
});

/// Negative phrasing beyond a bare "no".
static NEGATIVE_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)^none\b",
        r"(?i)\bnot really\b",
        r"(?i)\bdon'?t have any(thing)?\b",
        r"(?i)\bnothing to (add|say)\b",
    ])
});

/// Time pressure reads as a request to wrap up.
static TIME_PRESSURE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bin a (hurry|rush)\b",
        r"(?i)\bdon'?t have time\b",
        r"(?i)\b(gotta|have to|got to) go\b",
    ])
});

static STANDALONE_NO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(no|nope|nah)[.!]*$").expect("standalone-no rule must compile"));

/// Detects a request to skip or end the current line of questioning.
///
/// A standalone "no"/"nope"/"nah" is special-cased: in sections whose flow
/// opens with a yes/no gate question it is a legitimate gate answer, and
/// with no category context it is just a negative answer. The gate-section
/// set is derived from the question graph, not hand-maintained.
pub fn detect_escape_phrase(message: &str, category: Option<Category>) -> bool {
    let msg = message.trim();
    if msg.is_empty() {
        return false;
    }

    if STANDALONE_NO.is_match(msg) {
        return match category {
            Some(cat) => !confirm_gated_categories().contains(&cat),
            None => false,
        };
    }

    for group in [
        &*DIRECT_REQUESTS,
        &*COMPLETION_INDICATORS,
        &*NEGATIVE_INDICATORS,
        &*TIME_PRESSURE,
    ] {
        if group.iter().any(|r| r.is_match(msg)) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standalone_no_in_gate_section_is_not_escape() {
        assert!(!detect_escape_phrase("no", Some(Category::Work)));
        assert!(!detect_escape_phrase("Nope", Some(Category::Education)));
        assert!(!detect_escape_phrase("nah.", Some(Category::Volunteering)));
        assert!(!detect_escape_phrase("no", Some(Category::References)));
    }

    #[test]
    fn test_standalone_no_without_category_is_not_escape() {
        assert!(!detect_escape_phrase("no", None));
    }

    #[test]
    fn test_standalone_no_outside_gate_sections_is_escape() {
        assert!(detect_escape_phrase("no", Some(Category::Skills)));
        assert!(detect_escape_phrase("nope", Some(Category::Personal)));
    }

    #[test]
    fn test_other_negative_phrasing_escapes_everywhere() {
        assert!(detect_escape_phrase("none to add", Some(Category::Work)));
        assert!(detect_escape_phrase("not really", Some(Category::Education)));
        assert!(detect_escape_phrase("nothing else", None));
        assert!(detect_escape_phrase("I don't have anything", Some(Category::Work)));
    }

    #[test]
    fn test_direct_requests() {
        assert!(detect_escape_phrase("can we skip this one", None));
        assert!(detect_escape_phrase("let's move on", Some(Category::Work)));
        assert!(detect_escape_phrase("next question please", None));
    }

    #[test]
    fn test_completion_indicators() {
        assert!(detect_escape_phrase("that's all", Some(Category::Skills)));
        assert!(detect_escape_phrase("I'm done with this part", None));
        assert!(detect_escape_phrase("no more jobs", Some(Category::Work)));
    }

    #[test]
    fn test_time_pressure() {
        assert!(detect_escape_phrase("sorry, I'm in a hurry", None));
        assert!(detect_escape_phrase("I gotta go soon", None));
    }

    #[test]
    fn test_ordinary_answers_are_not_escapes() {
        assert!(!detect_escape_phrase("I worked at a grocery store", Some(Category::Work)));
        assert!(!detect_escape_phrase("maybe around 2019", Some(Category::Education)));
        assert!(!detect_escape_phrase("", None));
    }
}
