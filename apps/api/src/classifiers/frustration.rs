//! Frustration detection. A hit short-circuits the turn with an
//! acknowledging scripted reply and suppresses the follow-up.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("frustration rule must compile"))
        .collect()
}

/// Complaints about repeated questions.
static REPETITION_COMPLAINTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\balready (told|said|gave|answered)\b",
        r"(?i)\byou (just |already )?asked( me)? (that|this)\b",
        r"(?i)\basked (me )?(that|this) (already|before|twice)\b",
        r"(?i)\b(same|that) question again\b",
    ])
});

/// Meta-questions about the conversation itself.
static META_QUESTIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bwhy (do|are) you (keep )?.{0,20}\bask",
        r"(?i)\bhow (much longer|many more questions)\b",
        r"(?i)\bwhat('?s| is) the point\b",
        r"(?i)\bis this (going to|gonna) take\b",
    ])
});

/// Giving-up phrases.
static GIVING_UP: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bi (give|gave) up\b",
        r"(?i)\bforget it\b",
        r"(?i)\bnever ?mind\b",
        r"(?i)\bthis is (useless|pointless|stupid|ridiculous)\b",
        r"(?i)\b(taking|takes) (forever|too long)\b",
    ])
});

/// True when the message reads as frustration with the conversation.
pub fn detect_frustration(message: &str) -> bool {
    let msg = message.trim();
    if msg.is_empty() {
        return false;
    }
    for group in [&*REPETITION_COMPLAINTS, &*META_QUESTIONS, &*GIVING_UP] {
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
    fn test_repetition_complaints() {
        assert!(detect_frustration("I already told you that"));
        assert!(detect_frustration("you just asked me this"));
        assert!(detect_frustration("you asked that already"));
        assert!(detect_frustration("the same question again?"));
    }

    #[test]
    fn test_meta_questions() {
        assert!(detect_frustration("why do you keep asking me things"));
        assert!(detect_frustration("how many more questions are there"));
        assert!(detect_frustration("what's the point of all this"));
        assert!(detect_frustration("is this gonna take long"));
    }

    #[test]
    fn test_giving_up() {
        assert!(detect_frustration("ugh, forget it"));
        assert!(detect_frustration("I give up"));
        assert!(detect_frustration("nevermind"));
        assert!(detect_frustration("this is taking forever"));
    }

    #[test]
    fn test_ordinary_answers_pass() {
        assert!(!detect_frustration("I was a line cook for two years"));
        assert!(!detect_frustration("yes"));
        assert!(!detect_frustration(""));
    }
}
