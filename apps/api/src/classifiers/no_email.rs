//! Detects that the user has no usable email address, so the email question
//! can be skipped instead of re-asked.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("no-email rule must compile"))
        .collect()
}

/// Direct statements of not having email.
static STATEMENTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(don'?t|do not|doesn'?t) have (an? )?e-?mail",
        r"(?i)\bno e-?mail\b",
        r"(?i)\bnever (had|made|set up|created) (an? )?e-?mail",
        r"(?i)\bdon'?t (use|do) e-?mail",
    ])
});

/// Inability to access one that may exist.
static ACCESS_PROBLEMS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bcan'?t (use|access|get into|check|remember) (my |the )?e-?mail",
        r"(?i)\bforgot (my )?(e-?mail|password)",
        r"(?i)\blocked out of (my )?e-?mail",
    ])
});

/// Questions that reveal unfamiliarity with email.
static QUESTIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bwhat('?s| is) (an? )?e-?mail",
        r"(?i)\bhow do i (get|make|set up) (an? )?e-?mail",
    ])
});

/// Somebody else manages it for them.
static INDIRECT_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(my|our) (daughter|son|kids?|child|children|grand(son|daughter|kids?|child)|wife|husband|niece|nephew|family) (handles?|manages?|checks?|does|has) ",
    ])
});

/// True when the message indicates the user lacks or cannot use email.
pub fn detect_no_email(message: &str) -> bool {
    let msg = message.trim();
    if msg.is_empty() {
        return false;
    }
    for group in [
        &*STATEMENTS,
        &*ACCESS_PROBLEMS,
        &*QUESTIONS,
        &*INDIRECT_INDICATORS,
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
    fn test_direct_statements() {
        assert!(detect_no_email("I don't have an email"));
        assert!(detect_no_email("I do not have email"));
        assert!(detect_no_email("no email"));
        assert!(detect_no_email("never set up an e-mail"));
        assert!(detect_no_email("I don't use email"));
    }

    #[test]
    fn test_access_problems() {
        assert!(detect_no_email("I can't access my email anymore"));
        assert!(detect_no_email("forgot my password"));
        assert!(detect_no_email("I'm locked out of my email"));
    }

    #[test]
    fn test_questions_about_email() {
        assert!(detect_no_email("what is an email?"));
        assert!(detect_no_email("what's email"));
        assert!(detect_no_email("how do I get an email"));
    }

    #[test]
    fn test_indirect_indicators() {
        assert!(detect_no_email("my daughter handles my email"));
        assert!(detect_no_email("our son checks the mail for us"));
        assert!(detect_no_email("my grandson manages all that"));
    }

    #[test]
    fn test_actual_addresses_are_not_flagged() {
        assert!(!detect_no_email("rosa.diaz@example.com"));
        assert!(!detect_no_email("it's rosa at gmail"));
        assert!(!detect_no_email(""));
    }
}
