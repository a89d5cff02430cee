//! Conversation flow: the question graph and the guided cursor.

pub mod guided;
pub mod questions;

use serde::{Deserialize, Serialize};

/// Conversation sections in their fixed total order. Both collection modes
/// share this ordering; assisted mode walks it with a category cursor while
/// guided mode derives it from the active question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Language,
    Intro,
    Personal,
    Work,
    Education,
    Volunteering,
    Skills,
    References,
    Review,
    Complete,
}

pub const CATEGORY_ORDER: &[Category] = &[
    Category::Language,
    Category::Intro,
    Category::Personal,
    Category::Work,
    Category::Education,
    Category::Volunteering,
    Category::Skills,
    Category::References,
    Category::Review,
    Category::Complete,
];

impl Category {
    pub fn next(self) -> Category {
        let pos = CATEGORY_ORDER.iter().position(|c| *c == self).unwrap_or(0);
        *CATEGORY_ORDER
            .get(pos + 1)
            .unwrap_or(&Category::Complete)
    }

    /// Sections collecting repeated entries, each with its gate flag.
    /// `(collection path, gate flag)`.
    pub fn gated_section(self) -> Option<(&'static str, &'static str)> {
        match self {
            Category::Work => Some(("workExperience", "hasWorkExperience")),
            Category::Education => Some(("education", "hasEducation")),
            Category::Volunteering => Some(("volunteering", "hasVolunteering")),
            Category::References => Some(("references", "hasReferences")),
            _ => None,
        }
    }

    /// Follow-up ceiling per section: multi-entry sections that need real
    /// elaboration get 5, everything else 3.
    pub fn follow_up_limit(self) -> u32 {
        match self {
            Category::Work | Category::Education => 5,
            _ => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Language => "language",
            Category::Intro => "intro",
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Education => "education",
            Category::Volunteering => "volunteering",
            Category::Skills => "skills",
            Category::References => "references",
            Category::Review => "review",
            Category::Complete => "complete",
        }
    }
}
