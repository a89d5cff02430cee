//! Deterministic scripted replies for when the extraction model is
//! unavailable. The conversation never stalls: every category has a message
//! that keeps the user talking until the model comes back.

use crate::flow::Category;

pub fn fallback_message(category: Category, language: &str) -> &'static str {
    match language {
        "es" => fallback_es(category),
        _ => fallback_en(category),
    }
}

fn fallback_en(category: Category) -> &'static str {
    match category {
        Category::Language => "Would you like to continue in English or Spanish?",
        Category::Intro => {
            "I'm having a little trouble on my end, but we can keep going. \
             What kind of job are you looking for?"
        }
        Category::Personal => {
            "Let's keep it simple for now — could you tell me your name and \
             the best way to reach you?"
        }
        Category::Work => {
            "Tell me about a job you've had — where you worked and what you \
             did there."
        }
        Category::Education => {
            "Tell me about any school or training you've finished, even if \
             it was a while ago."
        }
        Category::Volunteering => {
            "Have you helped out anywhere, like a church, school, or \
             community group?"
        }
        Category::Skills => {
            "What are some things you're good at? Skills from any part of \
             life count."
        }
        Category::References => {
            "Is there someone who could vouch for your work, like a former \
             boss or teacher?"
        }
        Category::Review => {
            "We're almost done. Take a look at what we have so far and tell \
             me if anything needs fixing."
        }
        Category::Complete => "Your résumé information is all saved. Nice work!",
    }
}

fn fallback_es(category: Category) -> &'static str {
    match category {
        Category::Language => "¿Prefiere continuar en inglés o en español?",
        Category::Intro => {
            "Tengo un pequeño problema técnico, pero podemos continuar. \
             ¿Qué tipo de trabajo está buscando?"
        }
        Category::Personal => {
            "Sigamos con lo básico: ¿me puede decir su nombre y la mejor \
             forma de contactarle?"
        }
        Category::Work => {
            "Cuénteme sobre un trabajo que haya tenido: dónde trabajó y qué \
             hacía allí."
        }
        Category::Education => {
            "Cuénteme sobre alguna escuela o capacitación que haya \
             terminado, aunque haya sido hace tiempo."
        }
        Category::Volunteering => {
            "¿Ha ayudado en algún lugar, como una iglesia, escuela o grupo \
             comunitario?"
        }
        Category::Skills => {
            "¿En qué es bueno usted? Cuentan las habilidades de cualquier \
             parte de la vida."
        }
        Category::References => {
            "¿Hay alguien que pueda dar referencias de su trabajo, como un \
             exjefe o maestro?"
        }
        Category::Review => {
            "Ya casi terminamos. Revise lo que tenemos y dígame si hay algo \
             que corregir."
        }
        Category::Complete => "Su información está guardada. ¡Buen trabajo!",
    }
}

/// Acknowledgement used when frustration is detected; skips the model call
/// entirely for that turn.
pub fn frustration_ack(language: &str) -> &'static str {
    match language {
        "es" => {
            "Entiendo, y gracias por su paciencia. Solo quedan unas pocas \
             preguntas. Sigamos."
        }
        _ => {
            "I hear you, and thanks for bearing with me. There are only a \
             few questions left. Let's keep going."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::CATEGORY_ORDER;

    #[test]
    fn test_every_category_has_both_languages() {
        for &cat in CATEGORY_ORDER {
            assert!(!fallback_message(cat, "en").is_empty());
            assert!(!fallback_message(cat, "es").is_empty());
        }
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        assert_eq!(
            fallback_message(Category::Work, "fr"),
            fallback_message(Category::Work, "en")
        );
    }

    #[test]
    fn test_messages_are_deterministic() {
        assert_eq!(
            fallback_message(Category::Skills, "en"),
            fallback_message(Category::Skills, "en")
        );
    }
}
