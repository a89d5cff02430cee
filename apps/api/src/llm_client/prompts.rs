// Extraction prompt templates.
// All prompts for the assisted conversation live here.

use crate::llm_client::extraction::ExtractionRequest;
use crate::llm_client::LlmError;

pub const EXTRACTION_SYSTEM: &str = "\
You are a warm, patient résumé assistant talking with a job seeker who may \
have limited computer experience. You extract structured résumé data from \
their messages. You MUST respond with valid JSON only — no markdown fences, \
no explanations. \
Extract only what the user actually said — never invent employers, dates, \
or skills. Report honest confidence per field: use low confidence when you \
are inferring rather than quoting. \
If the user contradicts earlier data ('actually I never volunteered'), emit \
a field with \"clear\": true for that section instead of new values.";

const EXTRACTION_PROMPT: &str = r#"Continue a résumé-building conversation and extract structured data.

CONVERSATION STATE (JSON):
{request}

The `currentRecord` object shows everything collected so far. The user just said `userMessage`. The active section is `currentCategory`; `followUpCount` follow-up questions have already been asked there. Respond in the language given by `language`.

OUTPUT SCHEMA (return exactly this structure):
{
  "assistantMessage": "your next conversational message to the user",
  "extractedFields": [
    {"path": "dot/bracket path like workExperience[0].company", "value": <json>, "confidence": 0.0-1.0, "clear": false}
  ],
  "suggestedSection": "personal" | "work" | "education" | "volunteering" | "skills" | "references" | "review" | null,
  "isComplete": false,
  "followUpNeeded": false,
  "confidence": 0.0-1.0,
  "specialContent": null
}

PATH RULES:
- personalInfo.fullName, personalInfo.email, personalInfo.phone, personalInfo.location
- workExperience[i].company / .jobTitle / .startDate / .endDate / .isCurrent / .responsibilities
- education[i].school / .credential / .completionYear
- volunteering[i].organization / .role / .description
- references[i].name / .relationship / .contact
- skills.technicalSkills, skills.softSkills, skills.certifications, skills.languages (arrays of strings)
- gate flags: hasWorkExperience, hasEducation, hasVolunteering, hasReferences, hasTechnicalSkills, hasSoftSkills, hasCertifications, hasLanguages, referencesUponRequest

Set "suggestedSection" only when the conversation should move to a different section. Set "followUpNeeded" true when the user's answer needs one more clarifying question. Set "isComplete" true only when every section has been covered."#;

/// Renders the extraction prompt for one turn.
pub fn build_extraction_prompt(request: &ExtractionRequest) -> Result<String, LlmError> {
    let state = serde_json::to_string_pretty(request)?;
    Ok(EXTRACTION_PROMPT.replace("{request}", &state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Category;
    use serde_json::json;

    #[test]
    fn test_prompt_embeds_request_state() {
        let req = ExtractionRequest {
            user_message: "I worked at Acme for three years".to_string(),
            transcript: vec![],
            current_record: json!({"language": "en"}),
            current_category: Category::Work,
            language: "en".to_string(),
            follow_up_count: 1,
            conversation_context: None,
        };
        let prompt = build_extraction_prompt(&req).unwrap();
        assert!(prompt.contains("I worked at Acme for three years"));
        assert!(prompt.contains(r#""currentCategory": "work""#));
        assert!(prompt.contains("OUTPUT SCHEMA"));
    }
}
