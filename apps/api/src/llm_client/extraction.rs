//! Wire contract with the extraction model.
//!
//! The model sees the current record and transcript tail and answers with a
//! conversational message plus structured field extractions. Paths in
//! `ExtractedField` use the same dot/bracket syntax the path mutator parses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assisted::context::ConversationContext;
use crate::conversation::session::ChatTurn;
use crate::flow::Category;
use crate::llm_client::prompts::{build_extraction_prompt, EXTRACTION_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

/// A candidate field value pulled out of free-form user text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedField {
    pub path: String,
    #[serde(default)]
    pub value: Value,
    /// Model-reported certainty in [0, 1].
    #[serde(default)]
    pub confidence: f64,
    /// `true` marks a contradiction reset for an entire section rather than
    /// a value.
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    pub user_message: String,
    pub transcript: Vec<ChatTurn>,
    pub current_record: Value,
    pub current_category: Category,
    pub language: String,
    pub follow_up_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_context: Option<ConversationContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    pub assistant_message: String,
    #[serde(default)]
    pub extracted_fields: Vec<ExtractedField>,
    #[serde(default)]
    pub suggested_section: Option<Category>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub follow_up_needed: bool,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub special_content: Option<Value>,
}

/// Seam for the extraction backend so the orchestrator can run against a
/// stub in tests the way the real service runs against the LLM.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest)
        -> Result<ExtractionResponse, LlmError>;
}

#[async_trait]
impl FieldExtractor for LlmClient {
    async fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResponse, LlmError> {
        let prompt = build_extraction_prompt(request)?;
        self.call_json::<ExtractionResponse>(&prompt, EXTRACTION_SYSTEM)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_field_defaults() {
        let f: ExtractedField =
            serde_json::from_str(r#"{"path": "personalInfo.phone"}"#).unwrap();
        assert_eq!(f.path, "personalInfo.phone");
        assert!(f.value.is_null());
        assert_eq!(f.confidence, 0.0);
        assert!(!f.clear);
    }

    #[test]
    fn test_clear_field_deserializes() {
        let f: ExtractedField = serde_json::from_str(
            r#"{"path": "volunteering", "value": [], "clear": true}"#,
        )
        .unwrap();
        assert!(f.clear);
        assert_eq!(f.value, serde_json::json!([]));
    }

    #[test]
    fn test_response_with_minimal_payload() {
        let r: ExtractionResponse =
            serde_json::from_str(r#"{"assistantMessage": "Got it!"}"#).unwrap();
        assert_eq!(r.assistant_message, "Got it!");
        assert!(r.extracted_fields.is_empty());
        assert!(r.suggested_section.is_none());
        assert!(!r.is_complete);
        assert!(!r.follow_up_needed);
    }

    #[test]
    fn test_full_response_deserializes() {
        let r: ExtractionResponse = serde_json::from_str(
            r#"{
                "assistantMessage": "Thanks! What was your role there?",
                "extractedFields": [
                    {"path": "workExperience[0].company", "value": "Acme", "confidence": 0.92}
                ],
                "suggestedSection": "work",
                "isComplete": false,
                "followUpNeeded": true,
                "confidence": 0.9
            }"#,
        )
        .unwrap();
        assert_eq!(r.suggested_section, Some(Category::Work));
        assert!(r.follow_up_needed);
        assert_eq!(r.extracted_fields[0].path, "workExperience[0].company");
    }
}
