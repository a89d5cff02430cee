//! Lightweight conversation memory sent along with extraction requests so
//! the model stops re-asking for things the user already covered.

use serde::{Deserialize, Serialize};

/// Both lists behave as insertion-ordered sets: re-adding an existing item
/// moves it to the end instead of duplicating.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub mentioned_entities: Vec<String>,
    pub answered_topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_tone: Option<String>,
}

fn push_moving_to_end(list: &mut Vec<String>, item: &str) {
    if let Some(pos) = list.iter().position(|x| x == item) {
        list.remove(pos);
    }
    list.push(item.to_string());
}

impl ConversationContext {
    pub fn add_entity(&mut self, entity: &str) {
        push_moving_to_end(&mut self.mentioned_entities, entity);
    }

    pub fn add_topic(&mut self, topic: &str) {
        push_moving_to_end(&mut self.answered_topics, topic);
    }
}
