//! Building the conversation turn sent to the agent.

use crate::llm::ChatMessage;

/// User input: one string or several that are flattened into one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Single(String),
    Many(Vec<String>),
}

impl Query {
    /// Content of the single user message. Multiple strings are joined with
    /// one space; they are not kept as separate turns.
    pub fn user_content(&self) -> String {
        match self {
            Query::Single(text) => text.clone(),
            Query::Many(parts) => parts.join(" "),
        }
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Query::Single(text)
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::Single(text.to_string())
    }
}

impl From<Vec<String>> for Query {
    fn from(parts: Vec<String>) -> Self {
        Query::Many(parts)
    }
}

impl From<&[String]> for Query {
    fn from(parts: &[String]) -> Self {
        Query::Many(parts.to_vec())
    }
}

/// Optional system message followed by exactly one user message.
pub fn build_conversation(system_prompt: &str, query: &Query) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if !system_prompt.is_empty() {
        messages.push(ChatMessage::system(system_prompt));
    }
    messages.push(ChatMessage::user(query.user_content()));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn joins_many_with_single_space() {
        let query = Query::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(query.user_content(), "a b");
    }

    #[test]
    fn system_prompt_leads_when_present() {
        let turn = build_conversation("Act as a chef", &Query::from("pasta?"));
        assert_eq!(turn.len(), 2);
        assert_eq!(turn[0].role, Role::System);
        assert_eq!(turn[0].content.as_deref(), Some("Act as a chef"));
        assert_eq!(turn[1].role, Role::User);
        assert_eq!(turn[1].content.as_deref(), Some("pasta?"));
    }

    #[test]
    fn empty_system_prompt_is_omitted() {
        let parts = ["first".to_string(), "second".to_string(), "third".to_string()];
        let turn = build_conversation("", &Query::from(&parts[..]));
        assert_eq!(turn.len(), 1);
        assert_eq!(turn[0].role, Role::User);
        assert_eq!(turn[0].content.as_deref(), Some("first second third"));
    }
}
