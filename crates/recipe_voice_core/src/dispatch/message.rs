//! Request and response values exchanged with the host adapter.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parsed voice request: intent name plus slot values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub intent_name: String,
    #[serde(default)]
    pub slots: HashMap<String, String>,
}

impl Request {
    pub fn new(intent_name: impl Into<String>) -> Self {
        Self {
            intent_name: intent_name.into(),
            slots: HashMap::new(),
        }
    }

    /// Builder-style slot assignment.
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    /// Returns the slot value, or `None` when the slot is absent.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    /// Returns the slot value, reading an absent slot as `""`.
    pub fn slot_or_empty(&self, name: &str) -> &str {
        self.slot(name).unwrap_or_default()
    }
}

/// Title/body pair rendered by the voice platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub title: String,
    pub body: String,
}

impl Response {
    pub fn simple(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Request;

    #[test]
    fn absent_slot_reads_as_empty() {
        let request = Request::new("AboutIntent").with_slot("recipe", "pie");
        assert_eq!(request.slot("recipe"), Some("pie"));
        assert_eq!(request.slot("ingredientone"), None);
        assert_eq!(request.slot_or_empty("ingredientone"), "");
    }
}
