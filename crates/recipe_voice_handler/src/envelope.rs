//! Voice-platform JSON envelopes.
//!
//! # Responsibility
//! - Decode the platform's intent request into a core `Request`.
//! - Encode a core `Response` or failure as the platform's reply.
//!
//! # Invariants
//! - Missing intent, slots or slot values decode to empty text, never errors.

use recipe_voice_core::{DispatchError, Request, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub request: RequestBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub intent: IntentBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct IntentBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, SlotBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlotBody {
    #[serde(default)]
    pub value: Option<String>,
}

impl RequestEnvelope {
    pub fn into_request(self) -> Request {
        let intent = self.request.intent;
        let slots = intent
            .slots
            .into_iter()
            .map(|(key, slot)| (key, slot.value.unwrap_or_default()))
            .collect();
        Request {
            intent_name: intent.name,
            slots,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    pub response: ResponseBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,
    pub card: Card,
    pub should_end_session: bool,
}

#[derive(Debug, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub content: String,
}

impl From<Response> for ResponseEnvelope {
    fn from(value: Response) -> Self {
        Self {
            version: "1.0",
            response: ResponseBody {
                output_speech: OutputSpeech {
                    kind: "PlainText",
                    text: value.body.clone(),
                },
                card: Card {
                    kind: "Simple",
                    title: value.title,
                    content: value.body,
                },
                should_end_session: true,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }
}

impl From<&DispatchError> for ErrorEnvelope {
    fn from(value: &DispatchError) -> Self {
        Self::new(value.kind(), value.to_string())
    }
}
