use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a successful `POST /chat`.
///
/// `response` is kept untyped so that an odd value still decodes and reads as "no answer".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<Value>,
}

impl ChatReply {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Some(Value::String(response.into())),
        }
    }

    /// The reply text, or `None` when the backend answered without a usable one.
    pub fn text(&self) -> Option<&str> {
        self.response
            .as_ref()
            .and_then(Value::as_str)
            .filter(|response| !response.trim().is_empty())
    }
}
