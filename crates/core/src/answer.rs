use crate::error::ServiceError;
use crate::traits::ChatModel;
use serde_json::Value;

/// Fixed reply used whenever retrieval produced nothing to summarize.
pub const NOT_FOUND_MESSAGE: &str =
    "No relevant information found in the provided documents.";

/// Model replies arrive in one of three shapes depending on the backing
/// client: a bare string, an object carrying a top-level `content` field, or
/// a chat-completion envelope with the content behind `choices/0/message`.
/// The shape is resolved into this union once, at the client boundary, and
/// never re-inspected downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    Text(String),
    Keyed { content: String },
    Chat { content: String },
}

impl ModelReply {
    /// Discriminates the raw response shape, in priority order: bare string,
    /// keyed `content` field, chat-completion accessor.
    pub fn from_value(raw: &Value) -> Result<Self, ServiceError> {
        if let Value::String(text) = raw {
            return Ok(Self::Text(text.clone()));
        }

        if let Some(content) = raw.get("content").and_then(Value::as_str) {
            return Ok(Self::Keyed {
                content: content.to_string(),
            });
        }

        if let Some(content) = raw
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            return Ok(Self::Chat {
                content: content.to_string(),
            });
        }

        Err(ServiceError::UnrecognizedResponse {
            shape: describe_shape(raw),
        })
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Keyed { content } | Self::Chat { content } => content,
        }
    }
}

/// Short structural description of an unrecognized payload, kept in the
/// error so the raw shape can be diagnosed from logs.
fn describe_shape(raw: &Value) -> String {
    match raw {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(map) => {
            let keys = map.keys().cloned().collect::<Vec<_>>().join(", ");
            format!("object with keys [{keys}]")
        }
    }
}

/// Condenses retrieved source text into a plain-language answer via the
/// language model.
pub struct AnsweringService<M: ChatModel> {
    model: M,
}

impl<M: ChatModel + Send + Sync> AnsweringService<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// `None` short-circuits to the fixed not-found message without touching
    /// the model.
    pub async fn summarize(&self, retrieved: Option<&str>) -> Result<String, ServiceError> {
        let Some(text) = retrieved else {
            return Ok(NOT_FOUND_MESSAGE.to_string());
        };

        let prompt = build_summary_prompt(text);
        let reply = self.model.complete(&prompt).await?;
        Ok(reply.into_text())
    }
}

fn build_summary_prompt(text: &str) -> String {
    format!("Summarize the following text in plain, simple terms:\n\n{text}")
}
