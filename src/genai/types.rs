//! Wire types for the generative-language REST API.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn or transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_wire(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One completed conversation turn, as sent with a chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct GenerateContentRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    pub contents: Vec<Content>,
}

#[derive(Serialize, Debug)]
pub(crate) struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
pub(crate) struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentRequest {
    pub fn single_shot(framing: &str, prompt: &str) -> Self {
        Self {
            system_instruction: Some(SystemInstruction {
                parts: vec![Part {
                    text: framing.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Role::User.as_wire().to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }

    pub fn conversation(framing: &str, history: &[Turn]) -> Self {
        Self {
            system_instruction: Some(SystemInstruction {
                parts: vec![Part {
                    text: framing.to_string(),
                }],
            }),
            contents: history
                .iter()
                .map(|turn| Content {
                    role: turn.role.as_wire().to_string(),
                    parts: vec![Part {
                        text: turn.text.clone(),
                    }],
                })
                .collect(),
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` when the
    /// response carries no text at all.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        let joined: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_shot_request_shape() {
        let req = GenerateContentRequest::single_shot("frame", "what is attention?");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "frame");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "what is attention?");
    }

    #[test]
    fn conversation_preserves_turn_order_and_roles() {
        let history = vec![Turn::user("q1"), Turn::model("a1"), Turn::user("q2")];
        let req = GenerateContentRequest::conversation("frame", &history);
        let json = serde_json::to_value(&req).unwrap();
        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "q2");
    }

    #[test]
    fn response_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text().as_deref(), Some("Hello"));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.text().is_none());
    }
}
