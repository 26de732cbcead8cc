//! Fixed prompt text, shipped as an embedded TOML file.
//!
//! Two distinct framings are used against the service: one for single-shot
//! explanations, one for the follow-up chat. They never change at runtime.

use std::sync::OnceLock;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct PromptPack {
    pub explain: ExplainPrompts,
    pub chat: ChatPrompts,
}

#[derive(Deserialize, Debug)]
pub struct ExplainPrompts {
    /// System framing for explanation requests.
    pub framing: String,
    /// Prompt template; `{label}` is replaced with the block label.
    pub template: String,
    /// Shown verbatim when an explanation cannot be fetched.
    pub fallback: String,
}

#[derive(Deserialize, Debug)]
pub struct ChatPrompts {
    /// System framing for the chat session, fixed at session creation.
    pub framing: String,
    /// Appended to a partial answer when the stream fails.
    pub error_notice: String,
}

/// The embedded prompt pack. Parsing can only fail if the bundled TOML is
/// malformed, which is a build defect, hence the expect.
pub fn pack() -> &'static PromptPack {
    static PACK: OnceLock<PromptPack> = OnceLock::new();
    PACK.get_or_init(|| {
        toml::from_str(include_str!("prompts.toml")).expect("bundled prompts.toml is valid")
    })
}

/// Fill the explanation template for one block label.
pub fn explanation_prompt(label: &str) -> String {
    pack().explain.template.replace("{label}", label)
}
