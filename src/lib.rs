//! # Attention Atlas
//!
//! Logic layer for an interactive 3D diagram of the Transformer
//! architecture. The crate owns everything that is not rendering:
//! - `layout`: the fixed encoder/decoder block layout
//! - `selection`: which block is currently inspected
//! - `genai`: the generative-language service client (single-shot + streaming)
//! - `explain`: AI explanation lookup for a selected block
//! - `chat`: follow-up chat about the selected block, streamed chunk by chunk
//! - `viewer`: composition of the above, driven by an embedding shell
//!
//! ## Architecture
//!
//! ```text
//! click → viewer (selection, epoch) → explain ─┐
//!                                              ├→ genai → external service
//! input → viewer → chat (transcript, session) ─┘
//! ```
//!
//! The rendering engine and UI shell are external collaborators: they read
//! the block layout and transcript from `Viewer` and forward pointer/input
//! events into it.

pub mod chat;
pub mod config;
pub mod explain;
pub mod genai;
pub mod layout;
pub mod prompts;
pub mod selection;
pub mod viewer;

pub use chat::{ChatClient, ChatError, ChatMessage, SendOutcome, Transcript};
pub use config::{ApiConfig, ConfigError};
pub use explain::ExplanationClient;
pub use genai::{GeminiClient, GenerativeService, Role, ServiceError, Turn};
pub use layout::{diagram, Block, Category, StackKind};
pub use selection::Selection;
pub use viewer::{Viewer, ViewerError};
