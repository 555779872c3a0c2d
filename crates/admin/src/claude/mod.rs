//! Claude API integration for AI product copywriting.
//!
//! - [`ClaudeClient`] - thin client over the Messages API
//! - [`Copywriter`] - description and disclaimer generation
//! - [`TextGenerator`] - the trait the form controller depends on

mod client;
mod copywriter;
mod error;
mod types;

pub use client::ClaudeClient;
pub use copywriter::{Copywriter, TextGenerator};
pub use error::ClaudeError;
pub use types::{ChatResponse, ContentBlock, Message, MessageContent};
