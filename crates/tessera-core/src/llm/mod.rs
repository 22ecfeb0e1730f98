//! Completion service client.
//!
//! The planner treats the language model as an opaque function from a list
//! of role-tagged messages to free text. [`CompletionService`] is that seam;
//! [`OpenAiClient`] is the HTTP implementation used by the CLI.

use async_trait::async_trait;

mod error;
mod openai;
mod types;

pub use error::CompletionError;
pub use openai::OpenAiClient;
pub use types::{ChatMessage, CompletionParams, Role};

/// A language-model completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends `messages` and returns the model's text reply.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, CompletionError>;
}
