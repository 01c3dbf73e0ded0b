use crate::error::Result;
use std::future::Future;

/// A text-completion service.
///
/// Implementations receive the complete instruction text, including the embedded JSON
/// example, and return the raw model output. Authentication, rate limiting and retries
/// belong to the implementation; the campaign pipeline calls `complete` exactly once per
/// request.
pub trait CompletionModel: Send + Sync {
    fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> impl Future<Output = Result<String>> + Send;
}

impl<M: CompletionModel> CompletionModel for &M {
    fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).complete(prompt, max_tokens, temperature)
    }
}
