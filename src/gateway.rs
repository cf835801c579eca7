//! Generation gateway: the one seam to a text-generation backend

use async_trait::async_trait;

/// Result of one generation call
pub type GenerateReply = Result<String, crate::error::Error>;

/// Text-generation capability.
///
/// Implementations take a prompt and sampling parameters and return
/// the raw continuation. They must not retry, cache or persist
/// anything; an empty string is a valid way to report that nothing
/// usable came back. The first call may be slow while the backend
/// initializes.
#[async_trait]
pub trait Generator: Send + Sync
{   async fn generate(
      &self
    , prompt: &str
    , params: &crate::GenerationParameters
    ) -> GenerateReply;

    /// Short name for logs
    fn name(&self) -> &str
    {   "generator"
    }
}
