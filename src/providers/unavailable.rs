use async_trait::async_trait;
use log::debug;

/// Generator used when no backend is configured; every call fails
/// so the agent falls through to the heuristic composer.
#[derive(Debug, Clone)]
pub struct Unavailable
{   reason: String
}

impl Unavailable
{   pub fn new(reason: impl Into<String>) -> Self
    {   Unavailable
        {   reason: reason.into()
        }
    }
}

impl Default for Unavailable
{   fn default() -> Self
    {   Unavailable::new("no generation backend configured")
    }
}

#[async_trait]
impl crate::gateway::Generator for Unavailable
{   async fn generate(
      &self
    , _prompt: &str
    , _params: &crate::GenerationParameters
    ) -> crate::gateway::GenerateReply
    {   debug!("Unavailable generator called: {}", self.reason);
        Err(crate::error::Error::GenerationUnavailable(
          self.reason.clone()
        ))
    }

    fn name(&self) -> &str
    {   "unavailable"
    }
}
