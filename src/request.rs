//! Request, parameter and result value types for one reply

use serde::{Deserialize, Serialize};

/// Everything the caller knows when asking for a reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyRequest
{   /// Last message received, the one being answered
    pub incoming_message: String
  , /// Earlier messages pasted by the user
    pub conversation_context: Option<String>
  , pub tone: crate::Tone
  , pub length: crate::Length
  , pub language: crate::Language
}

impl ReplyRequest
{   pub fn new(
      incoming_message: impl Into<String>
    , tone: crate::Tone
    , length: crate::Length
    ) -> Self
    {   ReplyRequest
        {   incoming_message: incoming_message.into()
          , conversation_context: None
          , tone
          , length
          , language: crate::Language::Auto
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self
    {   self.conversation_context = Some(context.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<crate::Language>)
      -> Self
    {   self.language = language.into();
        self
    }

    /// Generation must not be attempted for a blank message
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.incoming_message.trim().is_empty()
        {   return Err(crate::error::Error::InputInvalid);
        }
        Ok(())
    }
}

/// Sampling parameters for a single generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters
{   pub max_new_tokens: usize
  , /// In (0, 2]
    pub temperature: f32
  , /// Nucleus probability, in (0, 1]
    pub top_p: f32
}

impl GenerationParameters
{   /// Token budget from the length, sampling from config
    pub fn for_length(
      length: crate::Length
    , sampling: &crate::config::SamplingConfig
    ) -> Self
    {   GenerationParameters
        {   max_new_tokens: length.max_new_tokens()
          , temperature: sampling.temperature
          , top_p: sampling.top_p
        }
    }

    /// One token, just enough to force the backend to load
    pub fn warmup() -> Self
    {   GenerationParameters
        {   max_new_tokens: 1
          , temperature: 0.7
          , top_p: 0.9
        }
    }
}

/// Reply handed back to the caller for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyResult
{   pub text: String
  , /// True when the heuristic composer wrote the text
    pub used_fallback: bool
  , /// Informational, never a blocking error
    pub status_message: String
}

impl ReplyResult
{   /// `https://wa.me/?text=...` for non-empty replies
    pub fn share_link(&self) -> Option<String>
    {   crate::share::whatsapp_link(&self.text)
    }
}
