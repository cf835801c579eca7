pub mod error;
pub mod config;
pub mod request;
pub mod prompt;
pub mod gateway;
pub mod providers;
pub mod normalize;
pub mod fallback;
pub mod agent;
pub mod share;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/*

reply_agent drafts short WhatsApp replies from an incoming message
and an optional pasted conversation. a text-generation backend is
used when one is reachable; otherwise a deterministic heuristic
composes the reply so the user always gets something back.

reply_agent/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and option enums
│   ├── error.rs        # Error type
│   ├── config.rs       # Backend, sampling and warm-up configuration
│   ├── request.rs      # Request / parameters / result value types
│   ├── prompt.rs       # Prompt builder
│   ├── gateway.rs      # Generator capability trait
│   ├── providers/      # Generator implementations
│   │   ├── mod.rs
│   │   ├── completions.rs  # OpenAI-compatible completions client
│   │   └── unavailable.rs  # Always-failing generator
│   ├── normalize.rs    # Output sanitizer
│   ├── fallback.rs     # Heuristic composer
│   ├── agent.rs        # Per-request pipeline and warm-up
│   └── share.rs        # wa.me share link
└── tests/

*/

pub use agent::ReplyAgent;
pub use config::AgentConfig;
pub use error::Error;
pub use fallback::compose_fallback;
pub use gateway::Generator;
pub use normalize::normalize;
pub use prompt::build_prompt;
pub use request::{GenerationParameters, ReplyRequest, ReplyResult};
pub use share::whatsapp_link;

/// REPLY OPTIONS:

/// Stylistic directive for the drafted reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone
{   Friendly
  , Formal
  , Concise
  , Empathetic
  , /// Shown as "Salesy" in pickers
    Sales
}

impl Tone
{   pub const ALL: [Tone; 5] = [
      Tone::Friendly
    , Tone::Formal
    , Tone::Concise
    , Tone::Empathetic
    , Tone::Sales
    ];

    pub fn as_str(&self) -> &'static str
    {   match self
        {   Tone::Friendly => "friendly"
          , Tone::Formal => "formal"
          , Tone::Concise => "concise"
          , Tone::Empathetic => "empathetic"
          , Tone::Sales => "sales"
        }
    }
}

impl fmt::Display for Tone
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

impl FromStr for Tone
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   let wanted = s.trim().to_ascii_lowercase();
        Tone::ALL.iter()
          .copied()
          .find(|t| t.as_str() == wanted)
          .ok_or_else(|| {
            crate::error::Error::UnknownOption(format!("tone {}", s))
          })
    }
}

/// Target verbosity of the drafted reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Length
{   Short
  , Medium
  , Long
}

impl Length
{   pub const ALL: [Length; 3] = [
      Length::Short
    , Length::Medium
    , Length::Long
    ];

    pub fn as_str(&self) -> &'static str
    {   match self
        {   Length::Short => "short"
          , Length::Medium => "medium"
          , Length::Long => "long"
        }
    }

    /// Token budget handed to the backend
    pub fn max_new_tokens(&self) -> usize
    {   match self
        {   Length::Short => 64
          , Length::Medium => 128
          , Length::Long => 196
        }
    }
}

impl fmt::Display for Length
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

impl FromStr for Length
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   let wanted = s.trim().to_ascii_lowercase();
        Length::ALL.iter()
          .copied()
          .find(|l| l.as_str() == wanted)
          .ok_or_else(|| {
            crate::error::Error::UnknownOption(format!("length {}", s))
          })
    }
}

/// Language the reply should be written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Language
{   /// Match whatever language the user writes in
    #[default]
    Auto
  , /// Language code such as "es" or "pt"
    Code(String)
}

impl From<&str> for Language
{   fn from(s: &str) -> Self
    {   let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto")
        {   Language::Auto
        } else
        {   Language::Code(s.to_string())
        }
    }
}

impl fmt::Display for Language
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   match self
        {   Language::Auto => f.write_str("auto")
          , Language::Code(code) => f.write_str(code)
        }
    }
}

/// Readiness of the generation backend, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus
{   NotLoaded
  , Loading
  , Ready
  , /// Warm-up failed; replies will likely come from the heuristic
    FallbackOnly
}

impl fmt::Display for ModelStatus
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   let text = match self
        {   ModelStatus::NotLoaded => "Model not loaded yet"
          , ModelStatus::Loading =>
              "Loading model (downloads ~few hundred MB on first run)..."
          , ModelStatus::Ready => "Model ready"
          , ModelStatus::FallbackOnly =>
              "Model fallback will be used if loading fails"
        };
        f.write_str(text)
    }
}
