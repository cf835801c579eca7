//! Configuration for the generation backend, sampling and warm-up

use serde::{Deserialize, Serialize};
use std::path::Path;
use log::debug;

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig
{   /// API base URL of an OpenAI-compatible completions endpoint
    pub api_base: String
  , /// Model name sent with every request
    pub model: String
  , /// Explicit API key, takes precedence over `api_key_env`
    pub api_key: Option<String>
  , /// Environment variable consulted when `api_key` is unset
    pub api_key_env: String
  , /// Request timeout in seconds
    pub timeout_secs: u64
}

impl Default for GatewayConfig
{   fn default() -> Self
    {   GatewayConfig
        {   api_base: "https://api.openai.com/v1".to_string()
          , model: "gpt-3.5-turbo-instruct".to_string()
          , api_key: None
          , api_key_env: "REPLY_AGENT_API_KEY".to_string()
          , timeout_secs: 30
        }
    }
}

impl GatewayConfig
{   /// Explicit key first, then the environment
    pub fn resolve_api_key(&self) -> Option<String>
    {   if let Some(key) = &self.api_key
        {   if !key.trim().is_empty()
            {   return Some(key.clone());
            }
        }
        std::env::var(&self.api_key_env)
          .ok()
          .filter(|k| !k.trim().is_empty())
    }
}

/// Sampling settings shared by user-triggered generations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig
{   pub temperature: f32
  , pub top_p: f32
}

impl Default for SamplingConfig
{   fn default() -> Self
    {   SamplingConfig
        {   temperature: 0.7
          , top_p: 0.95
        }
    }
}

/// Warm-up call settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupConfig
{   /// Run the warm-up at all
    pub enabled: bool
  , /// Delay before the warm-up call, in milliseconds
    pub delay_ms: u64
  , /// Characters of the trivial prompt that are sent
    pub prompt_chars: usize
}

impl Default for WarmupConfig
{   fn default() -> Self
    {   WarmupConfig
        {   enabled: true
          , delay_ms: 600
          , prompt_chars: 60
        }
    }
}

/// Reply agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig
{   pub gateway: GatewayConfig
  , pub sampling: SamplingConfig
  , pub warmup: WarmupConfig
}

impl AgentConfig
{   /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str)
      -> Result<Self, crate::error::Error>
    {   let config: AgentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading agent config from {}", path.display());
        let json = std::fs::read_to_string(path)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   let invalid = |msg: String| {
          Err(crate::error::Error::InvalidConfiguration(msg))
        };
        let t = self.sampling.temperature;
        if !(t > 0.0 && t <= 2.0)
        {   return invalid(format!(
              "temperature must be in (0, 2], got {}", t
            ));
        }
        let p = self.sampling.top_p;
        if !(p > 0.0 && p <= 1.0)
        {   return invalid(format!(
              "top_p must be in (0, 1], got {}", p
            ));
        }
        if self.gateway.timeout_secs == 0
        {   return invalid("timeout_secs must be positive".to_string());
        }
        if self.gateway.api_base.trim().is_empty()
        {   return invalid("api_base is empty".to_string());
        }
        Ok(())
    }
}
