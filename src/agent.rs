//! Per-request reply pipeline and backend warm-up

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use log::{debug, error, info, warn};

pub const STATUS_GENERATED: &str = "Reply generated";
pub const STATUS_GENERATION_FAILED: &str =
  "Model generation failed. Using offline fallback.";
pub const STATUS_GENERATION_EMPTY: &str =
  "Model returned no usable text. Using offline fallback.";

/// Drafts replies through a [`Generator`](crate::gateway::Generator),
/// falling back to the heuristic composer whenever the backend
/// fails or says nothing usable.
#[derive(Clone)]
pub struct ReplyAgent
{   generator: Arc<dyn crate::gateway::Generator>
  , config: crate::config::AgentConfig
}

impl ReplyAgent
{   pub fn new(
      generator: Arc<dyn crate::gateway::Generator>
    , config: crate::config::AgentConfig
    ) -> Self
    {   debug!("Creating ReplyAgent with {}", generator.name());
        ReplyAgent
        {   generator
          , config
        }
    }

    /// Pick the backend from configuration: the completions client
    /// when an API key resolves, otherwise a generator that always
    /// fails. Spawns the client task, so call inside a runtime.
    pub fn from_config(config: crate::config::AgentConfig)
      -> Result<Self, crate::error::Error>
    {   config.validate()?;
        let generator: Arc<dyn crate::gateway::Generator>
          = match config.gateway.resolve_api_key()
            {   Some(_) => Arc::new(
                  crate::providers::CompletionsClient::new(
                    config.gateway.clone()
                  )
                )
              , None => {
                  warn!(
                    "No API key in config or ${}, replies will use the fallback",
                    config.gateway.api_key_env
                  );
                  Arc::new(crate::providers::Unavailable::default())
                }
            };
        Ok(Self::new(generator, config))
    }

    pub fn config(&self) -> &crate::config::AgentConfig
    {   &self.config
    }

    /// Draft a reply.
    ///
    /// Only a blank incoming message is an error. Backend failures
    /// and empty output are absorbed: the result then carries the
    /// heuristic reply, `used_fallback` and an informational status.
    pub async fn generate_reply(
      &self
    , request: &crate::ReplyRequest
    ) -> Result<crate::ReplyResult, crate::error::Error>
    {   request.validate()?;

        let prompt = request.prompt();
        let params = crate::GenerationParameters::for_length(
          request.length
        , &self.config.sampling
        );
        debug!(
          "generate_reply via {}, tone={} length={}",
          self.generator.name(), request.tone, request.length
        );

        let status = match self.generator.generate(&prompt, &params).await
        {   Ok(raw) => {
              let cleaned = crate::normalize::normalize(&raw);
              if !cleaned.is_empty()
              {   return Ok(crate::ReplyResult
                  {   text: cleaned
                    , used_fallback: false
                    , status_message: STATUS_GENERATED.to_string()
                  });
              }
              warn!("Generation normalized to nothing, using fallback");
              STATUS_GENERATION_EMPTY
            }
          , Err(crate::error::Error::EmptyGeneration) => {
              warn!("Generation returned no text, using fallback");
              STATUS_GENERATION_EMPTY
            }
          , Err(e) => {
              error!("Generation failed: {}", e);
              STATUS_GENERATION_FAILED
            }
        };

        Ok(crate::ReplyResult
        {   text: crate::fallback::compose_fallback(
              &request.incoming_message
            , request.tone
            , request.length
            , &request.language
            )
          , used_fallback: true
          , status_message: status.to_string()
        })
    }

    /// Kick off a throwaway one-token generation so the backend
    /// loads before the user asks for a reply. Returns immediately;
    /// progress arrives on the receiver as `Loading` then `Ready` or
    /// `FallbackOnly`. Nothing is sent when warm-up is disabled.
    /// Spawns a task, so call inside a runtime.
    pub fn warm_up(&self) -> mpsc::UnboundedReceiver<crate::ModelStatus>
    {   let (status_tx, status_rx) = mpsc::unbounded_channel();
        if !self.config.warmup.enabled
        {   debug!("Warm-up disabled");
            return status_rx;
        }

        let generator = Arc::clone(&self.generator);
        let warmup = self.config.warmup.clone();
        tokio::spawn(async move {
          tokio::time::sleep(Duration::from_millis(warmup.delay_ms)).await;
          // receiver may be gone; warm-up never reports errors
          let _ = status_tx.send(crate::ModelStatus::Loading);

          let prompt: String = crate::prompt::build_prompt(
              "Ok"
            , crate::Tone::Friendly
            , crate::Length::Short
            , &crate::Language::Auto
            , None
            )
            .chars()
            .take(warmup.prompt_chars)
            .collect();

          let status = match generator
            .generate(&prompt, &crate::GenerationParameters::warmup())
            .await
          {   Ok(_) => {
                info!("Warm-up finished, backend ready");
                crate::ModelStatus::Ready
              }
            , Err(e) => {
                debug!("Warm-up failed: {}", e);
                crate::ModelStatus::FallbackOnly
              }
          };
          let _ = status_tx.send(status);
        });

        status_rx
    }
}
