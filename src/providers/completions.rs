use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use log::{debug, trace, error, info};
use std::time::Duration;

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest
{   pub model: String
  , pub prompt: String
  , pub max_tokens: usize
  , pub temperature: f32
  , pub top_p: f32
  , pub stream: bool
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse
{   #[serde(default)]
    pub choices: Vec<CompletionChoice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice
{   #[serde(default)]
    pub text: String
  , pub finish_reason: Option<String>
}

// ===== Completions Client Actor =====

/// Commands for CompletionsClient actor
pub enum CompletionsCommand
{   Generate
    {   prompt: String
      , params: crate::GenerationParameters
      , reply: mpsc::UnboundedSender<crate::gateway::GenerateReply>
    }
  , SetApiKey
    {   key: String
      , reply: mpsc::UnboundedSender
        <Result<(), crate::error::Error>>
    }
  , Shutdown
}

/// Completions client state, owned by the actor task
pub struct CompletionsClientState
{   config: crate::config::GatewayConfig
  , api_key: Option<String>
  , /// Built on the first command, not at spawn
    http_client: Option<reqwest::Client>
}

impl CompletionsClientState
{   pub fn new(config: crate::config::GatewayConfig) -> Self
    {   debug!("Creating CompletionsClientState for {}", config.model);
        let api_key = config.resolve_api_key();
        CompletionsClientState
        {   config
          , api_key
          , http_client: None
        }
    }

    fn http_client(&mut self)
      -> Result<reqwest::Client, crate::error::Error>
    {   if let Some(client) = &self.http_client
        {   return Ok(client.clone());
        }
        info!(
          "Initializing completions backend at {}",
          self.config.api_base
        );
        let client = reqwest::Client::builder()
          .timeout(Duration::from_secs(self.config.timeout_secs))
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::GenerationUnavailable(e.to_string())
          })?;
        self.http_client = Some(client.clone());
        Ok(client)
    }

    fn get_api_key(&self)
      -> Result<String, crate::error::Error>
    {   self.api_key.clone()
          .ok_or_else(|| {
            error!("No API key for model: {}", self.config.model);
            crate::error::Error::MissingApiKey(
              format!("completions:{}", self.config.model)
            )
          })
    }

    /// Everything a request needs from the actor state. Building the
    /// HTTP client here keeps first-time initialization in the loop.
    fn prepare_generate(
      &mut self
    , prompt: String
    , params: crate::GenerationParameters
    ) -> Result<PreparedCompletion, crate::error::Error>
    {   debug!(
          "Preparing generate, max_new_tokens={}",
          params.max_new_tokens
        );

        let http_client = self.http_client()?;
        let api_key = self.get_api_key()?;

        let request = CompletionRequest
        {   model: self.config.model.clone()
          , prompt
          , max_tokens: params.max_new_tokens
          , temperature: params.temperature
          , top_p: params.top_p
          , stream: false
        };

        let url = format!(
          "{}/completions",
          self.config.api_base.trim_end_matches('/')
        );
        Ok(PreparedCompletion
        {   http_client
          , api_key
          , url
          , request
        })
    }

    fn handle_set_api_key(&mut self, key: String)
      -> Result<(), crate::error::Error>
    {   if key.trim().is_empty()
        {   return Err(crate::error::Error::MissingApiKey(
              "completions".to_string()
            ));
        }
        debug!("Setting API key");
        self.api_key = Some(key);
        Ok(())
    }
}

/// A request detached from the actor state, ready to be sent
pub struct PreparedCompletion
{   http_client: reqwest::Client
  , api_key: String
  , url: String
  , request: CompletionRequest
}

async fn send_completion(prepared: PreparedCompletion)
  -> crate::gateway::GenerateReply
{   let PreparedCompletion
    {   http_client
      , api_key
      , url
      , request
    } = prepared;

    trace!("Completions request: {:?}", request);

    let response = http_client
      .post(url)
      .header("Authorization", format!("Bearer {}", api_key))
      .header("Content-Type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| {
        error!("HTTP error: {}", e);
        if e.is_timeout()
        {   crate::error::Error::Timeout
        } else
        {   crate::error::Error::HttpError(e.to_string())
        }
      })?;

    let status = response.status();
    trace!("Completions response status: {}", status);

    if !status.is_success()
    {   let error_text = response.text().await
          .unwrap_or_else(|_|
            "Unknown error".to_string()
          );
        error!("Completions API error: {}", error_text);
        return Err(crate::error::Error::ApiError(
          format!("{}: {}", status, error_text)
        ));
    }

    let completion: CompletionResponse
      = response.json().await.map_err(|e| {
        error!("Parse error: {}", e);
        if e.is_timeout()
        {   crate::error::Error::Timeout
        } else
        {   crate::error::Error::ParseError(e.to_string())
        }
      })?;

    let choice = completion.choices.into_iter().next()
      .ok_or_else(|| {
        error!("No choices in response");
        crate::error::Error::EmptyGeneration
      })?;
    trace!("Finish reason: {:?}", choice.finish_reason);
    Ok(choice.text)
}

/// Public completions client interface
pub struct CompletionsClient
{   tx: mpsc::UnboundedSender<CompletionsCommand>
  , _task: tokio::task::JoinHandle<()>
}

impl CompletionsClient
{   /// Create and spawn a new completions client.
    /// Must be called inside a tokio runtime.
    pub fn new(config: crate::config::GatewayConfig) -> Self
    {   debug!("Creating CompletionsClient");
        let (cmd_tx, cmd_rx)
          = mpsc::unbounded_channel();

        let _task = tokio::spawn(async move {
          run_completions_loop(cmd_rx, config).await;
        });

        CompletionsClient
        {   tx: cmd_tx
          , _task
        }
    }

    /// Queue set_api_key request - returns immediately
    pub fn set_api_key(
      &self
    , key: String
    ) -> Result<
        mpsc::UnboundedReceiver<Result<(), crate::error::Error>>,
        crate::error::Error
      >
    {   debug!("set_api_key queued");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        self.tx.send(CompletionsCommand::SetApiKey {
          key,
          reply: reply_tx,
        }).map_err(|_| {
          error!("Completions client disconnected");
          crate::error::Error::Other(
            "Completions client disconnected".to_string()
          )
        })?;

        Ok(reply_rx)
    }

    /// Shutdown the client
    pub fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down CompletionsClient");
        self.tx.send(CompletionsCommand::Shutdown)
          .map_err(|_| {
            crate::error::Error::Other(
              "Client already shutdown".to_string()
            )
          })
    }
}

#[async_trait]
impl crate::gateway::Generator for CompletionsClient
{   async fn generate(
      &self
    , prompt: &str
    , params: &crate::GenerationParameters
    ) -> crate::gateway::GenerateReply
    {   debug!("generate queued");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        self.tx.send(CompletionsCommand::Generate {
          prompt: prompt.to_string(),
          params: *params,
          reply: reply_tx,
        }).map_err(|_| {
          error!("Completions client disconnected");
          crate::error::Error::GenerationUnavailable(
            "completions client disconnected".to_string()
          )
        })?;

        match reply_rx.recv().await
        {   Some(result) => result
          , None => {
              error!("Completions client dropped the request");
              Err(crate::error::Error::GenerationUnavailable(
                "completions client stopped".to_string()
              ))
            }
        }
    }

    fn name(&self) -> &str
    {   "completions"
    }
}

/// Main completions event loop.
/// Commands are handled in arrival order, but each HTTP request runs
/// in its own task so a stalled call never holds up the next one.
async fn run_completions_loop(
  mut cmd_rx: mpsc::UnboundedReceiver<CompletionsCommand>
, config: crate::config::GatewayConfig
)
{   debug!("Starting completions client loop");
    let mut state = CompletionsClientState::new(config);

    loop
    { match cmd_rx.recv().await
      {   Some(CompletionsCommand::Generate {
            prompt, params, reply
          }) => {
            debug!("Processing Generate");
            match state.prepare_generate(prompt, params)
            {   Ok(prepared) => {
                  tokio::spawn(async move {
                    let _ = reply.send(send_completion(prepared).await);
                  });
                }
              , Err(e) => {
                  let _ = reply.send(Err(e));
                }
            }
          }
        , Some(CompletionsCommand::SetApiKey { key, reply }) => {
            debug!("Processing SetApiKey");
            let result = state.handle_set_api_key(key);
            let _ = reply.send(result);
          }
        , Some(CompletionsCommand::Shutdown) => {
            info!("Completions client shutting down");
            break;
          }
        , None => {
            debug!("Command channel closed");
            break;
          }
      }
    }
}
