use async_trait::async_trait;
use reply_agent::agent::{
  STATUS_GENERATED, STATUS_GENERATION_EMPTY, STATUS_GENERATION_FAILED
};
use reply_agent::config::AgentConfig;
use reply_agent::gateway::{GenerateReply, Generator};
use reply_agent::{
  Error, GenerationParameters, Length, ModelStatus, ReplyAgent,
  ReplyRequest, Tone
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Returns a canned reply and records what it was asked
struct Canned
{   reply: GenerateReply
  , calls: Mutex<Vec<(String, GenerationParameters)>>
}

impl Canned
{   fn new(reply: GenerateReply) -> Arc<Self>
    {   Arc::new(Canned
        {   reply
          , calls: Mutex::new(vec![])
        })
    }
}

#[async_trait]
impl Generator for Canned
{   async fn generate(
      &self
    , prompt: &str
    , params: &GenerationParameters
    ) -> GenerateReply
    {   self.calls.lock().unwrap().push((prompt.to_string(), *params));
        self.reply.clone()
    }
}

/// Hangs on its first call, answers every later one at once
struct StallsFirstCall
{   called: AtomicBool
}

#[async_trait]
impl Generator for StallsFirstCall
{   async fn generate(
      &self
    , _prompt: &str
    , _params: &GenerationParameters
    ) -> GenerateReply
    {   if !self.called.swap(true, Ordering::SeqCst)
        {   tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok("Sure, see you at 4.".to_string())
    }
}

fn init_logging()
{   let _ = env_logger::builder().is_test(true).try_init();
}

fn quick_config() -> AgentConfig
{   let mut config = AgentConfig::default();
    config.warmup.delay_ms = 0;
    config
}

fn agent(generator: Arc<dyn Generator>) -> ReplyAgent
{   ReplyAgent::new(generator, quick_config())
}

#[tokio::test]
async fn test_generated_reply_is_normalized()
{   init_logging();
    let canned = Canned::new(Ok(
      "Assistant: **Sure**, 4 PM works for me. ```ignore```".to_string()
    ));
    let agent = agent(canned.clone());
    let request = ReplyRequest::new(
      "Hi! Can we move to 4 PM instead?", Tone::Friendly, Length::Short
    )
      .with_context("You: Are we still on for tomorrow?");

    let result = agent.generate_reply(&request).await.unwrap();
    assert_eq!(result.text, "Sure, 4 PM works for me.");
    assert!(!result.used_fallback);
    assert_eq!(result.status_message, STATUS_GENERATED);

    let calls = canned.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, request.prompt());
    assert_eq!(calls[0].1.max_new_tokens, 64);
    assert_eq!(calls[0].1.temperature, 0.7);
    assert_eq!(calls[0].1.top_p, 0.95);
}

#[tokio::test]
async fn test_failed_generation_uses_fallback()
{   init_logging();
    let canned = Canned::new(Err(Error::GenerationUnavailable(
      "model missing".to_string()
    )));
    let agent = agent(canned);
    let request = ReplyRequest::new(
      "Can we move to 4 PM instead?", Tone::Friendly, Length::Short
    );

    let result = agent.generate_reply(&request).await.unwrap();
    assert_eq!(result.text, "Hey! Sure, I can do that.");
    assert!(result.used_fallback);
    assert_eq!(result.status_message, STATUS_GENERATION_FAILED);
}

#[tokio::test]
async fn test_timeout_uses_fallback()
{   let agent = agent(Canned::new(Err(Error::Timeout)));
    let request = ReplyRequest::new(
      "Thanks so much!", Tone::Formal, Length::Medium
    );

    let result = agent.generate_reply(&request).await.unwrap();
    assert_eq!(result.text, "Hello, You're welcome!");
    assert!(result.used_fallback);
}

#[tokio::test]
async fn test_empty_generation_uses_fallback()
{   let cases = [
      Ok("   ".to_string())
    , Ok("Assistant: ```just code```".to_string())
    , Err(Error::EmptyGeneration)
    ];
    for reply in cases
    {   let agent = agent(Canned::new(reply));
        let request = ReplyRequest::new(
          "ok", Tone::Concise, Length::Long
        );
        let result = agent.generate_reply(&request).await.unwrap();
        assert_eq!(result.text, "Got it!");
        assert!(result.used_fallback);
        assert_eq!(result.status_message, STATUS_GENERATION_EMPTY);
    }
}

#[tokio::test]
async fn test_blank_message_never_reaches_generator()
{   let canned = Canned::new(Ok("hello".to_string()));
    let agent = agent(canned.clone());
    let request = ReplyRequest::new("   ", Tone::Friendly, Length::Short);

    let result = agent.generate_reply(&request).await;
    assert_eq!(result, Err(Error::InputInvalid));
    assert!(canned.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_share_link_of_result()
{   let agent = agent(Canned::new(Err(Error::Timeout)));
    let request = ReplyRequest::new(
      "Can we move to 4 PM instead?", Tone::Friendly, Length::Short
    );
    let result = agent.generate_reply(&request).await.unwrap();
    assert_eq!(
      result.share_link().as_deref()
    , Some("https://wa.me/?text=Hey%21%20Sure%2C%20I%20can%20do%20that.")
    );
}

#[tokio::test]
async fn test_warm_up_reports_ready()
{   let canned = Canned::new(Ok("x".to_string()));
    let agent = agent(canned.clone());

    let mut status = agent.warm_up();
    assert_eq!(status.recv().await, Some(ModelStatus::Loading));
    assert_eq!(status.recv().await, Some(ModelStatus::Ready));
    assert_eq!(status.recv().await, None);

    let calls = canned.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.chars().count(), 60);
    assert!(calls[0].0.starts_with("System: You are a WhatsApp"));
    assert_eq!(calls[0].1, GenerationParameters::warmup());
}

#[tokio::test]
async fn test_warm_up_failure_is_only_status()
{   let agent = agent(Canned::new(Err(Error::GenerationUnavailable(
      "download failed".to_string()
    ))));

    let mut status = agent.warm_up();
    assert_eq!(status.recv().await, Some(ModelStatus::Loading));
    assert_eq!(status.recv().await, Some(ModelStatus::FallbackOnly));
}

#[tokio::test]
async fn test_warm_up_disabled()
{   let mut config = quick_config();
    config.warmup.enabled = false;
    let canned = Canned::new(Ok("x".to_string()));
    let agent = ReplyAgent::new(canned.clone(), config);

    let mut status = agent.warm_up();
    assert_eq!(status.recv().await, None);
    assert!(canned.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_stalled_warm_up_does_not_block_replies()
{   let agent = agent(Arc::new(StallsFirstCall
    {   called: AtomicBool::new(false)
    }));
    let mut status = agent.warm_up();
    assert_eq!(status.recv().await, Some(ModelStatus::Loading));

    let request = ReplyRequest::new(
      "See you at 4?", Tone::Friendly, Length::Short
    );
    let reply = tokio::time::timeout(
      Duration::from_secs(2),
      agent.generate_reply(&request)
    ).await
      .expect("reply waited on the warm-up")
      .unwrap();
    assert_eq!(reply.text, "Sure, see you at 4.");
    assert!(!reply.used_fallback);
    assert_eq!(reply.status_message, STATUS_GENERATED);
}

#[test]
#[should_panic]
fn test_warm_up_needs_a_runtime()
{   let agent = agent(Canned::new(Ok("x".to_string())));
    let _ = agent.warm_up();
}

#[tokio::test]
async fn test_warm_up_and_reply_race_independently()
{   let canned = Canned::new(Ok("Sounds good, see you then.".to_string()));
    let agent = agent(canned.clone());

    let mut status = agent.warm_up();
    let request = ReplyRequest::new(
      "See you at 4?", Tone::Friendly, Length::Short
    );
    let (reply, _) = tokio::join!(
      agent.generate_reply(&request),
      async {
        assert_eq!(status.recv().await, Some(ModelStatus::Loading));
        assert_eq!(status.recv().await, Some(ModelStatus::Ready));
      }
    );
    let reply = reply.unwrap();
    assert_eq!(reply.text, "Sounds good, see you then.");
    assert!(!reply.used_fallback);
    assert_eq!(canned.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_from_config_without_key_falls_back()
{   let mut config = quick_config();
    config.gateway.api_key = None;
    config.gateway.api_key_env =
      "REPLY_AGENT_TEST_NO_SUCH_KEY".to_string();
    let agent = ReplyAgent::from_config(config).unwrap();

    let request = ReplyRequest::new(
      "Where is the venue?", Tone::Sales, Length::Medium
    );
    let result = agent.generate_reply(&request).await.unwrap();
    assert!(result.used_fallback);
    assert_eq!(result.status_message, STATUS_GENERATION_FAILED);
    assert_eq!(
      result.text
    , "Great question… Sure, I can do that. \
       Would you like a quick overview of the benefits?"
    );
}
