//! Prompt builder

use crate::{Language, Length, Tone};

fn tone_phrase(tone: Tone) -> &'static str
{   match tone
    {   Tone::Friendly => "friendly, warm, natural"
      , Tone::Formal => "professional and polite"
      , Tone::Concise => "succinct, to-the-point"
      , Tone::Empathetic => "empathetic and reassuring"
      , Tone::Sales => "persuasive but not pushy, value-focused"
    }
}

fn length_phrase(length: Length) -> &'static str
{   match length
    {   Length::Short => "1-2 sentences"
      , Length::Medium => "2-4 sentences"
      , Length::Long => "a short paragraph"
    }
}

fn language_directive(language: &Language) -> String
{   match language
    {   Language::Auto => "Match the user's language".to_string()
      , Language::Code(code) => format!("Write in {}", code)
    }
}

/// Compose the instruction string sent to the backend.
///
/// Section order is fixed: system preamble with the language
/// directive, optional conversation, guidelines, user message and
/// finally the `Assistant:` cue the completion continues from.
pub fn build_prompt(
  incoming: &str
, tone: Tone
, length: Length
, language: &Language
, context: Option<&str>
) -> String
{   let mut prompt = format!(
      "System: You are a WhatsApp reply assistant. \
       Draft a reply considering tone, brevity, and clarity. \
       {}. Avoid emojis unless present in the context. \
       No preambles."
    , language_directive(language)
    );

    if let Some(ctx) = context.map(str::trim).filter(|c| !c.is_empty())
    {   prompt.push_str("\n\nConversation so far:\n");
        prompt.push_str(ctx);
    }

    prompt.push_str(&format!(
      "\n\nGuidelines: Tone: {}. Length: {}. \
       Add a helpful follow-up question only if appropriate."
    , tone_phrase(tone)
    , length_phrase(length)
    ));

    prompt.push_str("\n\nUser message: ");
    prompt.push_str(incoming.trim());
    prompt.push_str("\n\nAssistant:");
    prompt
}

impl crate::ReplyRequest
{   pub fn prompt(&self) -> String
    {   build_prompt(
          &self.incoming_message
        , self.tone
        , self.length
        , &self.language
        , self.conversation_context.as_deref()
        )
    }
}
