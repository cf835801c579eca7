//! Heuristic composer: a model-free reply for when generation fails

use regex::Regex;
use std::sync::LazyLock;
use log::debug;
use crate::{Language, Length, Tone};

static APOLOGY: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)sorry|issue|problem|delay").expect("apology pattern")
});

static GRATITUDE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)thanks|thank you").expect("gratitude pattern")
});

static SCHEDULING: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)time|reschedule|move|tomorrow|today|tonight|am|pm")
    .expect("scheduling pattern")
});

static TIMING_FOLLOW_UP: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)time|reschedule|move|when|slot")
    .expect("timing follow-up pattern")
});

static LOCATION_FOLLOW_UP: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)where|venue|location|address|park|parking")
    .expect("location follow-up pattern")
});

/// Which rule produced the core of the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind
{   Question
  , Apology
  , Gratitude
  , Scheduling
  , Generic
}

fn is_question(m: &str) -> bool
{   m.ends_with('?')
}

fn is_apology(m: &str) -> bool
{   APOLOGY.is_match(m)
}

fn is_gratitude(m: &str) -> bool
{   GRATITUDE.is_match(m)
}

fn is_scheduling(m: &str) -> bool
{   SCHEDULING.is_match(m)
}

struct Rule
{   kind: ReplyKind
  , matches: fn(&str) -> bool
  , reply: &'static str
}

/// Evaluated top to bottom, first match wins. Order matters: a
/// question that also apologizes is answered as a question.
static RULES: [Rule; 4] = [
  Rule
  {   kind: ReplyKind::Question
    , matches: is_question
    , reply: "Sure, I can do that."
  }
, Rule
  {   kind: ReplyKind::Apology
    , matches: is_apology
    , reply: "Thanks for flagging, I'll sort this out and keep you posted."
  }
, Rule
  {   kind: ReplyKind::Gratitude
    , matches: is_gratitude
    , reply: "You're welcome!"
  }
, Rule
  {   kind: ReplyKind::Scheduling
    , matches: is_scheduling
    , reply: "That works for me, happy to adjust the time."
  }
];

const GENERIC_REPLY: &str = "Got it!";

/// Classify the trimmed message and return the core acknowledgment
pub fn classify(message: &str) -> (ReplyKind, &'static str)
{   let m = message.trim();
    RULES.iter()
      .find(|rule| (rule.matches)(m))
      .map(|rule| (rule.kind, rule.reply))
      .unwrap_or((ReplyKind::Generic, GENERIC_REPLY))
}

pub fn opener(tone: Tone) -> &'static str
{   match tone
    {   Tone::Friendly => "Hey!"
      , Tone::Formal => "Hello,"
      , Tone::Concise => ""
      , Tone::Empathetic => "I understand…"
      , Tone::Sales => "Great question…"
    }
}

/// Follow-up question, if any, for the message
pub fn follow_up(message: &str, kind: ReplyKind, tone: Tone)
  -> Option<&'static str>
{   // a question is already answered by the acknowledgment
    let topical = kind != ReplyKind::Question;
    if topical && TIMING_FOLLOW_UP.is_match(message)
    {   return Some("Does that timing suit you?");
    }
    if topical && LOCATION_FOLLOW_UP.is_match(message)
    {   return Some("Would you like the address or parking details?");
    }
    if tone == Tone::Sales
    {   return Some("Would you like a quick overview of the benefits?");
    }
    None
}

/// Keep everything up to and including the second `.`, `!` or `?`
fn first_two_sentences(text: &str) -> &str
{   let mut seen = 0;
    for (i, c) in text.char_indices()
    {   if matches!(c, '.' | '!' | '?')
        {   seen += 1;
            if seen == 2
            {   return text[..i + c.len_utf8()].trim();
            }
        }
    }
    text.trim()
}

/// Compose a reply without any model.
///
/// `language` is accepted for signature parity with the model path
/// but not applied; the heuristic only writes English.
pub fn compose_fallback(
  incoming: &str
, tone: Tone
, length: Length
, _language: &Language
) -> String
{   let (kind, core) = classify(incoming);
    debug!("Composing fallback reply, rule {:?}", kind);

    let parts = [
      opener(tone)
    , core
    , follow_up(incoming, kind, tone).unwrap_or("")
    ];
    let reply = parts.iter()
      .flat_map(|p| p.split_whitespace())
      .collect::<Vec<_>>()
      .join(" ");

    match length
    {   Length::Short => first_two_sentences(&reply).to_string()
      , Length::Medium | Length::Long => reply
    }
}
