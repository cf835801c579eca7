//! Output sanitizer for a chat-app target

use regex::Regex;
use std::sync::LazyLock;
use log::{debug, trace};

/// Longest reply, in characters, including the ellipsis
pub const MAX_REPLY_CHARS: usize = 500;

const ELLIPSIS: char = '…';

static ROLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^assistant:\s*").expect("role prefix pattern")
});

static BOLD: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern")
});

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?s)```.*?```").expect("code fence pattern")
});

fn clean_once(text: &str) -> String
{   let text = ROLE_PREFIX.replace(text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = CODE_FENCE.replace_all(&text, "");
    text.trim().to_string()
}

/// Reduce raw model output to a sendable reply.
///
/// Strips an echoed `Assistant:` marker, unwraps `**bold**`, drops
/// fenced code blocks and trims. The passes repeat until nothing
/// changes, so the function is idempotent. Text longer than
/// [`MAX_REPLY_CHARS`] is cut on a character boundary and ends in `…`.
/// An empty return means the output was unusable.
pub fn normalize(raw: &str) -> String
{   debug!("Normalizing {} bytes of model output", raw.len());
    let mut cleaned = clean_once(raw);
    loop
    {   let next = clean_once(&cleaned);
        if next == cleaned
        {   break;
        }
        cleaned = next;
    }

    if cleaned.chars().count() <= MAX_REPLY_CHARS
    {   return cleaned;
    }

    trace!("Truncating reply to {} chars", MAX_REPLY_CHARS);
    let mut truncated: String = cleaned
      .chars()
      .take(MAX_REPLY_CHARS - 1)
      .collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push(ELLIPSIS);
    truncated
}
