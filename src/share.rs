//! WhatsApp share links

const WHATSAPP_SHARE_BASE: &str = "https://wa.me/?text=";

/// Link that opens WhatsApp with `text` prefilled; `None` when
/// there is nothing to share. Everything outside `A-Za-z0-9-_.~` is
/// escaped, including `!'()*`, which is still valid for the link.
pub fn whatsapp_link(text: &str) -> Option<String>
{   if text.is_empty()
    {   return None;
    }
    Some(format!(
      "{}{}",
      WHATSAPP_SHARE_BASE,
      urlencoding::encode(text)
    ))
}
