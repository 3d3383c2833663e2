// src/utils/markdown.rs

//! Telegram MarkdownV2 escaping and caption composition.
//!
//! See <https://core.telegram.org/bots/api#markdownv2-style> for the
//! reserved character list.

use crate::models::Comic;

/// Characters that must be backslash-escaped in MarkdownV2 text.
pub const RESERVED: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c)
}

/// Prefix every reserved character with a backslash.
///
/// Applying this twice escapes the inserted backslashes' neighbours again,
/// so callers must escape raw text exactly once.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if is_reserved(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Resolve HTML entities (`&amp;`, `&#39;`, ...) to literal characters.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

fn escape_decoded(text: &str) -> String {
    escape(&decode_entities(text))
}

/// Build the MarkdownV2 photo caption for a comic.
pub fn compose_message(comic: &Comic) -> String {
    let mut msg = format!(
        "[__*{}\\. {}*__]({})\n\n{}",
        comic.id,
        escape_decoded(&comic.title),
        comic.permalink(),
        escape_decoded(&comic.alt_text)
    );

    if let Some(link) = comic.link.as_deref().filter(|l| !l.is_empty()) {
        msg.push_str(&format!("\n\n[Link]({link})"));
    }
    if let Some(extra) = comic.extra_parts.as_deref().filter(|e| !e.is_empty()) {
        msg.push_str("\n\n");
        msg.push_str(&escape_decoded(extra));
    }

    msg
}
