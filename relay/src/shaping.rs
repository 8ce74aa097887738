//! Redaction and length clamping applied to every provider answer.

use regex::Regex;
use std::sync::OnceLock;

pub const ELLIPSIS: &str = "...";

/// `@handle` mentions
const HANDLE_PATTERN: &str = r"@[A-Za-z0-9_.\-]+";
/// YouTube channel IDs: `UC` plus 22 URL-safe base64 characters
const CHANNEL_ID_PATTERN: &str = r"UC[A-Za-z0-9_\-]{22}";

fn redaction_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!("{}|{}", HANDLE_PATTERN, CHANNEL_ID_PATTERN))
            .unwrap_or_else(|e| panic!("invalid redaction pattern: {e}"))
    })
}

/// Removes handles and channel IDs, then trims.
///
/// Runs to a fixpoint: removing one token can splice its neighbours into a
/// new match, and the result must not contain any.
pub fn redact(text: &str) -> String {
    let pattern = redaction_pattern();
    let mut current = text.to_string();
    loop {
        let next = pattern.replace_all(&current, "");
        if next == current {
            break;
        }
        current = next.into_owned();
    }
    current.trim().to_string()
}

/// Caps `text` at `limit` characters, marking the cut with [`ELLIPSIS`].
pub fn clamp(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit <= ELLIPSIS.len() {
        return text.chars().take(limit).collect();
    }

    let kept: String = text.chars().take(limit - ELLIPSIS.len()).collect();
    // A bare `@` directly before the ellipsis would read as a handle.
    let mut clamped = kept.trim_end_matches('@').to_string();
    clamped.push_str(ELLIPSIS);
    clamped
}

/// Redact, substitute `fallback` if nothing is left, then clamp.
pub fn shape(answer: Option<&str>, fallback: &str, limit: usize) -> String {
    let redacted = answer.map(redact).unwrap_or_default();
    let text = if redacted.is_empty() {
        redact(fallback)
    } else {
        redacted
    };
    clamp(&text, limit)
}
