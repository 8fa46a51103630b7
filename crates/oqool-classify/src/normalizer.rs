//! Text normalization and trivial-input detection.
//!
//! Classification runs over a lower-cased, trimmed copy of the message.
//! Arabic has no case, so lower-casing only affects Latin text.

/// Substring greetings: any occurrence marks the message as small talk.
pub const GREETINGS: &[&str] = &[
    "مرحبا", "مرحباً", "أهلا", "أهلاً", "صباح الخير", "مساء الخير", "شكرا", "شكراً",
    "hello", "hi", "hey", "thanks", "bye",
];

/// Peace greetings that only count as standalone tokens, so that
/// "سلام" inside "الإسلام" is not mistaken for a greeting.
pub const EXACT_GREETINGS: &[&str] = &["سلام", "السلام عليكم", "وعليكم السلام"];

/// Messages shorter than this (in characters, after trimming) are trivial.
pub const MIN_QUERY_CHARS: usize = 3;

/// Lower-case and trim. Inner whitespace is preserved so that regex
/// patterns see the text the way the user wrote it.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

pub fn is_too_short(normalized: &str) -> bool {
    normalized.chars().count() < MIN_QUERY_CHARS
}

pub fn has_greeting(normalized: &str) -> bool {
    GREETINGS.iter().any(|g| normalized.contains(g))
}

/// True when a peace greeting is the whole message, or opens or closes it
/// as a space-delimited token.
pub fn has_exact_greeting(normalized: &str) -> bool {
    let trimmed = normalized.trim();
    EXACT_GREETINGS.iter().any(|g| {
        trimmed == *g
            || trimmed
                .strip_prefix(g)
                .is_some_and(|rest| rest.starts_with(' '))
            || trimmed
                .strip_suffix(g)
                .is_some_and(|rest| rest.ends_with(' '))
    })
}

/// Greeting or trivially short text; routed straight to the assistant.
pub fn is_trivial(normalized: &str) -> bool {
    is_too_short(normalized) || has_greeting(normalized) || has_exact_greeting(normalized)
}
