//! Text sanitisation for names reused in filenames and logs.

/// Characters stripped from account names and titles.
const UNSAFE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Strip characters unsafe for downstream use.
///
/// Total and idempotent: never fails, and cleaning cleaned text is a no-op.
pub fn clean(text: &str) -> String {
    text.chars()
        .filter(|c| !UNSAFE_CHARS.contains(c) && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
