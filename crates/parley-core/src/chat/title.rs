//! Session title derivation.
//!
//! A session's title is the leading text of its first user message,
//! truncated with an ellipsis when longer than the limit. Renaming a
//! session later overwrites this.

/// Maximum number of characters kept from the first message.
pub const TITLE_MAX_CHARS: usize = 30;

/// Derive a session title from the first user message.
pub fn derive_title(text: &str) -> String {
    if text.chars().count() <= TITLE_MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_kept_whole() {
        assert_eq!(derive_title("Hello"), "Hello");
    }

    #[test]
    fn test_exactly_thirty_chars_not_truncated() {
        let text = "a".repeat(30);
        assert_eq!(derive_title(&text), text);
    }

    #[test]
    fn test_long_message_truncated_with_ellipsis() {
        let text = "a".repeat(45);
        let title = derive_title(&text);
        assert_eq!(title, format!("{}...", "a".repeat(30)));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = "é".repeat(40);
        let title = derive_title(&text);
        assert_eq!(title.chars().count(), 33);
        assert!(title.ends_with("..."));
    }
}
