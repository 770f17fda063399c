//! Outbound chat chunking.
//!
//! The server rejects chat lines over a fixed length, so long replies are
//! hard-split into fragments and paced one second apart. Public fragments
//! carry an `@<speaker>` prefix so the addressee can follow the thread;
//! whispers are already private and go out bare.

use std::time::Duration;

use golem_core::Result;

use crate::session::GameSession;

/// Ceiling on a single chat message, in characters.
pub const MAX_CHAT_LEN: usize = 100;
/// Gap between successive fragments of one long reply.
pub const FRAGMENT_DELAY: Duration = Duration::from_secs(1);

/// Split a reply into fragments of at most [`MAX_CHAT_LEN`] characters.
/// Hard boundaries, no word awareness.
pub fn split_fragments(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(MAX_CHAT_LEN)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Deliver a (possibly long) reply, chunked and paced.
pub async fn send_reply(
    session: &dyn GameSession,
    speaker: &str,
    text: &str,
    whisper: bool,
) -> Result<()> {
    for (i, fragment) in split_fragments(text).into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(FRAGMENT_DELAY).await;
        }
        if whisper {
            session.send_whisper(speaker, &fragment).await?;
        } else {
            session.send_chat(&format!("@{speaker} {fragment}")).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_is_one_fragment() {
        let fragments = split_fragments("hello");
        assert_eq!(fragments, vec!["hello".to_string()]);
    }

    #[test]
    fn test_fragment_count_is_ceil_of_len_over_max() {
        let text = "x".repeat(250);
        let fragments = split_fragments(&text);
        assert_eq!(fragments.len(), 3); // ceil(250 / 100)
        assert!(fragments.iter().all(|f| f.chars().count() <= MAX_CHAT_LEN));
    }

    #[test]
    fn test_concatenation_equals_original() {
        let text: String = ('a'..='z').cycle().take(333).collect();
        let fragments = split_fragments(&text);
        assert_eq!(fragments.concat(), text);
    }

    #[test]
    fn test_exact_boundary() {
        let text = "y".repeat(200);
        let fragments = split_fragments(&text);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].len(), 100);
        assert_eq!(fragments[1].len(), 100);
    }

    #[test]
    fn test_multibyte_characters_split_on_char_boundaries() {
        let text = "ü".repeat(150);
        let fragments = split_fragments(&text);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].chars().count(), 100);
        assert_eq!(fragments.concat(), text);
    }
}
