use regex::Regex;

use golem_core::{GolemError, Result};

/// Structured commands recognized in public chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Ping,
    Time,
    Players,
    Follow { target: String },
    Stop,
    SetHome,
    Home,
    SetBase,
    Team { player: String },
    Find { structure: String },
    TeamList,
    RemoveTeam { player: String },
}

/// Classifies incoming chat lines.
///
/// Two independent passes can both fire on one line: the directed-speech
/// pass (AI reply) and the structured-command pass. A line like
/// "Golem !help" triggers both; the passes are deliberately not mutually
/// exclusive.
pub struct ChatRouter {
    bot_name: String,
    name_pattern: Regex,
}

impl ChatRouter {
    pub fn new(bot_name: &str) -> Result<Self> {
        let name_pattern = Regex::new(&format!("(?i){}", regex::escape(bot_name)))
            .map_err(|e| GolemError::Config(format!("bad bot name pattern: {e}")))?;
        Ok(Self {
            bot_name: bot_name.to_string(),
            name_pattern,
        })
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// True when the speaker is the bot itself (self-echo suppression).
    pub fn is_self(&self, speaker: &str) -> bool {
        speaker == self.bot_name
    }

    /// If the line is directed at the bot, return the residue to hand to
    /// the AI pipeline.
    ///
    /// A line is directed when it mentions the bot name anywhere
    /// (case-insensitive) or starts with `!` or `@`. The mention rule means
    /// any sentence containing the bot's name draws a reply, even when the
    /// bot is only being talked about — that is deliberate.
    pub fn directed_residue(&self, text: &str) -> Option<String> {
        let directed = text.starts_with('!')
            || text.starts_with('@')
            || self.name_pattern.is_match(text);
        if !directed {
            return None;
        }
        let stripped = self.name_pattern.replace_all(text, "");
        let stripped = stripped.strip_prefix(['!', '@']).unwrap_or(&stripped);
        let residue = stripped.trim();
        (!residue.is_empty()).then(|| residue.to_string())
    }

    /// Parse a structured command. Token 0 is matched lowercased; arguments
    /// keep their original case so player names resolve exactly.
    pub fn parse_command(text: &str) -> Option<Command> {
        let mut tokens = text.split(' ');
        let head = tokens.next()?.to_lowercase();
        let args: Vec<&str> = tokens.collect();

        match head.as_str() {
            "!help" => Some(Command::Help),
            "!ping" => Some(Command::Ping),
            "!time" => Some(Command::Time),
            "!players" => Some(Command::Players),
            "!follow" => args.first().map(|t| Command::Follow {
                target: t.to_string(),
            }),
            "!stop" => Some(Command::Stop),
            "!sethome" => Some(Command::SetHome),
            "!home" => Some(Command::Home),
            "!base" => Some(Command::SetBase),
            "!team" => args.first().map(|t| Command::Team {
                player: t.to_string(),
            }),
            "!find" => (!args.is_empty()).then(|| Command::Find {
                structure: args.join(" ").to_lowercase(),
            }),
            "!teamlist" => Some(Command::TeamList),
            "!removeteam" => args.first().map(|t| Command::RemoveTeam {
                player: t.to_string(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> ChatRouter {
        ChatRouter::new("Golem").unwrap()
    }

    // ── Directed-speech detection ──────────────────────────────

    #[test]
    fn test_plain_chatter_is_not_directed() {
        assert_eq!(router().directed_residue("nice weather today"), None);
    }

    #[test]
    fn test_mention_anywhere_is_directed() {
        assert_eq!(
            router().directed_residue("hey golem what's up").as_deref(),
            Some("hey  what's up")
        );
    }

    #[test]
    fn test_bang_prefix_is_directed() {
        assert_eq!(router().directed_residue("!help").as_deref(), Some("help"));
    }

    #[test]
    fn test_at_prefix_is_directed() {
        assert_eq!(
            router().directed_residue("@tell me a joke").as_deref(),
            Some("tell me a joke")
        );
    }

    #[test]
    fn test_name_and_prefix_both_stripped() {
        assert_eq!(
            router().directed_residue("!Golem help").as_deref(),
            Some("help")
        );
    }

    #[test]
    fn test_stripping_is_idempotent_on_clean_text() {
        let r = router();
        let residue = r.directed_residue("@Golem craft a sword").unwrap();
        // The residue contains neither the name nor a leading prefix, so a
        // second pass over it finds nothing to strip.
        assert_eq!(residue, "craft a sword");
        assert!(!r.name_pattern.is_match(&residue));
        assert!(!residue.starts_with(['!', '@']));
    }

    #[test]
    fn test_name_only_message_has_empty_residue() {
        assert_eq!(router().directed_residue("Golem"), None);
        assert_eq!(router().directed_residue("!"), None);
    }

    #[test]
    fn test_self_detection() {
        let r = router();
        assert!(r.is_self("Golem"));
        assert!(!r.is_self("Steve"));
        // Speaker comparison is exact, unlike mention matching
        assert!(!r.is_self("golem"));
    }

    // ── Command parsing ────────────────────────────────────────

    #[test]
    fn test_simple_commands() {
        assert_eq!(ChatRouter::parse_command("!help"), Some(Command::Help));
        assert_eq!(ChatRouter::parse_command("!PING"), Some(Command::Ping));
        assert_eq!(ChatRouter::parse_command("!teamlist"), Some(Command::TeamList));
        assert_eq!(ChatRouter::parse_command("hello"), None);
    }

    #[test]
    fn test_unknown_bang_token_is_no_command() {
        assert_eq!(ChatRouter::parse_command("!dance"), None);
    }

    #[test]
    fn test_follow_keeps_argument_case() {
        assert_eq!(
            ChatRouter::parse_command("!follow Alice"),
            Some(Command::Follow {
                target: "Alice".into()
            })
        );
    }

    #[test]
    fn test_follow_without_target_is_no_command() {
        assert_eq!(ChatRouter::parse_command("!follow"), None);
    }

    #[test]
    fn test_find_joins_and_lowercases_structure() {
        assert_eq!(
            ChatRouter::parse_command("!find Diamond Ore"),
            Some(Command::Find {
                structure: "diamond ore".into()
            })
        );
    }

    #[test]
    fn test_line_can_hit_both_passes() {
        // A directed line that is also a command: both classifications fire
        // independently.
        let r = router();
        let text = "!help Golem";
        assert!(r.directed_residue(text).is_some());
        assert_eq!(ChatRouter::parse_command(text), Some(Command::Help));
    }
}
