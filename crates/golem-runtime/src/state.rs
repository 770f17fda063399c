use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;

use golem_core::Location;

/// Where the bot is in the server-side auth handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Registering,
    LoggedIn,
}

/// Follow target plus the generation token that cancels stale ticks.
///
/// Invariant: following ⇔ `target` is set. The generation moves on every
/// start/stop, so a reconciliation loop holding an older generation can
/// never act after cancellation.
#[derive(Debug, Default)]
pub struct FollowState {
    pub target: Option<String>,
    pub generation: u64,
}

impl FollowState {
    pub fn is_following(&self) -> bool {
        self.target.is_some()
    }

    /// Begin following; returns the generation the new tick loop carries.
    pub fn start(&mut self, target: impl Into<String>) -> u64 {
        self.generation += 1;
        self.target = Some(target.into());
        self.generation
    }

    /// Stop following. Any tick holding an older generation self-cancels.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.target = None;
    }

    /// Whether a tick loop started with `generation` for `target` is still
    /// the live one.
    pub fn is_current(&self, generation: u64, target: &str) -> bool {
        self.generation == generation && self.target.as_deref() == Some(target)
    }
}

/// Mutable per-bot state. Lives as long as the process and survives
/// reconnects; only the auth phase is re-derived per connection.
#[derive(Debug)]
pub struct BotState {
    pub auth: AuthPhase,
    /// Set after the first /register of this process; never reset, so every
    /// later connection logs in instead.
    pub registered: bool,
    pub follow: FollowState,
    pub home: Option<Location>,
    pub base: Option<Location>,
    pub team: BTreeSet<String>,
    /// What `!find` is currently looking for. Advisory only.
    pub search_target: Option<String>,
}

impl Default for BotState {
    fn default() -> Self {
        Self::new()
    }
}

impl BotState {
    pub fn new() -> Self {
        Self {
            auth: AuthPhase::Unauthenticated,
            registered: false,
            follow: FollowState::default(),
            home: None,
            base: None,
            team: BTreeSet::new(),
            search_target: None,
        }
    }
}

pub type SharedState = Arc<Mutex<BotState>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_generation_invalidates_old_ticks() {
        let mut follow = FollowState::default();
        let first = follow.start("Alice");
        assert!(follow.is_current(first, "Alice"));

        follow.stop();
        assert!(!follow.is_current(first, "Alice"));
        assert!(!follow.is_following());

        let second = follow.start("Bob");
        assert!(!follow.is_current(first, "Alice"));
        assert!(follow.is_current(second, "Bob"));
    }

    #[test]
    fn test_retarget_invalidates_previous_generation() {
        let mut follow = FollowState::default();
        let first = follow.start("Alice");
        let second = follow.start("Bob");
        assert!(!follow.is_current(first, "Alice"));
        assert!(follow.is_current(second, "Bob"));
    }
}
