use serde::{Deserialize, Serialize};

/// Cooldown gate used to suppress accidental double-taps. The current time is
/// supplied by the caller (the shell timestamps tap events), so the gate is
/// deterministic under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    window_ms: u64,
    last_fired_ms: Option<u64>,
}

impl Cooldown {
    #[must_use]
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_fired_ms: None,
        }
    }

    /// Returns true and arms the cooldown when outside the window. A blocked
    /// attempt does not re-arm the window. A clock that moved backwards is
    /// treated as expired.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_fired_ms {
            if now_ms >= last && now_ms - last < self.window_ms {
                return false;
            }
        }
        self.last_fired_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_fired_ms = None;
    }

    #[must_use]
    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fire_always_passes() {
        let mut cooldown = Cooldown::new(800);
        assert!(cooldown.try_fire(0));
    }

    #[test]
    fn blocks_within_window() {
        let mut cooldown = Cooldown::new(800);
        assert!(cooldown.try_fire(1_000));
        assert!(!cooldown.try_fire(1_500));
        assert!(!cooldown.try_fire(1_799));
    }

    #[test]
    fn passes_at_window_edge() {
        let mut cooldown = Cooldown::new(800);
        assert!(cooldown.try_fire(1_000));
        assert!(cooldown.try_fire(1_800));
    }

    #[test]
    fn blocked_attempt_does_not_extend_window() {
        let mut cooldown = Cooldown::new(800);
        assert!(cooldown.try_fire(1_000));
        assert!(!cooldown.try_fire(1_700));
        // Window is still measured from 1_000, not 1_700.
        assert!(cooldown.try_fire(1_801));
    }

    #[test]
    fn backwards_clock_is_treated_as_expired() {
        let mut cooldown = Cooldown::new(800);
        assert!(cooldown.try_fire(5_000));
        assert!(cooldown.try_fire(4_000));
    }

    #[test]
    fn reset_clears_the_gate() {
        let mut cooldown = Cooldown::new(800);
        assert!(cooldown.try_fire(1_000));
        cooldown.reset();
        assert!(cooldown.try_fire(1_001));
    }
}
