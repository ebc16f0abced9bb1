//! Per-slot cooldown timer.
//!
//! A cooldown tracks two orthogonal countdowns:
//!
//! ```text
//! base:  CoolingDown ──(remaining hits 0)──▶ BaseReady
//! combo: ComboWindow ──(remaining hits 0)──▶ ComboReady
//! ```
//!
//! Combo state only has meaning while the base countdown runs; the moment the
//! base becomes ready the combo countdown is wiped and `needs_combo_clear` is
//! raised so the owning slot can drop its recorded follow-up. A locked
//! cooldown keeps its counts frozen until unlocked.

/// Timer state owned by exactly one skill slot.
///
/// Invariants kept by every method:
/// - `base_ready` is true iff `base_remaining == 0`
/// - `combo_ready` is never true while `combo_remaining > 0`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldown {
    pub base_remaining: u32,
    pub base_ready: bool,
    pub combo_remaining: u32,
    pub combo_ready: bool,
    pub locked: bool,
    pub needs_combo_clear: bool,
}

impl Cooldown {
    /// A cooldown with nothing pending: base ready, no combo armed.
    pub const fn cleared() -> Self {
        Self {
            base_remaining: 0,
            base_ready: true,
            combo_remaining: 0,
            combo_ready: false,
            locked: false,
            needs_combo_clear: false,
        }
    }

    /// Advances both countdowns by one tick.
    pub fn advance(&mut self) {
        if self.locked {
            return;
        }

        if self.base_remaining > 0 {
            self.base_remaining -= 1;
            if self.base_remaining == 0 {
                self.base_ready = true;
                self.reset_combo();
                return;
            }
        }

        if self.base_ready {
            return;
        }

        if self.combo_remaining > 0 {
            self.combo_remaining -= 1;
            if self.combo_remaining == 0 {
                self.combo_ready = true;
            }
        }
    }

    pub fn set_base(&mut self, frames: u32) {
        self.base_remaining = frames;
        self.refresh_base();
    }

    /// Adds (or with a negative delta, removes) base frames, clamped at zero.
    pub fn add_base(&mut self, frames: i32) {
        self.base_remaining = offset(self.base_remaining, frames);
        self.refresh_base();
    }

    /// Arms the combo window. A zero-length window is ready immediately.
    pub fn set_combo(&mut self, frames: u32) {
        self.combo_remaining = frames;
        self.combo_ready = frames == 0;
        self.needs_combo_clear = false;
    }

    pub fn add_combo(&mut self, frames: i32) {
        let before = self.combo_remaining;
        self.combo_remaining = offset(before, frames);
        if self.combo_remaining > 0 {
            self.combo_ready = false;
        } else if before > 0 {
            self.combo_ready = true;
        }
    }

    /// Drops any armed or ready combo without touching the base countdown.
    pub fn clear_combo(&mut self) {
        self.combo_remaining = 0;
        self.combo_ready = false;
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_base_ready(&self) -> bool {
        self.base_ready
    }

    pub fn is_combo_ready(&self) -> bool {
        self.combo_ready
    }

    /// Consumes the "needs combo clear" flag, returning whether it was raised.
    pub fn take_combo_clear(&mut self) -> bool {
        std::mem::take(&mut self.needs_combo_clear)
    }

    /// Returns false when the flags disagree with the remaining counts.
    ///
    /// Only reachable through direct field edits or a tampered save-state.
    pub fn is_consistent(&self) -> bool {
        self.base_ready == (self.base_remaining == 0)
            && !(self.combo_ready && self.combo_remaining > 0)
    }

    fn refresh_base(&mut self) {
        if self.base_remaining > 0 {
            self.base_ready = false;
        } else if !self.base_ready {
            self.base_ready = true;
            self.reset_combo();
        }
    }

    fn reset_combo(&mut self) {
        self.clear_combo();
        self.needs_combo_clear = true;
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::cleared()
    }
}

fn offset(value: u32, delta: i32) -> u32 {
    let shifted = i64::from(value) + i64::from(delta);
    shifted.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_counts_down_to_ready() {
        for (remaining, steps) in [(0, 0), (0, 3), (5, 2), (5, 5), (5, 9), (30, 29)] {
            let mut cd = Cooldown::cleared();
            cd.set_base(remaining);
            for _ in 0..steps {
                cd.advance();
            }
            let expected = remaining.saturating_sub(steps);
            assert_eq!(cd.base_remaining, expected);
            assert_eq!(cd.base_ready, expected == 0);
            assert!(cd.is_consistent());
        }
    }

    #[test]
    fn locked_cooldown_never_moves() {
        let mut cd = Cooldown::cleared();
        cd.set_base(10);
        cd.set_combo(4);
        cd.lock();
        for _ in 0..50 {
            cd.advance();
        }
        assert_eq!(cd.base_remaining, 10);
        assert_eq!(cd.combo_remaining, 4);

        cd.unlock();
        cd.advance();
        assert_eq!(cd.base_remaining, 9);
        assert_eq!(cd.combo_remaining, 3);
    }

    #[test]
    fn combo_becomes_ready_while_base_cools() {
        let mut cd = Cooldown::cleared();
        cd.set_base(30);
        cd.set_combo(20);
        for _ in 0..20 {
            cd.advance();
        }
        assert!(cd.is_combo_ready());
        assert!(!cd.is_base_ready());
        assert_eq!(cd.base_remaining, 10);
    }

    #[test]
    fn base_ready_wipes_combo_state() {
        let mut cd = Cooldown::cleared();
        cd.set_base(3);
        cd.set_combo(1);
        cd.advance();
        assert!(cd.is_combo_ready());

        cd.advance();
        cd.advance();
        assert!(cd.is_base_ready());
        assert!(!cd.is_combo_ready());
        assert_eq!(cd.combo_remaining, 0);
        assert!(cd.take_combo_clear());
        assert!(!cd.take_combo_clear());
    }

    #[test]
    fn combo_window_longer_than_base_never_fires() {
        let mut cd = Cooldown::cleared();
        cd.set_base(5);
        cd.set_combo(10);
        for _ in 0..12 {
            cd.advance();
        }
        assert!(cd.is_base_ready());
        assert!(!cd.is_combo_ready());
        assert_eq!(cd.combo_remaining, 0);
    }

    #[test]
    fn setters_keep_flags_consistent() {
        let mut cd = Cooldown::cleared();
        cd.set_base(4);
        assert!(!cd.base_ready);
        cd.add_base(-10);
        assert_eq!(cd.base_remaining, 0);
        assert!(cd.base_ready);
        cd.add_base(7);
        assert_eq!(cd.base_remaining, 7);
        assert!(!cd.base_ready);

        cd.set_combo(2);
        cd.add_combo(-2);
        assert!(cd.combo_ready);
        cd.add_combo(3);
        assert!(!cd.combo_ready);
        assert!(cd.is_consistent());
    }

    #[test]
    fn tampered_flags_are_detected() {
        let mut cd = Cooldown::cleared();
        cd.base_remaining = 12;
        assert!(!cd.is_consistent());
    }
}
