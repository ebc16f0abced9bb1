//! Level-difference scaling.
//!
//! | difference | ≤ -10 | -9..-1    | 0   | 1..9              | ≥ 10 |
//! |------------|-------|-----------|-----|-------------------|------|
//! | multiplier | 2.0   | 1.8 → 1.0 | 1.0 | 1.0 → 0.2 (floor) | 0.1  |
//!
//! The table is deliberately asymmetric. Values are computed in tenths so the
//! table is exact.

const CLAMP: i64 = 10;

/// Multiplier for a `difference` of levels (clamped to ±10).
pub fn level_multiplier(difference: i64) -> f64 {
    let tenths = match difference.clamp(-CLAMP, CLAMP) {
        -10 => 20,
        d @ -9..=-1 => 10 + (-d - 1),
        0 => 10,
        d @ 1..=9 => (10 - (d - 1)).max(2),
        _ => 1,
    };
    tenths as f64 / 10.0
}

/// Outgoing damage scaling: `target.level - caster.level`.
pub fn damage_multiplier(caster_level: u32, target_level: u32) -> f64 {
    level_multiplier(i64::from(target_level) - i64::from(caster_level))
}

/// Reward scaling reuses the table with operands swapped: defeating a
/// stronger battler pays more.
pub fn reward_multiplier(recipient_level: u32, defeated_level: u32) -> f64 {
    level_multiplier(i64::from(recipient_level) - i64::from(defeated_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_anchors() {
        assert_eq!(level_multiplier(0), 1.0);
        assert_eq!(level_multiplier(-10), 2.0);
        assert_eq!(level_multiplier(-40), 2.0);
        assert_eq!(level_multiplier(-9), 1.8);
        assert_eq!(level_multiplier(-1), 1.0);
        assert_eq!(level_multiplier(1), 1.0);
        assert_eq!(level_multiplier(2), 0.9);
        assert_eq!(level_multiplier(9), 0.2);
        assert_eq!(level_multiplier(10), 0.1);
        assert_eq!(level_multiplier(99), 0.1);
    }

    #[test]
    fn non_increasing_across_the_range() {
        for x in -12..12 {
            assert!(
                level_multiplier(x) >= level_multiplier(x + 1),
                "multiplier rose between {x} and {}",
                x + 1
            );
        }
    }

    #[test]
    fn reward_uses_swapped_operands() {
        assert_eq!(damage_multiplier(10, 20), 0.1);
        assert_eq!(reward_multiplier(10, 20), 2.0);
        assert_eq!(reward_multiplier(7, 7), 1.0);
    }
}
