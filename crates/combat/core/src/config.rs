use crate::state::EffectId;

/// Combat balance constants and tunable defaults.
///
/// Every value here is a default: skills and effects may override the
/// critical multiplier and stack cap individually.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatConfig {
    /// Simulation steps per second. Informational; timers count ticks.
    pub ticks_per_second: u32,

    /// Critical multiplier before caster bonuses are added.
    pub critical_base_multiplier: f64,

    /// Absorption rate used when no source configures one for the element.
    pub default_absorb_rate: f64,

    /// Elemental scalar for skills whose element set is empty after filtering.
    pub no_element_rate: f64,

    /// Stack cap for effects that do not declare their own.
    pub default_max_stacks: u8,

    /// Length of the "recently applied" countdown re-armed on every apply.
    pub recently_applied_ticks: u32,

    /// Duration given to effects whose definition lacks a usable one.
    pub minimal_effect_duration: u32,

    /// Damage reduction (percent) applied to a blocked hit.
    pub block_reduction_percent: u32,

    /// Ticks between an enemy's defeat and its removal from the encounter.
    pub despawn_delay: u32,

    /// Terminal effect applied to a battler when its HP reaches zero.
    pub death_effect: Option<EffectId>,
}

impl CombatConfig {
    pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;
    pub const DEFAULT_CRITICAL_BASE_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_ABSORB_RATE: f64 = 2.0;
    pub const DEFAULT_NO_ELEMENT_RATE: f64 = 1.0;
    pub const DEFAULT_MAX_STACKS: u8 = 5;
    pub const DEFAULT_RECENTLY_APPLIED_TICKS: u32 = 30;
    pub const DEFAULT_MINIMAL_EFFECT_DURATION: u32 = 1;
    pub const DEFAULT_BLOCK_REDUCTION_PERCENT: u32 = 50;
    pub const DEFAULT_DESPAWN_DELAY: u32 = 60;

    pub fn new() -> Self {
        Self {
            ticks_per_second: Self::DEFAULT_TICKS_PER_SECOND,
            critical_base_multiplier: Self::DEFAULT_CRITICAL_BASE_MULTIPLIER,
            default_absorb_rate: Self::DEFAULT_ABSORB_RATE,
            no_element_rate: Self::DEFAULT_NO_ELEMENT_RATE,
            default_max_stacks: Self::DEFAULT_MAX_STACKS,
            recently_applied_ticks: Self::DEFAULT_RECENTLY_APPLIED_TICKS,
            minimal_effect_duration: Self::DEFAULT_MINIMAL_EFFECT_DURATION,
            block_reduction_percent: Self::DEFAULT_BLOCK_REDUCTION_PERCENT,
            despawn_delay: Self::DEFAULT_DESPAWN_DELAY,
            death_effect: None,
        }
    }

    pub fn with_death_effect(mut self, effect: EffectId) -> Self {
        self.death_effect = Some(effect);
        self
    }

    pub fn with_despawn_delay(mut self, ticks: u32) -> Self {
        self.despawn_delay = ticks;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
