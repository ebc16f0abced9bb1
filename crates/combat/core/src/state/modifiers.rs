//! Combat modifier sources.
//!
//! A battler's effective elemental and critical profile is never stored: it
//! is folded on demand from every contributing source (the battler's own
//! base modifiers, each equipped item, and each active status effect).

use std::collections::BTreeMap;

use crate::combat::{ElementId, ElementSet};

/// One contributing source of combat modifiers.
///
/// Sources combine per rule: element rates and absorb rates multiply,
/// element sets union, percentages and bonuses sum.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatModifiers {
    /// Incoming damage multiplier per element (target side).
    pub element_rates: BTreeMap<ElementId, f64>,

    /// Elements converted to healing when they hit this battler.
    pub absorb: ElementSet,

    /// Absorption rate per element; unspecified elements use the config default.
    pub absorb_rates: BTreeMap<ElementId, f64>,

    /// Whitelist of elements allowed to affect this battler (empty = all).
    pub strict_elements: ElementSet,

    /// Outgoing damage bonus per element in percent (caster side).
    pub element_boosts: BTreeMap<ElementId, i32>,

    /// Critical chance bonus in percent points.
    pub critical_rate: i32,

    /// Added to the critical multiplier (0.5 turns 1.5x into 2.0x).
    pub critical_bonus: f64,

    /// Percent of incoming critical bonus damage cancelled.
    pub critical_reduction: i32,

    /// Chance in percent to parry a parryable hit.
    pub parry_percent: i32,

    /// Chance in percent to block a hit.
    pub block_percent: i32,
}

impl CombatModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element_rate(mut self, element: ElementId, rate: f64) -> Self {
        self.element_rates.insert(element, rate);
        self
    }

    /// Absorb `element`; `rate` of `None` defers to the configured default.
    pub fn with_absorb(mut self, element: ElementId, rate: Option<f64>) -> Self {
        self.absorb |= ElementSet::of(element);
        if let Some(rate) = rate {
            self.absorb_rates.insert(element, rate);
        }
        self
    }

    pub fn with_strict(mut self, elements: ElementSet) -> Self {
        self.strict_elements |= elements;
        self
    }

    pub fn with_element_boost(mut self, element: ElementId, percent: i32) -> Self {
        *self.element_boosts.entry(element).or_default() += percent;
        self
    }

    pub fn with_critical(mut self, rate: i32, bonus: f64) -> Self {
        self.critical_rate += rate;
        self.critical_bonus += bonus;
        self
    }

    pub fn with_critical_reduction(mut self, percent: i32) -> Self {
        self.critical_reduction += percent;
        self
    }

    pub fn with_parry(mut self, percent: i32) -> Self {
        self.parry_percent += percent;
        self
    }

    pub fn with_block(mut self, percent: i32) -> Self {
        self.block_percent += percent;
        self
    }
}

/// Sums an integer field across sources.
pub(crate) fn sum_percent<'a>(
    sources: &[&'a CombatModifiers],
    field: impl Fn(&'a CombatModifiers) -> i32,
) -> i32 {
    sources.iter().map(|m| field(*m)).sum()
}
