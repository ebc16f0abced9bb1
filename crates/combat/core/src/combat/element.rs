//! Elemental profile resolution.
//!
//! Rules are evaluated in a fixed order: absorption first, then the strict
//! whitelist, then per-element rates and caster boosts. An absorbed hit skips
//! every later rule, so absorption wins even against a whitelist that would
//! have discarded the element.

use bitflags::bitflags;

use crate::config::CombatConfig;
use crate::state::CombatModifiers;

/// Index of one element tag (bit position in an [`ElementSet`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ElementId(pub u8);

impl ElementId {
    pub const PHYSICAL: Self = Self(1);
    pub const FIRE: Self = Self(2);
    pub const ICE: Self = Self(3);
    pub const THUNDER: Self = Self(4);
    pub const WATER: Self = Self(5);
    pub const EARTH: Self = Self(6);
    pub const WIND: Self = Self(7);
    pub const LIGHT: Self = Self(8);
    pub const DARKNESS: Self = Self(9);
}

bitflags! {
    /// Set of element tags carried by a skill or listed by a modifier.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct ElementSet: u64 {
        const PHYSICAL = 1 << 1;
        const FIRE     = 1 << 2;
        const ICE      = 1 << 3;
        const THUNDER  = 1 << 4;
        const WATER    = 1 << 5;
        const EARTH    = 1 << 6;
        const WIND     = 1 << 7;
        const LIGHT    = 1 << 8;
        const DARKNESS = 1 << 9;

        // Content may define elements beyond the named ones.
        const _ = !0;
    }
}

impl ElementSet {
    /// Singleton set; ids past the last bit yield an empty set.
    pub fn of(element: ElementId) -> Self {
        1u64.checked_shl(u32::from(element.0))
            .map_or(Self::empty(), Self::from_bits_retain)
    }

    pub fn from_ids(ids: impl IntoIterator<Item = ElementId>) -> Self {
        ids.into_iter().fold(Self::empty(), |set, id| set | Self::of(id))
    }

    pub fn has(&self, element: ElementId) -> bool {
        let single = Self::of(element);
        !single.is_empty() && self.contains(single)
    }

    /// Element ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        let bits = self.bits();
        (0..u64::BITS as u8)
            .filter(move |i| bits & (1u64 << *i) != 0)
            .map(ElementId)
    }
}

/// Result of resolving a skill's elements against a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementalOutcome {
    /// The target absorbs the hit: it restores instead of harming.
    Absorbed { rate: f64 },
    /// Ordinary scaling; `rate` may be zero for immune targets.
    Scaled { rate: f64 },
}

impl ElementalOutcome {
    pub fn rate(&self) -> f64 {
        match *self {
            Self::Absorbed { rate } | Self::Scaled { rate } => rate,
        }
    }

    pub fn is_absorbed(&self) -> bool {
        matches!(self, Self::Absorbed { .. })
    }
}

/// Computes the elemental scalar for `elements` hitting the target.
///
/// `caster` and `target` are every modifier source of each side.
pub fn resolve_elemental(
    elements: ElementSet,
    caster: &[&CombatModifiers],
    target: &[&CombatModifiers],
    config: &CombatConfig,
) -> ElementalOutcome {
    let absorb = target.iter().fold(ElementSet::empty(), |set, m| set | m.absorb);
    let absorbed = elements & absorb;
    if !absorbed.is_empty() {
        let rate = absorbed
            .ids()
            .map(|element| absorb_rate(element, target, config))
            .product();
        return ElementalOutcome::Absorbed { rate };
    }

    let strict = target
        .iter()
        .fold(ElementSet::empty(), |set, m| set | m.strict_elements);
    let surviving = if strict.is_empty() {
        elements
    } else {
        elements & strict
    };

    if surviving.is_empty() {
        return ElementalOutcome::Scaled {
            rate: config.no_element_rate,
        };
    }

    let rate = surviving
        .ids()
        .map(|element| {
            let base: f64 = target
                .iter()
                .filter_map(|m| m.element_rates.get(&element))
                .product();
            let boost: i32 = caster
                .iter()
                .filter_map(|m| m.element_boosts.get(&element))
                .sum();
            base * (1.0 + f64::from(boost) / 100.0)
        })
        .product();
    ElementalOutcome::Scaled { rate }
}

fn absorb_rate(element: ElementId, target: &[&CombatModifiers], config: &CombatConfig) -> f64 {
    let mut configured = target
        .iter()
        .filter_map(|m| m.absorb_rates.get(&element))
        .peekable();
    if configured.peek().is_none() {
        return config.default_absorb_rate;
    }
    configured.product()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u8]) -> ElementSet {
        ElementSet::from_ids(raw.iter().copied().map(ElementId))
    }

    #[test]
    fn set_helpers() {
        let set = ids(&[2, 4]);
        assert_eq!(set, ElementSet::FIRE | ElementSet::THUNDER);
        assert!(set.has(ElementId::FIRE));
        assert!(!set.has(ElementId(64)));
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![ElementId(2), ElementId(4)]);
    }

    #[test]
    fn absorption_beats_restriction() {
        let config = CombatConfig::default();
        let target = CombatModifiers::new()
            .with_absorb(ElementId(4), Some(2.0))
            .with_strict(ids(&[1, 2]));

        let outcome = resolve_elemental(ids(&[2, 4]), &[], &[&target], &config);
        assert_eq!(outcome, ElementalOutcome::Absorbed { rate: 2.0 });

        let outcome = resolve_elemental(ids(&[4]), &[], &[&target], &config);
        assert!(outcome.is_absorbed());
    }

    #[test]
    fn absorb_rates_multiply_or_default() {
        let config = CombatConfig::default();
        let armor = CombatModifiers::new().with_absorb(ElementId::FIRE, Some(1.5));
        let ring = CombatModifiers::new().with_absorb(ElementId::FIRE, Some(2.0));
        let outcome = resolve_elemental(ElementSet::FIRE, &[], &[&armor, &ring], &config);
        assert_eq!(outcome.rate(), 3.0);

        let cloak = CombatModifiers::new().with_absorb(ElementId::ICE, None);
        let outcome = resolve_elemental(ElementSet::ICE, &[], &[&cloak], &config);
        assert_eq!(outcome.rate(), config.default_absorb_rate);
    }

    #[test]
    fn strict_whitelist_discards_other_elements() {
        let config = CombatConfig::default();
        let target = CombatModifiers::new()
            .with_strict(ElementSet::FIRE)
            .with_element_rate(ElementId::FIRE, 0.5)
            .with_element_rate(ElementId::ICE, 3.0);

        let outcome = resolve_elemental(ElementSet::FIRE | ElementSet::ICE, &[], &[&target], &config);
        assert_eq!(outcome, ElementalOutcome::Scaled { rate: 0.5 });

        let outcome = resolve_elemental(ElementSet::ICE, &[], &[&target], &config);
        assert_eq!(outcome.rate(), config.no_element_rate);
    }

    #[test]
    fn boosts_sum_and_rates_multiply() {
        let config = CombatConfig::default();
        let staff = CombatModifiers::new().with_element_boost(ElementId::FIRE, 20);
        let talent = CombatModifiers::new().with_element_boost(ElementId::FIRE, 30);
        let weak = CombatModifiers::new().with_element_rate(ElementId::FIRE, 2.0);
        let wet = CombatModifiers::new().with_element_rate(ElementId::FIRE, 0.5);

        let outcome =
            resolve_elemental(ElementSet::FIRE, &[&staff, &talent], &[&weak, &wet], &config);
        assert_eq!(outcome.rate(), 1.5);
    }

    #[test]
    fn empty_skill_uses_no_element_rate() {
        let config = CombatConfig {
            no_element_rate: 0.75,
            ..CombatConfig::default()
        };
        let outcome = resolve_elemental(ElementSet::empty(), &[], &[], &config);
        assert_eq!(outcome, ElementalOutcome::Scaled { rate: 0.75 });
    }
}
