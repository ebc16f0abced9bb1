//! Skill amount formulas.
//!
//! Formulas are data, evaluated against the caster and target as they stand
//! when the action resolves.
//!
//! ```ignore
//! // 150% caster attack minus 50% target defense
//! Formula::Difference(
//!     Box::new(Formula::CasterStat { stat: StatKind::Attack, percent: 150 }),
//!     Box::new(Formula::TargetStat { stat: StatKind::Defense, percent: 50 }),
//! )
//! ```

use crate::state::{Battler, ResourceKind, StatKind};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formula {
    Constant(u32),

    CasterStat { stat: StatKind, percent: u32 },

    TargetStat { stat: StatKind, percent: u32 },

    CasterLevel { percent: u32 },

    /// Percentage of the target's current resource.
    TargetResource { resource: ResourceKind, percent: u32 },

    /// Percentage of the target's missing resource (max - current).
    TargetMissingResource { resource: ResourceKind, percent: u32 },

    TargetMaxResource { resource: ResourceKind, percent: u32 },

    Sum(Vec<Formula>),

    /// Left minus right, floored at zero.
    Difference(Box<Formula>, Box<Formula>),

    /// Percent product: each factor after the first is read as a percentage.
    Product(Vec<Formula>),

    Min(Vec<Formula>),

    Max(Vec<Formula>),
}

/// Evaluates `formula`. Arithmetic saturates instead of overflowing.
pub fn evaluate(formula: &Formula, caster: &Battler, target: &Battler) -> u32 {
    match formula {
        Formula::Constant(value) => *value,

        Formula::CasterStat { stat, percent } => percent_of(caster.stats.get(*stat), *percent),

        Formula::TargetStat { stat, percent } => percent_of(target.stats.get(*stat), *percent),

        Formula::CasterLevel { percent } => percent_of(caster.level, *percent),

        Formula::TargetResource { resource, percent } => {
            percent_of(target.resource(*resource), *percent)
        }

        Formula::TargetMissingResource { resource, percent } => {
            let missing = target
                .stats
                .max(*resource)
                .saturating_sub(target.resource(*resource));
            percent_of(missing, *percent)
        }

        Formula::TargetMaxResource { resource, percent } => {
            percent_of(target.stats.max(*resource), *percent)
        }

        Formula::Sum(formulas) => formulas
            .iter()
            .fold(0u32, |total, f| total.saturating_add(evaluate(f, caster, target))),

        Formula::Difference(left, right) => {
            evaluate(left, caster, target).saturating_sub(evaluate(right, caster, target))
        }

        Formula::Product(formulas) => {
            let Some((first, rest)) = formulas.split_first() else {
                return 0;
            };
            rest.iter().fold(evaluate(first, caster, target), |acc, f| {
                percent_of(acc, evaluate(f, caster, target))
            })
        }

        Formula::Min(formulas) => formulas
            .iter()
            .map(|f| evaluate(f, caster, target))
            .min()
            .unwrap_or(0),

        Formula::Max(formulas) => formulas
            .iter()
            .map(|f| evaluate(f, caster, target))
            .max()
            .unwrap_or(0),
    }
}

fn percent_of(value: u32, percent: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(percent) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BattlerId, CombatStats, TeamId};

    fn battlers() -> (Battler, Battler) {
        let caster = Battler::player(
            BattlerId(1),
            TeamId(0),
            12,
            CombatStats {
                max_hp: 100,
                attack: 40,
                magic: 30,
                ..CombatStats::default()
            },
        );
        let mut target = Battler::player(
            BattlerId(2),
            TeamId(1),
            8,
            CombatStats {
                max_hp: 200,
                defense: 20,
                ..CombatStats::default()
            },
        );
        target.hp = 150;
        (caster, target)
    }

    #[test]
    fn stat_and_resource_terms() {
        let (caster, target) = battlers();
        let attack = Formula::CasterStat {
            stat: StatKind::Attack,
            percent: 150,
        };
        assert_eq!(evaluate(&attack, &caster, &target), 60);
        assert_eq!(evaluate(&Formula::CasterLevel { percent: 50 }, &caster, &target), 6);

        let missing = Formula::TargetMissingResource {
            resource: ResourceKind::Hp,
            percent: 100,
        };
        assert_eq!(evaluate(&missing, &caster, &target), 50);
        let current = Formula::TargetResource {
            resource: ResourceKind::Hp,
            percent: 10,
        };
        assert_eq!(evaluate(&current, &caster, &target), 15);
    }

    #[test]
    fn combinators() {
        let (caster, target) = battlers();
        let hit = Formula::Difference(
            Box::new(Formula::CasterStat {
                stat: StatKind::Attack,
                percent: 100,
            }),
            Box::new(Formula::TargetStat {
                stat: StatKind::Defense,
                percent: 50,
            }),
        );
        assert_eq!(evaluate(&hit, &caster, &target), 30);

        let floored = Formula::Difference(Box::new(Formula::Constant(3)), Box::new(Formula::Constant(9)));
        assert_eq!(evaluate(&floored, &caster, &target), 0);

        let product = Formula::Product(vec![Formula::Constant(80), Formula::Constant(150)]);
        assert_eq!(evaluate(&product, &caster, &target), 120);
        assert_eq!(evaluate(&Formula::Product(vec![]), &caster, &target), 0);

        let sum = Formula::Sum(vec![Formula::Constant(u32::MAX), Formula::Constant(1)]);
        assert_eq!(evaluate(&sum, &caster, &target), u32::MAX);

        let pick = vec![Formula::Constant(7), Formula::Constant(3)];
        assert_eq!(evaluate(&Formula::Min(pick.clone()), &caster, &target), 3);
        assert_eq!(evaluate(&Formula::Max(pick), &caster, &target), 7);
    }
}
