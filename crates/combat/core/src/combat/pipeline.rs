//! Ordered damage/effect pipeline.
//!
//! ```text
//! Lookup → LevelScaling → Critical → Elemental → Amount
//!        → Apply (per hit) → SelfEffects → Cooldown → Report
//! ```
//!
//! Every fallible check happens in `Lookup`, before any state is touched, so
//! a rejected action never leaves partial mutations on either side.

use crate::config::CombatConfig;
use crate::env::{
    CombatEnv, DamageKind, EffectCategory, EffectChance, EffectOracle, SkillDefinition, compute_seed,
};
use crate::error::{CombatError, ResolveError};
use crate::state::{
    Battler, BattlerId, BattlerKind, EffectId, EffectSpec, ResourceKind, Roster, SkillId,
    SkillSlot, SlotKey, SlotReadiness, modifiers::sum_percent,
};

use super::{
    AppliedEffect, CombatResult, ElementalOutcome, HitRecord, RemovedEffect, critical_multiplier,
    damage_multiplier, evaluate, resolve_elemental, reward_multiplier,
};

/// Named pipeline stages, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ResolveStage {
    Lookup,
    Readiness,
    LevelScaling,
    Critical,
    Elemental,
    Amount,
    Apply,
    SelfEffects,
    Cooldown,
    Report,
}

/// An attempted action, as submitted by the input or AI layer.
///
/// `skill` names the slot: either its bound skill or its recorded follow-up.
/// With `combo` set the slot's follow-up executes instead of the bound skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub caster: BattlerId,
    pub target: BattlerId,
    pub skill: SkillId,
    pub combo: bool,
}

impl ActionRequest {
    pub fn base(caster: BattlerId, target: BattlerId, skill: SkillId) -> Self {
        Self {
            caster,
            target,
            skill,
            combo: false,
        }
    }

    pub fn combo(caster: BattlerId, target: BattlerId, skill: SkillId) -> Self {
        Self {
            caster,
            target,
            skill,
            combo: true,
        }
    }
}

// Roll contexts within one hit.
const ROLL_PARRY: u32 = 0;
const ROLL_CRITICAL: u32 = 1;
const ROLL_BLOCK: u32 = 2;
const ROLL_ON_HIT: u32 = 3;
const ROLL_ON_CAST: u32 = 4;
const ROLL_INFLICT: u32 = 8;

/// Checks that the slot named by `request` is ready for the requested mode.
///
/// Base readiness wins: a combo request against a slot whose base cooldown
/// has finished is not ready.
pub fn check_readiness(roster: &Roster, request: &ActionRequest) -> Result<(), ResolveError> {
    let (_, slot) =
        caster_slot(roster, request).map_err(|e| ResolveError::new(ResolveStage::Lookup, e))?;

    let ready = match (slot.readiness(), request.combo) {
        (SlotReadiness::Base, false) => true,
        (SlotReadiness::Combo(_), true) => true,
        _ => false,
    };
    if ready {
        Ok(())
    } else {
        Err(ResolveError::new(
            ResolveStage::Readiness,
            CombatError::SlotNotReady {
                battler: request.caster,
                skill: request.skill,
            },
        ))
    }
}

/// Resolves one action against the roster.
///
/// Slot readiness is not checked here; the scheduler gates submissions with
/// [`check_readiness`]. `seed` is the per-action seed; independent rolls
/// derive from it with [`compute_seed`].
pub fn resolve(
    roster: &mut Roster,
    request: &ActionRequest,
    env: CombatEnv<'_>,
    seed: u64,
) -> Result<CombatResult, ResolveError> {
    let plan =
        prepare(roster, request, &env).map_err(|e| ResolveError::new(ResolveStage::Lookup, e))?;
    let def = plan.def;
    let config = env.config();
    let rng = env.rng();

    let mut result = CombatResult::new(request.caster, request.target, def.id, request.combo, def.kind);
    result.level_scalar = plan.level_scalar;
    result.elemental_scalar = plan.elemental.rate();
    result.absorbed = plan.elemental.is_absorbed();

    // Apply
    if let Some(caster) = roster.get_mut(request.caster) {
        caster.apply_delta(ResourceKind::Hp, -i64::from(def.cost.hp));
        caster.apply_delta(ResourceKind::Mp, -i64::from(def.cost.mp));
    }

    let restores = def.kind.is_recovery() != result.absorbed;
    let hostile = !restores;
    let scalar = plan.level_scalar * plan.elemental.rate();
    let mut cured = false;

    for hit in 0..def.hits.max(1) {
        if !roster.get(request.target).is_some_and(Battler::is_alive) {
            break;
        }
        let roll = |context| compute_seed(seed, u64::from(hit), request.caster.0, context);

        let mut record = HitRecord {
            parried: hostile && def.parryable && rng.chance(roll(ROLL_PARRY), plan.parry_percent),
            ..HitRecord::default()
        };
        if record.parried {
            result.record_hit(record, 0);
            continue;
        }

        record.critical = rng.chance(roll(ROLL_CRITICAL), plan.critical_rate);
        let critical = if record.critical {
            plan.critical_scalar
        } else {
            1.0
        };
        let mut amount = scaled(plan.base, scalar * critical);
        record.blocked = hostile && rng.chance(roll(ROLL_BLOCK), plan.block_percent);
        if record.blocked {
            let kept = 100 - u64::from(config.block_reduction_percent.min(100));
            amount = amount * kept / 100;
        }

        let raw = if restores {
            amount as i64
        } else {
            -(amount as i64)
        };
        if let Some(target) = roster.get_mut(request.target) {
            record.delta = target.apply_delta(result.resource, raw);
        }
        if def.kind == DamageKind::HpDrain && !result.absorbed {
            if let Some(caster) = roster.get_mut(request.caster) {
                result.drained += caster.apply_delta(ResourceKind::Hp, -record.delta);
            }
        }
        result.record_hit(record, raw);

        let defeated = roster
            .get(request.target)
            .is_some_and(|t| t.hp == 0 && !t.defeated);
        if defeated {
            defeat(roster, request.target, plan.caster_level, &env, &mut result);
        } else {
            if !cured {
                cured = true;
                cure(roster, request.target, def, &mut result);
            }
            for (index, chance) in def.inflicts.iter().enumerate() {
                let context = ROLL_INFLICT + index as u32;
                if rng.chance(roll(context), percent(chance)) {
                    apply_effect(roster, request.target, request.caster, chance, &env, &mut result);
                }
            }
        }
        if let Some(chance) = &def.on_hit {
            if rng.chance(roll(ROLL_ON_HIT), percent(chance)) {
                apply_effect(roster, request.caster, request.caster, chance, &env, &mut result);
            }
        }
    }

    // SelfEffects
    if let Some(chance) = &def.on_cast {
        let seed = compute_seed(seed, u64::from(def.hits), request.caster.0, ROLL_ON_CAST);
        if rng.chance(seed, percent(chance)) {
            apply_effect(roster, request.caster, request.caster, chance, &env, &mut result);
        }
    }

    // Cooldown
    if let Some(slot) = roster
        .get_mut(request.caster)
        .and_then(|c| c.slots.slot_mut(plan.slot))
    {
        if request.combo {
            slot.start_combo(def.cooldown, def.combo());
        } else {
            slot.start_base(def.cooldown, def.combo());
        }
    }

    // Report
    Ok(result)
}

/// Everything the later stages need, computed from immutable snapshots.
struct Plan<'e> {
    def: &'e SkillDefinition,
    slot: SlotKey,
    caster_level: u32,
    level_scalar: f64,
    critical_rate: i32,
    critical_scalar: f64,
    elemental: ElementalOutcome,
    base: u32,
    parry_percent: i32,
    block_percent: i32,
}

fn prepare<'e>(
    roster: &Roster,
    request: &ActionRequest,
    env: &CombatEnv<'e>,
) -> Result<Plan<'e>, CombatError> {
    let (caster, slot) = caster_slot(roster, request)?;
    let target = roster
        .get(request.target)
        .filter(|t| t.is_alive() && !t.suspended)
        .ok_or(CombatError::TargetInvalid {
            battler: request.target,
        })?;

    let executed = executed_skill(slot, request)?;
    let def = env
        .skills()
        .skill(executed)
        .ok_or(CombatError::InvalidSkillReference { skill: executed })?;

    let hp_short = def.cost.hp > 0 && caster.hp <= def.cost.hp;
    if hp_short || caster.mp < def.cost.mp {
        return Err(CombatError::InsufficientResource {
            battler: caster.id,
            skill: def.id,
            hp: def.cost.hp,
            mp: def.cost.mp,
        });
    }

    let config = env.config();
    let caster_sources = caster.modifier_sources(env.effects());
    let target_sources = target.modifier_sources(env.effects());

    // LevelScaling
    let level_scalar = if def.kind.is_damage() {
        damage_multiplier(caster.level, target.level)
    } else {
        1.0
    };

    // Critical
    let critical_rate = caster.stats.critical_rate
        + def.critical_rate
        + sum_percent(&caster_sources, |m| m.critical_rate);
    let critical_scalar = critical_multiplier(
        def.critical_multiplier
            .unwrap_or(config.critical_base_multiplier),
        caster_sources.iter().map(|m| m.critical_bonus).sum(),
        sum_percent(&target_sources, |m| m.critical_reduction),
    );

    // Elemental
    let elemental = resolve_elemental(def.elements, &caster_sources, &target_sources, config);

    // Amount
    let base = evaluate(&def.formula, caster, target);

    Ok(Plan {
        def,
        slot: slot.key,
        caster_level: caster.level,
        level_scalar,
        critical_rate,
        critical_scalar,
        elemental,
        base,
        parry_percent: sum_percent(&target_sources, |m| m.parry_percent),
        block_percent: sum_percent(&target_sources, |m| m.block_percent),
    })
}

fn caster_slot<'r>(
    roster: &'r Roster,
    request: &ActionRequest,
) -> Result<(&'r Battler, &'r SkillSlot), CombatError> {
    let caster = roster
        .get(request.caster)
        .filter(|c| c.is_alive() && !c.suspended)
        .ok_or(CombatError::CasterInvalid {
            battler: request.caster,
        })?;
    if !caster.can_act() {
        return Err(CombatError::CasterIncapacitated { battler: caster.id });
    }
    let slot = caster
        .slots
        .slot_for(request.skill, request.combo)
        .ok_or(CombatError::SkillNotBound {
            battler: caster.id,
            skill: request.skill,
        })?;
    Ok((caster, slot))
}

fn executed_skill(slot: &SkillSlot, request: &ActionRequest) -> Result<SkillId, CombatError> {
    if request.combo {
        return slot.combo_chain.ok_or(CombatError::SlotNotReady {
            battler: request.caster,
            skill: request.skill,
        });
    }
    if slot.skill == Some(request.skill) {
        Ok(request.skill)
    } else {
        Err(CombatError::SkillNotBound {
            battler: request.caster,
            skill: request.skill,
        })
    }
}

fn scaled(base: u32, scalar: f64) -> u64 {
    let value = (f64::from(base) * scalar).round();
    if value <= 0.0 {
        0
    } else {
        value.min(u32::MAX as f64) as u64
    }
}

fn percent(chance: &EffectChance) -> i32 {
    i32::try_from(chance.percent).unwrap_or(i32::MAX)
}

fn cure(roster: &mut Roster, target: BattlerId, def: &SkillDefinition, result: &mut CombatResult) {
    let Some(battler) = roster.get_mut(target) else {
        return;
    };
    for &effect in &def.cures {
        let clearable = battler
            .statuses
            .get(effect)
            .is_some_and(|e| e.category.is_clearable());
        if clearable && battler.statuses.remove(effect).is_some() {
            result.removed_effects.push(RemovedEffect {
                battler: target,
                effect,
            });
        }
    }
}

fn apply_effect(
    roster: &mut Roster,
    holder: BattlerId,
    source: BattlerId,
    chance: &EffectChance,
    env: &CombatEnv<'_>,
    result: &mut CombatResult,
) {
    let Some(battler) = roster.get_mut(holder).filter(|b| b.is_alive()) else {
        return;
    };
    let config = env.config();
    let (spec, diagnostics) = EffectSpec::resolve(chance.effect, env.effects(), chance.duration, config);
    let outcome = battler
        .statuses
        .apply(&spec, source, config.recently_applied_ticks);
    result.applied_effects.push(AppliedEffect {
        battler: holder,
        effect: spec.id,
        outcome,
    });
    result.diagnostics.extend(diagnostics);
}

/// Marks the target defeated, clears what death clears and applies the
/// configured terminal effect.
fn defeat(
    roster: &mut Roster,
    target: BattlerId,
    killer_level: u32,
    env: &CombatEnv<'_>,
    result: &mut CombatResult,
) {
    let Some(battler) = roster.get_mut(target) else {
        return;
    };
    let config = env.config();
    let outcome = mark_defeated(battler, result.caster, env.effects(), config);

    result.removed_effects.extend(outcome.cleared.into_iter().map(|effect| RemovedEffect {
        battler: target,
        effect,
    }));
    if let Some(applied) = outcome.death {
        result.applied_effects.push(applied);
    }
    result.diagnostics.extend(outcome.diagnostics);
    result.defeated = true;

    let reward = f64::from(battler.reward) * reward_multiplier(killer_level, battler.level);
    result.reward = Some(reward.round() as u32);
}

pub(crate) struct DefeatOutcome {
    pub cleared: Vec<EffectId>,
    pub death: Option<AppliedEffect>,
    pub diagnostics: Vec<CombatError>,
}

pub(crate) fn mark_defeated(
    battler: &mut Battler,
    source: BattlerId,
    effects: &dyn EffectOracle,
    config: &CombatConfig,
) -> DefeatOutcome {
    battler.hp = 0;
    battler.defeated = true;
    let cleared = battler
        .statuses
        .clear_clearable()
        .into_iter()
        .map(|e| e.effect)
        .collect();

    let mut diagnostics = Vec::new();
    let death = config.death_effect.map(|effect| {
        let (mut spec, problems) = EffectSpec::resolve(effect, effects, None, config);
        spec.category = EffectCategory::Terminal;
        diagnostics.extend(problems);
        AppliedEffect {
            battler: battler.id,
            effect,
            outcome: battler
                .statuses
                .apply(&spec, source, config.recently_applied_ticks),
        }
    });

    if battler.kind == BattlerKind::Enemy {
        battler.despawn_in = Some(config.despawn_delay);
    }

    DefeatOutcome {
        cleared,
        death,
        diagnostics,
    }
}
