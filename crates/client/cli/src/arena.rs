//! Scripted duel between a player duelist and an enemy brute.
//!
//! The script stands in for input handling and AI: each tick it submits at
//! most one ready, affordable action per battler, steps the runtime, and
//! prints what happened.

use anyhow::{Context, Result};
use combat_core::{
    ActionRequest, Battler, BattlerId, CombatEvent, CombatModifiers, CombatResult, CombatStats,
    EffectId, ElementId, SkillId, SlotKey, SlotReadiness, TeamId, Tick,
};
use runtime::Runtime;

pub const DUELIST: BattlerId = BattlerId(1);
pub const BRUTE: BattlerId = BattlerId(2);

const SLASH: SkillId = SkillId(1);
const FIREBALL: SkillId = SkillId(4);
const HEAL: SkillId = SkillId(6);
const VENOM_BITE: SkillId = SkillId(9);
const BATTLE_CRY: SkillId = SkillId(10);
const STONE_FIST: SkillId = SkillId(11);

const FURY: EffectId = EffectId(4);

/// Below this share of max HP the duelist heals before attacking.
const HEAL_THRESHOLD_PERCENT: u64 = 40;

pub struct Arena<'a> {
    runtime: &'a mut Runtime,
}

impl<'a> Arena<'a> {
    /// Spawns both battlers and binds the duelist's loadout.
    pub fn setup(runtime: &'a mut Runtime) -> Result<Self> {
        runtime.spawn(duelist()).context("failed to spawn the duelist")?;
        runtime.spawn(brute()).context("failed to spawn the brute")?;

        for (key, skill) in [
            (SlotKey::Primary, SLASH),
            (SlotKey::Secondary, FIREBALL),
            (SlotKey::Utility, HEAL),
            (SlotKey::Special, BATTLE_CRY),
        ] {
            runtime
                .bind(DUELIST, key, skill, false)
                .with_context(|| format!("failed to bind {key} on the duelist"))?;
        }

        Ok(Self { runtime })
    }

    /// Runs until one side falls or `ticks` elapse. Returns the winner.
    pub fn run(&mut self, ticks: u64) -> Option<BattlerId> {
        for _ in 0..ticks {
            let requests = [self.duelist_action(), self.brute_action()];
            for request in requests.into_iter().flatten() {
                self.runtime.submit(request);
            }

            let report = self.runtime.tick();
            for event in &report.events {
                if let Some(line) = self.describe(event) {
                    println!("[{:>5}] {line}", report.tick);
                }
            }

            if let Some(winner) = self.winner() {
                return Some(winner);
            }
        }
        None
    }

    pub fn print_summary(&self, winner: Option<BattlerId>) {
        let tick: Tick = self.runtime.current_tick();
        match winner {
            Some(winner) => println!("\n{winner} wins after {tick} ticks"),
            None => println!("\ndraw after {tick} ticks"),
        }

        let telemetry = self.runtime.telemetry();
        for battler in [DUELIST, BRUTE] {
            println!(
                "{battler}: dealt {} / taken {} / healed {} / kills {}",
                telemetry.damage_dealt(battler),
                telemetry.damage_taken(battler),
                telemetry.healing_done(battler),
                telemetry.kills(battler),
            );
        }
        for (code, count) in telemetry.dropped_by_code() {
            println!("dropped {code}: {count}");
        }
    }

    fn duelist_action(&self) -> Option<ActionRequest> {
        let me = self.runtime.battler(DUELIST).filter(|b| b.can_act())?;
        let wounded =
            u64::from(me.hp) * 100 < u64::from(me.stats.max_hp) * HEAL_THRESHOLD_PERCENT;
        let furious = me.statuses.has(FURY);

        [
            (SlotKey::Utility, DUELIST, wounded),
            (SlotKey::Special, DUELIST, !furious),
            (SlotKey::Primary, BRUTE, true),
            (SlotKey::Secondary, BRUTE, true),
        ]
        .into_iter()
        .filter(|(_, _, wanted)| *wanted)
        .find_map(|(key, target, _)| self.ready(me, key, target))
    }

    fn brute_action(&self) -> Option<ActionRequest> {
        let me = self.runtime.battler(BRUTE).filter(|b| b.can_act())?;
        me.slots
            .iter()
            .find_map(|slot| self.ready(me, slot.key, DUELIST))
    }

    /// A request for whatever `key` can execute now, if the caster can pay.
    fn ready(&self, caster: &Battler, key: SlotKey, target: BattlerId) -> Option<ActionRequest> {
        let skill = caster.slots.slot(key)?.skill?;
        let (request, executed) = match self.runtime.engine().resolve_ready_slot(caster.id, key) {
            SlotReadiness::Base => (ActionRequest::base(caster.id, target, skill), skill),
            SlotReadiness::Combo(follow_up) => {
                (ActionRequest::combo(caster.id, target, follow_up), follow_up)
            }
            SlotReadiness::NotReady => return None,
        };

        let cost = &self.runtime.content().skills.get(executed)?.cost;
        let affordable = caster.mp >= cost.mp && (cost.hp == 0 || caster.hp > cost.hp);
        affordable.then_some(request)
    }

    fn winner(&self) -> Option<BattlerId> {
        let standing = |id| self.runtime.battler(id).is_some_and(Battler::is_alive);
        match (standing(DUELIST), standing(BRUTE)) {
            (true, false) => Some(DUELIST),
            (false, true) => Some(BRUTE),
            _ => None,
        }
    }

    fn describe(&self, event: &CombatEvent) -> Option<String> {
        let line = match event {
            CombatEvent::ActionResolved(result) => self.describe_result(result),
            CombatEvent::ActionRejected(rejection) if rejection.is_routine() => return None,
            CombatEvent::ActionRejected(rejection) => format!("dropped: {}", rejection.error),
            CombatEvent::EffectApplied {
                battler,
                effect,
                outcome,
            } => format!("{battler} gains {} ({outcome:?})", self.effect_name(*effect)),
            CombatEvent::EffectRemoved {
                battler,
                effect,
                expired: true,
            } => format!("{battler}: {} wore off", self.effect_name(*effect)),
            CombatEvent::EffectRemoved {
                battler, effect, ..
            } => format!("{battler}: {} removed", self.effect_name(*effect)),
            CombatEvent::BattlerDefeated {
                battler,
                by,
                reward,
            } => match reward {
                Some(reward) => format!("{battler} defeated by {by} (reward {reward})"),
                None => format!("{battler} defeated by {by}"),
            },
            CombatEvent::BattlerRemoved { battler } => format!("{battler} leaves the arena"),
            CombatEvent::BattlerSuspended { battler, error } => {
                format!("{battler} suspended: {error}")
            }
            CombatEvent::Diagnostic(error) => format!("content problem: {error}"),
        };
        Some(line)
    }

    fn describe_result(&self, result: &CombatResult) -> String {
        let skill = self
            .runtime
            .content()
            .skills
            .get(result.skill)
            .map_or("?", |def| def.name.as_str());

        let mut line = format!("{} uses {skill} on {}", result.caster, result.target);
        if result.combo {
            line.push_str(" [combo]");
        }
        if result.damage_dealt() > 0 {
            line.push_str(&format!(": {} {} damage", result.damage_dealt(), result.resource));
        } else if result.restored() > 0 {
            line.push_str(&format!(": restores {} {}", result.restored(), result.resource));
        }

        let tags: Vec<&str> = [
            (result.critical, "critical"),
            (result.parried, "parried"),
            (result.blocked, "blocked"),
            (result.absorbed, "absorbed"),
        ]
        .into_iter()
        .filter_map(|(set, tag)| set.then_some(tag))
        .collect();
        if !tags.is_empty() {
            line.push_str(&format!(" ({})", tags.join(", ")));
        }
        line
    }

    fn effect_name(&self, effect: EffectId) -> String {
        self.runtime
            .content()
            .effects
            .get(effect)
            .map_or_else(|| format!("effect {effect}"), |def| def.name.clone())
    }
}

fn duelist() -> Battler {
    let stats = CombatStats {
        max_hp: 420,
        max_mp: 60,
        attack: 48,
        defense: 22,
        magic: 36,
        magic_defense: 18,
        agility: 30,
        luck: 10,
        critical_rate: 8,
    };
    Battler::player(DUELIST, TeamId(0), 12, stats)
        .with_equipment(CombatModifiers::new().with_parry(10))
        .with_modifiers(CombatModifiers::new().with_element_rate(ElementId::EARTH, 0.8))
}

fn brute() -> Battler {
    let stats = CombatStats {
        max_hp: 900,
        max_mp: 0,
        attack: 44,
        defense: 30,
        magic: 10,
        magic_defense: 12,
        agility: 12,
        luck: 4,
        critical_rate: 5,
    };
    Battler::enemy(BRUTE, TeamId(1), 14, stats, [VENOM_BITE, STONE_FIST])
        .with_modifiers(
            CombatModifiers::new()
                .with_element_rate(ElementId::FIRE, 1.5)
                .with_block(15),
        )
        .with_reward(120)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime(seed: u64) -> Runtime {
        Runtime::builder()
            .seed(seed)
            .build()
            .expect("embedded content builds")
    }

    #[test]
    fn both_sides_trade_blows() {
        let mut runtime = runtime(11);
        let mut arena = Arena::setup(&mut runtime).expect("arena sets up");
        arena.run(600);

        let telemetry = runtime.telemetry();
        assert!(telemetry.damage_dealt(DUELIST) > 0);
        assert!(telemetry.damage_dealt(BRUTE) > 0);
        assert_eq!(telemetry.dropped("COMBAT_INVALID_SKILL_REFERENCE"), 0);
    }

    #[test]
    fn same_seed_same_duel() {
        let mut first = runtime(23);
        let mut second = runtime(23);
        let a = Arena::setup(&mut first).expect("arena sets up").run(900);
        let b = Arena::setup(&mut second).expect("arena sets up").run(900);

        assert_eq!(a, b);
        assert_eq!(first.engine(), second.engine());
        assert_eq!(first.telemetry(), second.telemetry());
    }

    #[test]
    fn setup_rejects_a_second_arena() {
        let mut runtime = runtime(1);
        assert!(Arena::setup(&mut runtime).is_ok());
        assert!(Arena::setup(&mut runtime).is_err());
    }
}
