use std::collections::HashMap;

use combat_core::{
    ActionRequest, Battler, BattlerId, CombatConfig, CombatEngine, CombatEnv, CombatError,
    CombatEvent, CombatModifiers, CombatStats, EffectCategory, EffectDefinition, EffectDuration,
    EffectId, ElementId, ElementSet, FixedRolls, Formula, ReapplyPolicy, ResolveStage, Roster,
    SkillDefinition, SkillId, SlotKey, SlotReadiness, TeamId, resolve,
};

const HERO: BattlerId = BattlerId(1);
const GOLEM: BattlerId = BattlerId(2);
const WISP: BattlerId = BattlerId(3);

const SLASH: SkillId = SkillId(10);
const RISING: SkillId = SkillId(11);
const EMBER: SkillId = SkillId(20);

const POISON: EffectId = EffectId(1);
const STUN: EffectId = EffectId(2);
const DEATH: EffectId = EffectId(99);

struct World {
    skills: HashMap<SkillId, SkillDefinition>,
    effects: HashMap<EffectId, EffectDefinition>,
    config: CombatConfig,
    rng: FixedRolls,
}

impl World {
    fn new() -> Self {
        let skills = [
            SkillDefinition::new(SLASH, "slash", Formula::Constant(12))
                .with_cooldown(30)
                .with_combo(RISING, 20),
            SkillDefinition::new(RISING, "rising slash", Formula::Constant(18)).with_cooldown(25),
            SkillDefinition::new(EMBER, "ember", Formula::Constant(10))
                .with_elements(ElementSet::of(ElementId(2)) | ElementSet::of(ElementId(4))),
        ];
        let effects = [
            EffectDefinition::new(POISON, "poison")
                .with_category(EffectCategory::Debuff)
                .with_duration(EffectDuration::Ticks(3))
                .with_reapply(ReapplyPolicy::Stack),
            EffectDefinition::new(STUN, "stun")
                .with_category(EffectCategory::Incapacitation)
                .with_duration(EffectDuration::Ticks(2)),
            EffectDefinition::new(DEATH, "knocked out").with_duration(EffectDuration::Indefinite),
        ];
        Self {
            skills: skills.into_iter().map(|s| (s.id, s)).collect(),
            effects: effects.into_iter().map(|e| (e.id, e)).collect(),
            config: CombatConfig::default()
                .with_death_effect(DEATH)
                .with_despawn_delay(3),
            rng: FixedRolls::unlucky(),
        }
    }

    fn env(&self) -> CombatEnv<'_> {
        CombatEnv::new(&self.skills, &self.effects, &self.rng, &self.config)
    }
}

fn stats(max_hp: u32) -> CombatStats {
    CombatStats {
        max_hp,
        max_mp: 20,
        attack: 10,
        ..CombatStats::default()
    }
}

fn hero() -> Battler {
    let mut hero = Battler::player(HERO, TeamId(0), 10, stats(200));
    hero.slots.bind(SlotKey::Primary, SLASH, false);
    hero.slots.bind(SlotKey::Secondary, EMBER, false);
    hero
}

fn golem(hp: u32) -> Battler {
    Battler::enemy(GOLEM, TeamId(1), 10, stats(hp), [SLASH]).with_reward(50)
}

fn engine(golem_hp: u32) -> CombatEngine {
    let mut engine = CombatEngine::new(7);
    engine.spawn(hero()).expect("spawn hero");
    engine.spawn(golem(golem_hp)).expect("spawn golem");
    engine
}

#[test]
fn base_execution_opens_combo_with_follow_up() {
    let world = World::new();
    let mut roster = Roster::new();
    roster.insert(hero()).expect("hero");
    roster.insert(golem(500)).expect("golem");

    let result = resolve(
        &mut roster,
        &ActionRequest::base(HERO, GOLEM, SLASH),
        world.env(),
        1,
    )
    .expect("base slash");
    assert_eq!(result.skill, SLASH);

    let slot = roster
        .get(HERO)
        .and_then(|h| h.slots.slot(SlotKey::Primary))
        .expect("primary slot");
    assert_eq!(slot.cooldown.base_remaining, 30);
    assert_eq!(slot.cooldown.combo_remaining, 20);
    assert_eq!(slot.combo_chain, Some(RISING));

    for _ in 0..5 {
        roster.get_mut(HERO).expect("hero").slots.advance_all();
    }

    let result = resolve(
        &mut roster,
        &ActionRequest::combo(HERO, GOLEM, SLASH),
        world.env(),
        2,
    )
    .expect("combo slash");
    assert_eq!(result.skill, RISING);
    assert!(result.combo);
    assert_eq!(result.damage_dealt(), 18);

    let slot = roster
        .get(HERO)
        .and_then(|h| h.slots.slot(SlotKey::Primary))
        .expect("primary slot");
    assert_eq!(slot.skill, Some(SLASH));
    assert_eq!(slot.cooldown.base_remaining, 25);
}

#[test]
fn scheduler_gates_combo_on_the_window() {
    let world = World::new();
    let mut engine = engine(500);

    engine.submit(ActionRequest::base(HERO, GOLEM, SLASH));
    let report = engine.tick(world.env());
    assert_eq!(report.results().count(), 1);

    engine.submit(ActionRequest::combo(HERO, GOLEM, SLASH));
    let report = engine.tick(world.env());
    let rejection = report.rejections().next().expect("combo too early");
    assert!(rejection.is_routine());
    assert_eq!(rejection.error.stage, ResolveStage::Readiness);

    // The window closes on the 20th advance after the base execution.
    for _ in 0..19 {
        engine.tick(world.env());
    }
    assert_eq!(
        engine.resolve_ready_slot(HERO, SlotKey::Primary),
        SlotReadiness::Combo(RISING)
    );
    assert!(engine.is_any_action_ready(HERO, SlotKey::Primary));

    engine.submit(ActionRequest::combo(HERO, GOLEM, SLASH));
    let report = engine.tick(world.env());
    let result = report.results().next().expect("combo resolves");
    assert_eq!(result.skill, RISING);
}

#[test]
fn absorption_beats_restriction() {
    let world = World::new();
    let mut engine = CombatEngine::new(1);
    engine.spawn(hero()).expect("hero");
    let mut wisp = Battler::enemy(WISP, TeamId(1), 10, stats(100), []).with_modifiers(
        CombatModifiers::new()
            .with_absorb(ElementId(4), Some(2.0))
            .with_strict(ElementSet::of(ElementId(1)) | ElementSet::of(ElementId(2))),
    );
    wisp.hp = 40;
    engine.spawn(wisp).expect("wisp");

    engine.submit(ActionRequest::base(HERO, WISP, EMBER));
    let report = engine.tick(world.env());
    let result = report.results().next().expect("ember resolves");
    assert!(result.absorbed);
    assert_eq!(result.elemental_scalar, 2.0);
    assert_eq!(result.restored(), 20);
    assert_eq!(engine.battler(WISP).map(|w| w.hp), Some(60));
}

#[test]
fn same_tick_actions_resolve_in_submission_order() {
    let world = World::new();
    let mut engine = engine(10);

    engine.submit(ActionRequest::base(HERO, GOLEM, SLASH));
    engine.submit(ActionRequest::base(HERO, GOLEM, EMBER));
    let report = engine.tick(world.env());

    let results: Vec<_> = report.results().collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].defeated);

    // The second hit finds the target already defeated.
    let rejection = report.rejections().next().expect("second rejected");
    assert_eq!(
        rejection.error.error,
        CombatError::TargetInvalid { battler: GOLEM }
    );
    assert!(report.events.iter().any(|e| matches!(
        e,
        CombatEvent::BattlerDefeated { battler: GOLEM, reward: Some(50), .. }
    )));
    assert_eq!(engine.nonce(), 2);
}

#[test]
fn defeated_enemy_carries_death_effect_and_despawns() {
    let world = World::new();
    let mut engine = engine(5);
    engine
        .apply_effect(world.env(), GOLEM, POISON, HERO, None)
        .expect("poison golem");

    engine.submit(ActionRequest::base(HERO, GOLEM, SLASH));
    let report = engine.tick(world.env());
    assert!(report.events.iter().any(|e| matches!(
        e,
        CombatEvent::EffectRemoved { battler: GOLEM, effect: POISON, expired: false }
    )));

    let golem = engine.battler(GOLEM).expect("still present");
    assert!(golem.defeated);
    let death = golem.statuses.get(DEATH).expect("death effect");
    assert_eq!(death.category, EffectCategory::Terminal);
    assert_eq!(golem.despawn_in, Some(3));

    engine.tick(world.env());
    engine.tick(world.env());
    let report = engine.tick(world.env());
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::BattlerRemoved { battler: GOLEM })));
    assert!(engine.battler(GOLEM).is_none());
}

#[test]
fn stacks_outlive_durations_through_the_scheduler() {
    let world = World::new();
    let mut engine = engine(500);
    for _ in 0..3 {
        engine
            .apply_effect(world.env(), GOLEM, POISON, HERO, None)
            .expect("poison");
    }

    let mut removed_at = None;
    for tick in 1..=12 {
        let report = engine.tick(world.env());
        let expired = report.events.iter().any(|e| {
            matches!(e, CombatEvent::EffectRemoved { effect: POISON, expired: true, .. })
        });
        if expired {
            removed_at = Some(tick);
            break;
        }
    }
    assert_eq!(removed_at, Some(9));
}

#[test]
fn stun_blocks_actions_until_explicitly_removed() {
    let world = World::new();
    let mut engine = engine(500);
    engine
        .apply_effect(world.env(), HERO, STUN, GOLEM, None)
        .expect("stun hero");

    for _ in 0..10 {
        engine.tick(world.env());
    }
    assert!(engine.battler(HERO).is_some_and(|h| h.statuses.has(STUN)));

    engine.submit(ActionRequest::base(HERO, GOLEM, SLASH));
    let report = engine.tick(world.env());
    let rejection = report.rejections().next().expect("stunned");
    assert_eq!(rejection.error.error, CombatError::CasterIncapacitated { battler: HERO });

    assert!(engine.remove_effect(HERO, STUN).is_some());
    engine.submit(ActionRequest::base(HERO, GOLEM, SLASH));
    assert_eq!(engine.tick(world.env()).results().count(), 1);
}

#[test]
fn corrupt_battler_is_suspended_alone() {
    let world = World::new();
    let mut tampered = hero();
    if let Some(slot) = tampered.slots.slot_mut(SlotKey::Primary) {
        slot.cooldown.base_ready = false;
    }

    let mut engine = CombatEngine::new(3);
    engine.spawn(tampered).expect("hero");
    engine.spawn(golem(100)).expect("golem");
    engine.submit(ActionRequest::base(GOLEM, HERO, SLASH));
    engine.submit(ActionRequest::base(HERO, GOLEM, SLASH));

    let report = engine.tick(world.env());
    assert!(report.events.iter().any(|e| matches!(
        e,
        CombatEvent::BattlerSuspended { battler: HERO, error: CombatError::CorruptState { .. } }
    )));
    assert!(engine.battler(HERO).is_some_and(|h| h.suspended));

    // The golem still acts; the suspended hero cannot act or be targeted.
    let rejections: Vec<_> = report.rejections().map(|r| r.error.error.clone()).collect();
    assert_eq!(
        rejections,
        vec![
            CombatError::TargetInvalid { battler: HERO },
            CombatError::CasterInvalid { battler: HERO },
        ]
    );
}

#[test]
fn rebinding_the_same_skill_keeps_cooldown() {
    let world = World::new();
    let mut engine = engine(500);
    engine.submit(ActionRequest::base(HERO, GOLEM, SLASH));
    engine.tick(world.env());

    let before = engine
        .battler(HERO)
        .and_then(|h| h.slots.slot(SlotKey::Primary))
        .map(|s| s.cooldown);
    engine
        .bind(HERO, SlotKey::Primary, SLASH, false)
        .expect("hero exists");
    let after = engine
        .battler(HERO)
        .and_then(|h| h.slots.slot(SlotKey::Primary))
        .map(|s| s.cooldown);
    assert_eq!(before, after);
}

#[test]
fn duplicate_spawn_is_rejected() {
    let mut engine = engine(10);
    assert_eq!(
        engine.spawn(hero()),
        Err(CombatError::DuplicateBattler { battler: HERO })
    );
}
