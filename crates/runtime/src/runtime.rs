//! High-level encounter orchestrator.
//!
//! The runtime owns the combat engine together with everything the engine
//! only borrows (content catalogs, RNG, balance config), steps it one tick at
//! a time and fans the tick report out to logs, telemetry and the event bus.

use std::path::Path;

use combat_content::ContentBundle;
use combat_core::{
    ActionRequest, ApplyOutcome, Battler, BattlerId, BindOutcome, CombatConfig, CombatEngine,
    CombatEnv, CombatEvent, EffectDuration, EffectId, PcgRng, SkillId, SlotKey, Tick, TickReport,
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, trace, warn};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::telemetry::Telemetry;

/// Main runtime that hosts one encounter.
///
/// Action selection is not its concern: hosts decide what to submit and when
/// to step.
pub struct Runtime {
    config: RuntimeConfig,
    engine: CombatEngine,
    content: ContentBundle,
    content_issues: Vec<String>,
    rng: PcgRng,
    bus: EventBus,
    telemetry: Telemetry,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Balance config in effect for this encounter.
    pub fn combat_config(&self) -> &CombatConfig {
        &self.content.config
    }

    pub fn content(&self) -> &ContentBundle {
        &self.content
    }

    /// Cross-reference problems found in the content when the runtime was
    /// built. They are logged but do not prevent the encounter from running.
    pub fn content_issues(&self) -> &[String] {
        &self.content_issues
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn battler(&self, id: BattlerId) -> Option<&Battler> {
        self.engine.battler(id)
    }

    pub fn seed(&self) -> u64 {
        self.engine.seed()
    }

    pub fn current_tick(&self) -> Tick {
        self.engine.current_tick()
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Get a cloneable handle to the event bus
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Adds a battler to the encounter.
    pub fn spawn(&mut self, battler: Battler) -> Result<()> {
        let (id, kind, level) = (battler.id, battler.kind, battler.level);
        self.engine.spawn(battler).inspect_err(|err| {
            warn!(battler = %id, error = %err, "spawn rejected");
        })?;

        info!(battler = %id, %kind, level, "battler spawned");
        self.bus.publish(Event::BattlerSpawned {
            tick: self.engine.current_tick(),
            battler: id,
            kind,
        });
        Ok(())
    }

    /// Binds `skill` to a slot, warning when the skill is unknown to the
    /// loaded content. The binding itself is kept either way; the action is
    /// rejected when it is used.
    pub fn bind(
        &mut self,
        battler: BattlerId,
        key: SlotKey,
        skill: SkillId,
        locked: bool,
    ) -> Result<BindOutcome> {
        if !self.content.skills.contains(skill) {
            warn!(battler = %battler, %skill, "binding a skill missing from the catalog");
        }
        let outcome = self.engine.bind(battler, key, skill, locked)?;
        debug!(battler = %battler, ?key, %skill, locked, ?outcome, "slot bound");
        Ok(outcome)
    }

    /// Freezes a slot's countdowns. Returns false if the slot does not exist.
    pub fn lock_slot(&mut self, battler: BattlerId, key: SlotKey) -> Result<bool> {
        let found = self.engine.lock_slot(battler, key)?;
        debug!(battler = %battler, ?key, found, "slot locked");
        Ok(found)
    }

    pub fn unlock_slot(&mut self, battler: BattlerId, key: SlotKey) -> Result<bool> {
        let found = self.engine.unlock_slot(battler, key)?;
        debug!(battler = %battler, ?key, found, "slot unlocked");
        Ok(found)
    }

    /// Queues an action; it resolves at the end of the next tick.
    pub fn submit(&mut self, request: ActionRequest) {
        trace!(
            caster = %request.caster,
            target = %request.target,
            skill = %request.skill,
            combo = request.combo,
            "action submitted"
        );
        self.engine.submit(request);
    }

    /// Applies an effect outside of any action (scripted events, items).
    pub fn apply_effect(
        &mut self,
        target: BattlerId,
        effect: EffectId,
        source: BattlerId,
        duration: Option<EffectDuration>,
    ) -> Result<ApplyOutcome> {
        let env = CombatEnv::new(
            &self.content.skills,
            &self.content.effects,
            &self.rng,
            &self.content.config,
        );
        let (outcome, diagnostics) = self
            .engine
            .apply_effect(env, target, effect, source, duration)?;

        let tick = self.engine.current_tick();
        let events = diagnostics
            .into_iter()
            .map(CombatEvent::Diagnostic)
            .chain(std::iter::once(CombatEvent::EffectApplied {
                battler: target,
                effect,
                outcome,
            }));
        for event in events {
            self.dispatch(tick, event);
        }
        Ok(outcome)
    }

    /// Explicitly removes an effect, including ones that never expire.
    pub fn remove_effect(&mut self, target: BattlerId, effect: EffectId) -> bool {
        let removed = self.engine.remove_effect(target, effect).is_some();
        if removed {
            let tick = self.engine.current_tick();
            self.dispatch(
                tick,
                CombatEvent::EffectRemoved {
                    battler: target,
                    effect,
                    expired: false,
                },
            );
        }
        removed
    }

    /// Runs one simulation tick and publishes everything it produced.
    pub fn tick(&mut self) -> TickReport {
        let env = CombatEnv::new(
            &self.content.skills,
            &self.content.effects,
            &self.rng,
            &self.content.config,
        );
        let report = self.engine.tick(env);

        for event in &report.events {
            self.dispatch(report.tick, event.clone());
        }
        report
    }

    /// Runs `ticks` ticks, returning the reports that contained events.
    pub fn run(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks)
            .map(|_| self.tick())
            .filter(|report| !report.is_empty())
            .collect()
    }

    /// Encodes the complete engine state (roster, queue, tick, nonce, seed).
    pub fn save_state(&self) -> Result<Vec<u8>> {
        bincode::serialize(&self.engine).map_err(RuntimeError::SaveState)
    }

    /// Replaces the engine with a previously saved one.
    ///
    /// Content, telemetry and subscribers are kept; the restored encounter
    /// continues with the same seed and nonce it was saved with.
    pub fn restore_state(&mut self, bytes: &[u8]) -> Result<()> {
        let engine: CombatEngine = bincode::deserialize(bytes).map_err(RuntimeError::RestoreState)?;
        self.engine = engine;

        let tick = self.engine.current_tick();
        let battlers = self.engine.roster().len();
        info!(tick, battlers, "state restored");
        self.bus.publish(Event::StateRestored { tick, battlers });
        Ok(())
    }

    pub fn save_state_to(&self, path: &Path) -> Result<()> {
        let bytes = self.save_state()?;
        std::fs::write(path, bytes).map_err(|source| RuntimeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn restore_state_from(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|source| RuntimeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.restore_state(&bytes)
    }

    fn dispatch(&mut self, tick: Tick, event: CombatEvent) {
        log_event(tick, &event);
        self.telemetry.record(&event);
        self.bus.publish(Event::Combat { tick, event });
    }
}

fn log_event(tick: Tick, event: &CombatEvent) {
    match event {
        CombatEvent::ActionResolved(result) => debug!(
            tick,
            caster = %result.caster,
            target = %result.target,
            skill = %result.skill,
            combo = result.combo,
            applied = result.applied,
            critical = result.critical,
            absorbed = result.absorbed,
            "action resolved"
        ),
        CombatEvent::ActionRejected(rejection) if rejection.is_routine() => trace!(
            tick,
            caster = %rejection.request.caster,
            skill = %rejection.request.skill,
            "slot not ready"
        ),
        CombatEvent::ActionRejected(rejection) => warn!(
            tick,
            caster = %rejection.request.caster,
            skill = %rejection.request.skill,
            code = rejection.error_code(),
            error = %rejection.error,
            "action dropped"
        ),
        CombatEvent::EffectApplied {
            battler,
            effect,
            outcome,
        } => debug!(tick, battler = %battler, %effect, ?outcome, "effect applied"),
        CombatEvent::EffectRemoved {
            battler,
            effect,
            expired,
        } => debug!(tick, battler = %battler, %effect, expired, "effect removed"),
        CombatEvent::BattlerDefeated {
            battler,
            by,
            reward,
        } => info!(tick, battler = %battler, by = %by, ?reward, "battler defeated"),
        CombatEvent::BattlerRemoved { battler } => info!(tick, battler = %battler, "battler despawned"),
        CombatEvent::BattlerSuspended { battler, error } => error!(
            tick,
            battler = %battler,
            error = %error,
            "battler suspended for the rest of the encounter"
        ),
        CombatEvent::Diagnostic(diagnostic) => warn!(tick, error = %diagnostic, "content diagnostic"),
    }
}

/// Builder for [`Runtime`].
#[derive(Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: Option<ContentBundle>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the encounter seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Provide already loaded content instead of reading `content_dir`
    pub fn content(mut self, content: ContentBundle) -> Self {
        self.content = Some(content);
        self
    }

    pub fn build(self) -> Result<Runtime> {
        let Self { config, content } = self;

        let mut content = match (content, config.content_dir.as_deref()) {
            (Some(content), _) => content,
            (None, Some(dir)) => ContentBundle::load_dir(dir).map_err(RuntimeError::Content)?,
            (None, None) => ContentBundle::embedded().map_err(RuntimeError::Content)?,
        };
        if let Some(combat) = &config.combat {
            content.config = combat.clone();
        }

        let content_issues = content.validate();
        for issue in &content_issues {
            warn!(%issue, "content inconsistency");
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        info!(
            seed,
            skills = content.skills.len(),
            effects = content.effects.len(),
            "runtime ready"
        );

        Ok(Runtime {
            engine: CombatEngine::new(seed),
            bus: EventBus::with_capacity(config.event_capacity),
            config,
            content,
            content_issues,
            rng: PcgRng,
            telemetry: Telemetry::new(),
        })
    }
}
