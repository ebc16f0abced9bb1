use crate::env::EffectOracle;
use crate::error::CombatError;

use super::{BattlerId, CombatModifiers, SkillSlotTable, StatusLedger, TeamId};

/// Whether a battler is driven by a player or by AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattlerKind {
    Player,
    Enemy,
}

/// Pool a skill draws from or moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Hp,
    Mp,
}

/// Stat addressed by formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    MaxHp,
    MaxMp,
    Attack,
    Defense,
    Magic,
    MagicDefense,
    Agility,
    Luck,
}

/// Core numeric stats, already including equipment and difficulty layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatStats {
    pub max_hp: u32,
    pub max_mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub magic: u32,
    pub magic_defense: u32,
    pub agility: u32,
    pub luck: u32,
    /// Base critical chance in percent.
    pub critical_rate: i32,
}

impl CombatStats {
    pub fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::MaxHp => self.max_hp,
            StatKind::MaxMp => self.max_mp,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Magic => self.magic,
            StatKind::MagicDefense => self.magic_defense,
            StatKind::Agility => self.agility,
            StatKind::Luck => self.luck,
        }
    }

    pub fn max(&self, resource: ResourceKind) -> u32 {
        match resource {
            ResourceKind::Hp => self.max_hp,
            ResourceKind::Mp => self.max_mp,
        }
    }
}

/// A combat participant.
///
/// Owns its slot table and status ledger; other battlers only reach them
/// through the engine's apply/remove entry points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battler {
    pub id: BattlerId,
    pub team: TeamId,
    pub kind: BattlerKind,
    pub level: u32,
    pub stats: CombatStats,
    pub hp: u32,
    pub mp: u32,
    /// Innate elemental and critical profile.
    pub base_modifiers: CombatModifiers,
    /// One entry per equipped item.
    pub equipment: Vec<CombatModifiers>,
    pub slots: SkillSlotTable,
    pub statuses: StatusLedger,
    /// Base reward granted to whoever defeats this battler.
    pub reward: u32,
    pub defeated: bool,
    /// Ticks until removal from the encounter once defeated.
    pub despawn_in: Option<u32>,
    /// Set when an integrity check fails; the battler is skipped from then on.
    pub suspended: bool,
}

impl Battler {
    fn new(
        id: BattlerId,
        team: TeamId,
        kind: BattlerKind,
        level: u32,
        stats: CombatStats,
        slots: SkillSlotTable,
    ) -> Self {
        Self {
            id,
            team,
            kind,
            level,
            stats,
            hp: stats.max_hp,
            mp: stats.max_mp,
            base_modifiers: CombatModifiers::default(),
            equipment: Vec::new(),
            slots,
            statuses: StatusLedger::new(),
            reward: 0,
            defeated: false,
            despawn_in: None,
            suspended: false,
        }
    }

    /// Player battler with the fixed, unbound slot layout.
    pub fn player(id: BattlerId, team: TeamId, level: u32, stats: CombatStats) -> Self {
        Self::new(id, team, BattlerKind::Player, level, stats, SkillSlotTable::player())
    }

    /// Enemy battler with one slot per known action.
    pub fn enemy(
        id: BattlerId,
        team: TeamId,
        level: u32,
        stats: CombatStats,
        actions: impl IntoIterator<Item = super::SkillId>,
    ) -> Self {
        Self::new(
            id,
            team,
            BattlerKind::Enemy,
            level,
            stats,
            SkillSlotTable::enemy(actions),
        )
    }

    pub fn with_modifiers(mut self, modifiers: CombatModifiers) -> Self {
        self.base_modifiers = modifiers;
        self
    }

    pub fn with_equipment(mut self, item: CombatModifiers) -> Self {
        self.equipment.push(item);
        self
    }

    pub fn with_reward(mut self, reward: u32) -> Self {
        self.reward = reward;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.defeated && self.hp > 0
    }

    /// Alive, not suspended and free of incapacitating effects.
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.suspended && !self.statuses.prevents_action()
    }

    pub fn resource(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Hp => self.hp,
            ResourceKind::Mp => self.mp,
        }
    }

    /// Moves a pool by `delta`, clamped to `0..=max`. Returns the applied change.
    pub fn apply_delta(&mut self, kind: ResourceKind, delta: i64) -> i64 {
        let max = i64::from(self.stats.max(kind));
        let pool = match kind {
            ResourceKind::Hp => &mut self.hp,
            ResourceKind::Mp => &mut self.mp,
        };
        let before = i64::from(*pool);
        let after = (before + delta).clamp(0, max);
        *pool = after as u32;
        after - before
    }

    /// Every modifier source: base, equipment, then active effects.
    pub fn modifier_sources<'a>(&'a self, effects: &'a dyn EffectOracle) -> Vec<&'a CombatModifiers> {
        let mut sources = Vec::with_capacity(1 + self.equipment.len() + self.statuses.len());
        sources.push(&self.base_modifiers);
        sources.extend(self.equipment.iter());
        sources.extend(
            self.statuses
                .iter()
                .filter_map(|s| effects.effect(s.effect))
                .map(|def| &def.modifiers),
        );
        sources
    }

    /// Checks invariants a save-state edit or a bug could break.
    pub fn check_integrity(&self) -> Result<(), CombatError> {
        let corrupt = |reason| CombatError::CorruptState {
            battler: self.id,
            reason,
        };

        if self.kind == BattlerKind::Player && self.slots.is_empty() {
            return Err(corrupt("player battler has no skill slots"));
        }
        if self.slots.iter().any(|s| !s.cooldown.is_consistent()) {
            return Err(corrupt("cooldown flags disagree with remaining ticks"));
        }
        if self.hp > self.stats.max_hp || self.mp > self.stats.max_mp {
            return Err(corrupt("resource pool exceeds its maximum"));
        }
        if self
            .statuses
            .iter()
            .any(|s| s.stacks > s.max_stacks || (s.stacks == 0 && !s.category.prevents_action()))
        {
            return Err(corrupt("status stack count out of range"));
        }
        Ok(())
    }
}
