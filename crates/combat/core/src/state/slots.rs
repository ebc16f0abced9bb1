//! Skill slot table.
//!
//! Each battler binds skills to named slots. A slot owns the skill's
//! [`Cooldown`] and, while a combo window is open, the id of the follow-up
//! skill recorded by the last base execution.
//!
//! Player battlers always expose the fixed [`SlotKey::PLAYER_SLOTS`] set,
//! bound or not. Enemy battlers get one slot per distinct known action,
//! created at spawn and keyed by the action's skill id.

use super::SkillId;
use super::cooldown::Cooldown;

/// Role of a binding slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SlotKey {
    Primary,
    Secondary,
    Utility,
    Evade,
    Tool,
    Special,
    /// Enemy slot derived from a known action.
    Action(SkillId),
}

impl SlotKey {
    /// Slots every player battler exposes, in HUD order.
    pub const PLAYER_SLOTS: [SlotKey; 6] = [
        SlotKey::Primary,
        SlotKey::Secondary,
        SlotKey::Utility,
        SlotKey::Evade,
        SlotKey::Tool,
        SlotKey::Special,
    ];
}

/// What a slot can execute right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotReadiness {
    /// The bound skill is off cooldown.
    Base,
    /// The combo window elapsed; the recorded follow-up may be executed.
    Combo(SkillId),
    NotReady,
}

/// Result of a [`SkillSlotTable::bind`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    /// The slot did not exist and was created with a cleared cooldown.
    Created,
    /// Skill or lock changed; the cooldown counts were kept.
    Rebound,
    /// Same skill and lock value: nothing touched.
    Unchanged,
}

/// A binding point holding one skill and its cooldown state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSlot {
    pub key: SlotKey,
    /// Bound skill; `None` for an empty slot.
    pub skill: Option<SkillId>,
    pub cooldown: Cooldown,
    /// Follow-up recorded by the last base execution. Only meaningful while
    /// the cooldown is in its combo state.
    pub combo_chain: Option<SkillId>,
}

impl SkillSlot {
    pub fn new(key: SlotKey) -> Self {
        Self {
            key,
            skill: None,
            cooldown: Cooldown::cleared(),
            combo_chain: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.skill.is_some()
    }

    pub fn readiness(&self) -> SlotReadiness {
        if self.skill.is_none() {
            return SlotReadiness::NotReady;
        }
        if self.cooldown.is_base_ready() {
            return SlotReadiness::Base;
        }
        match self.combo_chain {
            Some(follow_up) if self.cooldown.is_combo_ready() => SlotReadiness::Combo(follow_up),
            _ => SlotReadiness::NotReady,
        }
    }

    pub fn is_any_action_ready(&self) -> bool {
        !matches!(self.readiness(), SlotReadiness::NotReady)
    }

    pub fn advance(&mut self) {
        self.cooldown.advance();
        if self.cooldown.take_combo_clear() {
            self.combo_chain = None;
        }
    }

    /// Starts the cooldown after a base execution.
    ///
    /// `follow_up` carries the next combo skill and its window length.
    pub fn start_base(&mut self, cooldown: u32, follow_up: Option<(SkillId, u32)>) {
        if self.cooldown.is_base_ready() {
            self.combo_chain = None;
        }
        self.cooldown.set_base(cooldown);
        if let Some((next, window)) = follow_up {
            self.cooldown.set_combo(window);
            self.combo_chain = Some(next);
        }
    }

    /// Restarts the cooldown after a combo execution.
    ///
    /// The bound skill is kept; only the timers and the recorded follow-up
    /// change. A follow-up without its own continuation closes the chain.
    pub fn start_combo(&mut self, cooldown: u32, follow_up: Option<(SkillId, u32)>) {
        self.cooldown.set_base(cooldown);
        match follow_up {
            Some((next, window)) => {
                self.cooldown.set_combo(window);
                self.combo_chain = Some(next);
            }
            None => {
                self.cooldown.clear_combo();
                self.combo_chain = None;
            }
        }
    }
}

/// Ordered set of binding slots owned by one battler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSlotTable {
    slots: Vec<SkillSlot>,
}

impl SkillSlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed player layout, all slots unbound.
    pub fn player() -> Self {
        Self {
            slots: SlotKey::PLAYER_SLOTS.iter().map(|&k| SkillSlot::new(k)).collect(),
        }
    }

    /// One bound slot per distinct known action.
    pub fn enemy(actions: impl IntoIterator<Item = SkillId>) -> Self {
        let mut table = Self::new();
        for skill in actions {
            let key = SlotKey::Action(skill);
            if table.slot(key).is_none() {
                table.bind(key, skill, false);
            }
        }
        table
    }

    /// Binds `skill` to `key`.
    ///
    /// Rebinding with the same skill and lock value is a no-op. A new slot
    /// starts with a cleared cooldown; an existing slot keeps its counts.
    pub fn bind(&mut self, key: SlotKey, skill: SkillId, locked: bool) -> BindOutcome {
        let Some(slot) = self.slot_mut(key) else {
            let mut slot = SkillSlot::new(key);
            slot.skill = Some(skill);
            slot.cooldown.locked = locked;
            self.slots.push(slot);
            return BindOutcome::Created;
        };

        if slot.skill == Some(skill) && slot.cooldown.locked == locked {
            return BindOutcome::Unchanged;
        }
        if slot.skill != Some(skill) {
            slot.skill = Some(skill);
            slot.combo_chain = None;
        }
        slot.cooldown.locked = locked;
        BindOutcome::Rebound
    }

    /// Empties a slot, keeping the slot itself (player layouts are fixed).
    pub fn unbind(&mut self, key: SlotKey) -> Option<SkillId> {
        let slot = self.slot_mut(key)?;
        slot.combo_chain = None;
        slot.skill.take()
    }

    pub fn resolve_ready_slot(&self, key: SlotKey) -> SlotReadiness {
        self.slot(key)
            .map_or(SlotReadiness::NotReady, SkillSlot::readiness)
    }

    pub fn is_any_action_ready(&self, key: SlotKey) -> bool {
        self.slot(key).is_some_and(SkillSlot::is_any_action_ready)
    }

    /// Advances every bound slot by one tick; empty slots are skipped.
    pub fn advance_all(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.is_bound()) {
            slot.advance();
        }
    }

    /// Returns false if the key is unknown.
    pub fn lock(&mut self, key: SlotKey) -> bool {
        self.slot_mut(key).map(|s| s.cooldown.lock()).is_some()
    }

    pub fn unlock(&mut self, key: SlotKey) -> bool {
        self.slot_mut(key).map(|s| s.cooldown.unlock()).is_some()
    }

    pub fn slot(&self, key: SlotKey) -> Option<&SkillSlot> {
        self.slots.iter().find(|s| s.key == key)
    }

    pub fn slot_mut(&mut self, key: SlotKey) -> Option<&mut SkillSlot> {
        self.slots.iter_mut().find(|s| s.key == key)
    }

    /// Slot a request naming `skill` targets.
    ///
    /// Base requests prefer the slot with `skill` bound. Combo requests
    /// prefer the slot whose recorded follow-up is `skill`, then fall back
    /// to the bound one.
    pub fn slot_for(&self, skill: SkillId, combo: bool) -> Option<&SkillSlot> {
        let bound = self.slots.iter().find(|s| s.skill == Some(skill));
        let chained = self.slots.iter().find(|s| s.combo_chain == Some(skill));
        if combo { chained.or(bound) } else { bound.or(chained) }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
