//! Time-boxed status effects attached to wizards.

use std::fmt;

use wizard_duel_core::{AilmentId, AilmentRemoval, Cooldowns, MovementTuning, WizardId};

/// Movement and casting attributes that ailments are allowed to modify.
#[derive(Clone, Debug, PartialEq)]
pub struct Attributes {
    /// Top horizontal speed reachable through acceleration.
    pub max_vel_x: f32,
    /// Gravity applied while falling.
    pub normal_gravity: f32,
    /// Gravity applied during a held jump.
    pub jump_gravity: f32,
    /// Multiplier applied to requested horizontal velocities.
    pub accel_modifier: f32,
    /// Multiplier applied to jump strength and held-jump boosts.
    pub jump_modifier: f32,
    /// Ticks removed from every cooldown each step.
    pub cooldown_decay: u32,
}

impl Attributes {
    /// Baseline attributes derived from the shared tuning.
    #[must_use]
    pub fn from_tuning(tuning: &MovementTuning) -> Self {
        Self {
            max_vel_x: tuning.max_vel_x,
            normal_gravity: tuning.normal_gravity,
            jump_gravity: tuning.jump_gravity,
            accel_modifier: 1.0,
            jump_modifier: 1.0,
            cooldown_decay: 1,
        }
    }
}

/// State of the victim exposed to ailment hooks.
#[derive(Debug)]
pub struct AilmentContext<'a> {
    /// Wizard carrying the ailment.
    pub victim: WizardId,
    /// Wizard that inflicted the ailment.
    pub caster: WizardId,
    /// Attributes of the victim.
    pub attributes: &'a mut Attributes,
    /// Spell cooldowns of the victim.
    pub cooldowns: &'a mut Cooldowns,
    /// Baseline tuning the attributes were derived from.
    pub tuning: &'a MovementTuning,
}

/// Behaviour of a concrete ailment.
///
/// Hooks default to doing nothing. `remove` consumes the hooks, so it runs at
/// most once per ailment.
pub trait AilmentHooks: fmt::Debug {
    /// Short name reported in events and snapshots.
    fn name(&self) -> &'static str;

    /// Runs once when the ailment attaches.
    fn initialize(&mut self, _context: &mut AilmentContext<'_>) {}

    /// Runs once per step while the ailment is attached and the victim lives.
    fn tick(&mut self, _context: &mut AilmentContext<'_>) {}

    /// Runs once when the ailment detaches, whatever the reason.
    fn remove(self: Box<Self>, _context: &mut AilmentContext<'_>, _reason: AilmentRemoval) {}
}

/// Ailment attached to a wizard, owned by that wizard.
#[derive(Debug)]
pub(crate) struct Ailment {
    id: AilmentId,
    caster: WizardId,
    remaining: u32,
    hooks: Box<dyn AilmentHooks>,
}

impl Ailment {
    /// Attaches `hooks` for `duration` ticks, running the initialize hook.
    pub(crate) fn attach(
        id: AilmentId,
        duration: u32,
        mut hooks: Box<dyn AilmentHooks>,
        context: &mut AilmentContext<'_>,
    ) -> Self {
        hooks.initialize(context);
        Self {
            id,
            caster: context.caster,
            remaining: duration,
            hooks,
        }
    }

    pub(crate) fn id(&self) -> AilmentId {
        self.id
    }

    pub(crate) fn caster(&self) -> WizardId {
        self.caster
    }

    pub(crate) fn name(&self) -> &'static str {
        self.hooks.name()
    }

    /// Runs the tick hook and counts down. Returns `true` once the duration
    /// has run out.
    pub(crate) fn tick(&mut self, context: &mut AilmentContext<'_>) -> bool {
        self.hooks.tick(context);
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    /// Detaches the ailment, running the remove hook.
    pub(crate) fn detach(self, context: &mut AilmentContext<'_>, reason: AilmentRemoval) -> AilmentId {
        self.hooks.remove(context, reason);
        self.id
    }
}
