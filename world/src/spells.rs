//! Spell casting and the bundled spell scripts.

use tracing::{debug, trace};
use wizard_duel_core::{
    AilmentRemoval, Coord, EffectId, EffectSnapshot, Event, Rect, SpellClass, SpellKind, WizardId,
};

use crate::{
    ailment::{AilmentContext, AilmentHooks, Attributes},
    query, wizard_mut, World,
};

const BERSERK_DURATION: u32 = 360;
const BERSERK_SLOT_COOLDOWN: u32 = 360;
const BERSERK_MAX_VEL_X: f32 = 8.0;
const BERSERK_NORMAL_GRAVITY: f32 = 0.19;
const BERSERK_JUMP_GRAVITY: f32 = 0.05;
const BERSERK_COOLDOWN_DECAY: u32 = 3;
const BERSERK_EXHAUSTION_GLOBAL: u32 = 360;
const BERSERK_EXHAUSTION_SLOT: u32 = 420;

const FORCE_PUSH_TICKS: u32 = 12;
const FORCE_PUSH_RADIUS: f32 = 64.0;
const FORCE_PUSH_STRENGTH: f32 = 6.0;
const FORCE_PUSH_GLOBAL_COOLDOWN: u32 = 20;
const FORCE_PUSH_SLOT_COOLDOWN: u32 = 90;

/// Spell effect that is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ActiveEffect {
    id: EffectId,
    caster: WizardId,
    class: SpellClass,
    remaining: u32,
}

impl ActiveEffect {
    pub(crate) fn new(id: EffectId, caster: WizardId, class: SpellClass, duration: u32) -> Self {
        Self {
            id,
            caster,
            class,
            remaining: duration,
        }
    }

    pub(crate) fn id(&self) -> EffectId {
        self.id
    }

    /// Reports whether the effect must end because `wizard` died.
    pub(crate) fn is_tethered_to(&self, wizard: WizardId) -> bool {
        self.caster == wizard && self.class.is_tethered()
    }

    /// Counts down one tick. Returns `true` once the effect has run out.
    pub(crate) fn age(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub(crate) fn snapshot(&self) -> EffectSnapshot {
        EffectSnapshot {
            id: self.id,
            caster: self.caster,
            class: self.class,
            remaining: self.remaining,
        }
    }
}

/// Frenzy that raises top speed and speeds up cooldown recovery, paid for
/// with long cooldowns once it wears off.
#[derive(Debug)]
pub(crate) struct Berserk {
    slot: usize,
}

impl AilmentHooks for Berserk {
    fn name(&self) -> &'static str {
        "berserk"
    }

    fn initialize(&mut self, context: &mut AilmentContext<'_>) {
        context.attributes.max_vel_x = BERSERK_MAX_VEL_X;
        context.attributes.normal_gravity = BERSERK_NORMAL_GRAVITY;
        context.attributes.jump_gravity = BERSERK_JUMP_GRAVITY;
        context.attributes.cooldown_decay = BERSERK_COOLDOWN_DECAY;
    }

    fn remove(self: Box<Self>, context: &mut AilmentContext<'_>, _reason: AilmentRemoval) {
        *context.attributes = Attributes::from_tuning(context.tuning);
        context.cooldowns.set_global(BERSERK_EXHAUSTION_GLOBAL);
        context.cooldowns.set_slot(self.slot, BERSERK_EXHAUSTION_SLOT);
    }
}

/// Casts the spell equipped in `slot` if the wizard is alive and off
/// cooldown.
pub(crate) fn cast(world: &mut World, wizard: WizardId, slot: usize, out_events: &mut Vec<Event>) {
    let Some(caster) = wizard_mut(&mut world.wizards, wizard) else {
        return;
    };
    if caster.is_dead() {
        trace!(wizard = wizard.get(), slot, "dead wizard cannot cast");
        return;
    }
    let Some(spell) = caster.loadout().get(slot).copied().flatten() else {
        trace!(wizard = wizard.get(), slot, "no spell equipped");
        return;
    };
    if !caster.cooldowns().is_ready(slot) {
        trace!(wizard = wizard.get(), slot, "spell on cooldown");
        return;
    }

    out_events.push(Event::SpellCast {
        wizard,
        slot,
        spell,
    });
    match spell {
        SpellKind::Berserk => cast_berserk(world, wizard, slot, out_events),
        SpellKind::ForcePush => cast_force_push(world, wizard, slot, out_events),
    }
}

fn cast_berserk(world: &mut World, wizard: WizardId, slot: usize, out_events: &mut Vec<Event>) {
    let ailment = world.allocate_ailment();
    let tuning = &world.config.movement;
    let Some(caster) = wizard_mut(&mut world.wizards, wizard) else {
        return;
    };

    caster.afflict(
        ailment,
        wizard,
        BERSERK_DURATION,
        Box::new(Berserk { slot }),
        tuning,
        out_events,
    );
    let cooldowns = caster.cooldowns_mut();
    cooldowns.set_global(0);
    cooldowns.set_slot(slot, BERSERK_SLOT_COOLDOWN);
}

fn cast_force_push(world: &mut World, wizard: WizardId, slot: usize, out_events: &mut Vec<Event>) {
    let Some(caster) = wizard_mut(&mut world.wizards, wizard) else {
        return;
    };
    let origin = caster.position();
    let fallback = caster.spell_direction();
    let cooldowns = caster.cooldowns_mut();
    cooldowns.set_global(FORCE_PUSH_GLOBAL_COOLDOWN);
    cooldowns.set_slot(slot, FORCE_PUSH_SLOT_COOLDOWN);

    let _ = world.start_effect(wizard, SpellClass::Melee, FORCE_PUSH_TICKS, out_events);

    let reach = Rect::from_center(origin, Coord::new(FORCE_PUSH_RADIUS, FORCE_PUSH_RADIUS));
    for target in query::interactive_near(world, &reach) {
        if target == wizard {
            continue;
        }
        let Some(victim) = wizard_mut(&mut world.wizards, target) else {
            continue;
        };
        let offset = victim.position() - origin;
        if offset.length() > FORCE_PUSH_RADIUS {
            continue;
        }
        let direction = offset.normalized().unwrap_or(fallback);
        if victim.apply_momentum(direction * FORCE_PUSH_STRENGTH) {
            debug!(caster = wizard.get(), target = target.get(), "force push connected");
        }
    }
}
