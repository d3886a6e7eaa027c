//! Computer-controlled sparring partners and the referee that declares kills.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use wizard_duel_core::{
    ActorState, Command, Coord, Event, FacingDirection, Rect, SpellKind, WizardId, WizardSnapshot,
};
use wizard_duel_world::{query, World};

/// Hits a wizard absorbs before the referee declares it dead.
const VITALITY: u32 = 3;
/// Ticks during which a hard landing is blamed on the last attacker.
const BLAME_WINDOW: u64 = 90;
/// Distance between centers within which Force Push connects.
const PUSH_REACH: f32 = 64.0;
/// Height difference beyond which a bot jumps toward an opponent above it.
const CLIMB_GAP: f32 = 24.0;
const PUSH_SLOT: usize = 0;
const BERSERK_SLOT: usize = 1;

/// Issues movement and spell commands for every living wizard.
#[derive(Debug)]
pub(crate) struct Sparring {
    rng: ChaCha8Rng,
}

impl Sparring {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Appends this tick's intent for every living wizard to `out`.
    pub(crate) fn plan(&mut self, world: &World, out: &mut Vec<Command>) {
        let view = query::wizard_view(world);
        let tuning = &query::config(world).movement;
        let living: Vec<&WizardSnapshot> = view
            .iter()
            .filter(|wizard| wizard.state != ActorState::Dead)
            .collect();

        for me in living.iter().copied() {
            let Some(opponent) = nearest_opponent(me, &living) else {
                continue;
            };
            let offset = opponent.position - me.position;
            let (heading, direction) = if offset.x < 0.0 {
                (-1.0, FacingDirection::Left)
            } else {
                (1.0, FacingDirection::Right)
            };
            let throttle = if self.rng.gen_bool(0.2) { 0.0 } else { 1.0 };

            out.push(Command::AccelX {
                wizard: me.id,
                target: heading * tuning.max_vel_x * throttle,
            });
            out.push(Command::Face {
                wizard: me.id,
                direction,
            });

            let footing = matches!(me.state, ActorState::Grounded | ActorState::WallAttached(_));
            if footing && (offset.y < -CLIMB_GAP || self.rng.gen_bool(0.02)) {
                out.push(Command::Jump {
                    wizard: me.id,
                    strength: tuning.jump_strength,
                });
            } else if me.velocity.y < 0.0 {
                out.push(Command::HoldJump { wizard: me.id });
            }

            if offset.length() <= PUSH_REACH && me.cooldowns.is_ready(PUSH_SLOT) {
                out.push(Command::CastSpell {
                    wizard: me.id,
                    slot: PUSH_SLOT,
                });
            } else if me.cooldowns.is_ready(BERSERK_SLOT) && self.rng.gen_bool(0.005) {
                out.push(Command::CastSpell {
                    wizard: me.id,
                    slot: BERSERK_SLOT,
                });
            }
        }
    }
}

fn nearest_opponent<'a>(
    me: &WizardSnapshot,
    living: &[&'a WizardSnapshot],
) -> Option<&'a WizardSnapshot> {
    let distance = |other: &WizardSnapshot| (other.position - me.position).length();
    living
        .iter()
        .copied()
        .filter(|other| other.id != me.id)
        .min_by(|left, right| distance(left).total_cmp(&distance(right)))
}

#[derive(Clone, Copy, Debug)]
struct Blame {
    attacker: WizardId,
    tick: u64,
}

#[derive(Clone, Copy, Debug)]
struct Vitality {
    points: u32,
    blame: Option<Blame>,
}

impl Default for Vitality {
    fn default() -> Self {
        Self {
            points: VITALITY,
            blame: None,
        }
    }
}

/// Tracks wizard vitality and turns decisive hits into [`Command::Kill`].
#[derive(Debug, Default)]
pub(crate) struct Referee {
    vitality: BTreeMap<WizardId, Vitality>,
}

impl Referee {
    /// Inspects `events` produced by the latest command and appends any kills to `out`.
    pub(crate) fn judge(&mut self, world: &World, events: &[Event], out: &mut Vec<Command>) {
        let tick = query::tick_index(world);
        for event in events {
            match event {
                Event::WizardSpawned { wizard, .. } | Event::WizardRevived { wizard, .. } => {
                    let _ = self.vitality.insert(*wizard, Vitality::default());
                }
                Event::SpellCast {
                    wizard,
                    spell: SpellKind::ForcePush,
                    ..
                } => {
                    let blame = Blame {
                        attacker: *wizard,
                        tick,
                    };
                    for victim in pushed_by(world, *wizard) {
                        self.wound(victim, Some(blame), tick, out);
                    }
                }
                Event::WizardLanded { wizard, impact } => {
                    debug!(wizard = wizard.get(), impact, "hard landing");
                    self.wound(*wizard, None, tick, out);
                }
                _ => {}
            }
        }
    }

    fn wound(&mut self, victim: WizardId, blame: Option<Blame>, tick: u64, out: &mut Vec<Command>) {
        let Some(vitality) = self.vitality.get_mut(&victim) else {
            return;
        };
        if vitality.points == 0 {
            return;
        }
        if blame.is_some() {
            vitality.blame = blame;
        }
        vitality.points -= 1;
        if vitality.points > 0 {
            return;
        }

        let killer = vitality
            .blame
            .filter(|blame| tick.saturating_sub(blame.tick) <= BLAME_WINDOW)
            .map_or(victim, |blame| blame.attacker);
        debug!(victim = victim.get(), killer = killer.get(), "referee declared a kill");
        out.push(Command::Kill { victim, killer });
    }
}

fn pushed_by(world: &World, caster: WizardId) -> Vec<WizardId> {
    let Some(origin) = query::wizard(world, caster).map(|snapshot| snapshot.position) else {
        return Vec::new();
    };
    let reach = Rect::from_center(origin, Coord::new(PUSH_REACH, PUSH_REACH));
    query::interactive_near(world, &reach)
        .into_iter()
        .filter(|id| *id != caster)
        .filter(|id| {
            query::wizard(world, *id)
                .is_some_and(|victim| (victim.position - origin).length() <= PUSH_REACH)
        })
        .collect()
}
