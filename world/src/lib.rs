#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Wizard Duel.
//!
//! Every mutation goes through [`apply`]. A [`Command::Tick`] rebuilds the
//! solid index, steps each wizard in identifier order and then ages the
//! active spell effects.

mod ailment;
mod collision;
mod quad_tree;
mod spells;
mod wizard;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};
use wizard_duel_core::{
    AilmentId, Command, Coord, EffectId, Event, Rect, SimulationConfig, SolidId, SpellClass,
    WizardId, WELCOME_BANNER,
};

pub use ailment::{AilmentContext, AilmentHooks, Attributes};
pub use collision::{Body, CollisionBox, ContactListener, Solid, SolidField};
pub use quad_tree::QuadTree;

use spells::ActiveEffect;
use wizard::Wizard;

/// Represents the authoritative Wizard Duel world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SimulationConfig,
    bounds: Rect,
    solids: Vec<Solid>,
    field: SolidField,
    spawn_points: Vec<Coord>,
    wizards: Vec<Wizard>,
    effects: Vec<ActiveEffect>,
    rng: ChaCha8Rng,
    tick_index: u64,
    next_wizard: u32,
    next_solid: u32,
    next_ailment: u32,
    next_effect: u32,
}

impl World {
    /// Creates an empty arena using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates an empty arena using the default configuration and `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(SimulationConfig {
            seed,
            ..SimulationConfig::default()
        })
    }

    /// Creates an empty arena governed by `config`.
    ///
    /// `config` must pass [`SimulationConfig::validate`]; an invalid one is a
    /// programming error caught by a debug assertion.
    #[must_use]
    pub fn with_config(config: SimulationConfig) -> Self {
        let validation = config.validate();
        debug_assert!(
            validation.is_ok(),
            "invalid simulation configuration: {validation:?}"
        );
        Self {
            banner: WELCOME_BANNER,
            bounds: config.arena.bounds,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            field: SolidField::build(config.arena.bounds, config.quad_tree, &[]),
            config,
            solids: Vec::new(),
            spawn_points: Vec::new(),
            wizards: Vec::new(),
            effects: Vec::new(),
            tick_index: 0,
            next_wizard: 0,
            next_solid: 0,
            next_ailment: 0,
            next_effect: 0,
        }
    }

    fn reindex_solids(&mut self) {
        self.field.rebuild(&self.solids);
    }

    fn allocate_ailment(&mut self) -> AilmentId {
        let id = AilmentId::new(self.next_ailment);
        self.next_ailment += 1;
        id
    }

    fn start_effect(
        &mut self,
        caster: WizardId,
        class: SpellClass,
        duration: u32,
        out_events: &mut Vec<Event>,
    ) -> EffectId {
        let effect = EffectId::new(self.next_effect);
        self.next_effect += 1;
        self.effects
            .push(ActiveEffect::new(effect, caster, class, duration));
        out_events.push(Event::EffectStarted {
            effect,
            caster,
            class,
        });
        effect
    }

    fn age_effects(&mut self, out_events: &mut Vec<Event>) {
        self.effects.retain_mut(|effect| {
            if effect.age() {
                debug!(effect = effect.id().get(), "effect expired");
                out_events.push(Event::EffectEnded {
                    effect: effect.id(),
                });
                false
            } else {
                true
            }
        });
    }

    fn end_tethered_effects(&mut self, caster: WizardId, out_events: &mut Vec<Event>) {
        self.effects.retain(|effect| {
            if effect.is_tethered_to(caster) {
                out_events.push(Event::EffectEnded {
                    effect: effect.id(),
                });
                false
            } else {
                true
            }
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena { bounds } => {
            world.bounds = bounds;
            world.field = SolidField::build(bounds, world.config.quad_tree, &world.solids);
            out_events.push(Event::ArenaConfigured { bounds });
        }
        Command::AddSolid { rect } => {
            let solid = SolidId::new(world.next_solid);
            world.next_solid += 1;
            world.solids.push(Solid { id: solid, rect });
            world.reindex_solids();
            out_events.push(Event::SolidAdded { solid, rect });
        }
        Command::AddSpawnPoint { position } => world.spawn_points.push(position),
        Command::SpawnWizard {
            position,
            facing,
            loadout,
        } => {
            let wizard = WizardId::new(world.next_wizard);
            world.next_wizard += 1;
            world.wizards.push(Wizard::new(
                wizard,
                position,
                facing,
                loadout,
                &world.config.movement,
            ));
            out_events.push(Event::WizardSpawned { wizard, position });
        }
        Command::Tick => advance(world, out_events),
        Command::Jump { wizard, strength } => {
            if let Some(actor) = wizard_mut(&mut world.wizards, wizard) {
                if let Some(kind) = actor.jump(strength, &world.field, &world.config.movement) {
                    out_events.push(Event::WizardJumped { wizard, kind });
                }
            }
        }
        Command::HoldJump { wizard } => {
            if let Some(actor) = wizard_mut(&mut world.wizards, wizard) {
                actor.hold_jump(&world.config.movement);
            }
        }
        Command::AccelX { wizard, target } => {
            if let Some(actor) = wizard_mut(&mut world.wizards, wizard) {
                actor.accel_x(target, &world.config.movement);
            }
        }
        Command::Face { wizard, direction } => {
            if let Some(actor) = wizard_mut(&mut world.wizards, wizard) {
                actor.face(direction, &world.config.movement);
            }
        }
        Command::CastSpell { wizard, slot } => spells::cast(world, wizard, slot, out_events),
        Command::ApplyMomentum { wizard, impulse } => {
            if let Some(actor) = wizard_mut(&mut world.wizards, wizard) {
                let _ = actor.apply_momentum(impulse);
            }
        }
        Command::Push { wizard, impulse } => {
            if let Some(actor) = wizard_mut(&mut world.wizards, wizard) {
                actor.push(impulse);
            }
        }
        Command::Kill { victim, killer } => kill(world, victim, killer, out_events),
        Command::CancelAilment { wizard, ailment } => {
            if let Some(actor) = wizard_mut(&mut world.wizards, wizard) {
                let _ = actor.cancel_ailment(ailment, &world.config.movement, out_events);
            }
        }
        Command::SetWallHangOverride { wizard, enabled } => {
            if let Some(actor) = wizard_mut(&mut world.wizards, wizard) {
                actor.set_wall_hang_override(enabled);
            }
        }
    }
}

/// Attaches an externally scripted ailment to `victim` for `duration` ticks.
///
/// Returns the identifier of the new ailment, or `None` when the victim does
/// not exist.
pub fn afflict(
    world: &mut World,
    victim: WizardId,
    caster: WizardId,
    duration: u32,
    hooks: Box<dyn AilmentHooks>,
    out_events: &mut Vec<Event>,
) -> Option<AilmentId> {
    if !world.wizards.iter().any(|wizard| wizard.id() == victim) {
        return None;
    }
    let ailment = world.allocate_ailment();
    let actor = wizard_mut(&mut world.wizards, victim)?;
    actor.afflict(
        ailment,
        caster,
        duration,
        hooks,
        &world.config.movement,
        out_events,
    );
    Some(ailment)
}

fn advance(world: &mut World, out_events: &mut Vec<Event>) {
    world.tick_index = world.tick_index.saturating_add(1);
    out_events.push(Event::TimeAdvanced {
        tick: world.tick_index,
    });

    world.reindex_solids();
    let field = &world.field;
    let tuning = &world.config.movement;
    for wizard in &mut world.wizards {
        if !wizard.is_dead() {
            wizard.step(field, tuning, out_events);
            continue;
        }

        wizard.tick_ailments(tuning, out_events);
        if wizard.tick_death_timer() {
            let position = pick_spawn_point(&mut world.rng, &world.spawn_points, world.bounds);
            wizard.revive(position, out_events);
        }
    }

    world.age_effects(out_events);
}

fn kill(world: &mut World, victim: WizardId, killer: WizardId, out_events: &mut Vec<Event>) {
    let tuning = &world.config.movement;
    let Some(actor) = wizard_mut(&mut world.wizards, victim) else {
        return;
    };
    if actor.is_dead() {
        trace!(victim = victim.get(), "kill ignored for dead wizard");
        return;
    }

    let spread = if tuning.respawn_spread_ticks > 0 {
        world.rng.gen_range(0..tuning.respawn_spread_ticks)
    } else {
        0
    };
    let respawn_ticks = tuning.respawn_min_ticks + spread;

    out_events.push(Event::WizardKilled { victim, killer });
    let _ = actor.die(respawn_ticks, tuning, out_events);
    if killer == victim {
        actor.debit_kill();
    } else if let Some(credited) = wizard_mut(&mut world.wizards, killer) {
        credited.credit_kill();
    }
    debug!(
        victim = victim.get(),
        killer = killer.get(),
        respawn_ticks,
        "wizard killed"
    );

    world.end_tethered_effects(victim, out_events);
}

fn pick_spawn_point(rng: &mut ChaCha8Rng, spawn_points: &[Coord], bounds: Rect) -> Coord {
    spawn_points
        .choose(rng)
        .copied()
        .unwrap_or_else(|| bounds.center())
}

pub(crate) fn wizard_mut(wizards: &mut [Wizard], id: WizardId) -> Option<&mut Wizard> {
    match wizards.binary_search_by_key(&id, Wizard::id) {
        Ok(index) => Some(&mut wizards[index]),
        Err(_) => {
            trace!(wizard = id.get(), "command addressed an unknown wizard");
            None
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use wizard_duel_core::{
        Coord, EffectSnapshot, Rect, SimulationConfig, WizardId, WizardSnapshot, WizardView,
    };

    use super::{QuadTree, Solid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Region covered by the root of the spatial index.
    #[must_use]
    pub fn arena_bounds(world: &World) -> Rect {
        world.bounds
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Solid level geometry in the order it was added.
    #[must_use]
    pub fn solids(world: &World) -> &[Solid] {
        &world.solids
    }

    /// Registered respawn locations.
    #[must_use]
    pub fn spawn_points(world: &World) -> &[Coord] {
        &world.spawn_points
    }

    /// Captures a read-only view of every wizard.
    #[must_use]
    pub fn wizard_view(world: &World) -> WizardView {
        WizardView::from_snapshots(world.wizards.iter().map(|wizard| wizard.snapshot()).collect())
    }

    /// Captures a single wizard, if it exists.
    #[must_use]
    pub fn wizard(world: &World, id: WizardId) -> Option<WizardSnapshot> {
        world
            .wizards
            .iter()
            .find(|wizard| wizard.id() == id)
            .map(|wizard| wizard.snapshot())
    }

    /// Active spell effects ordered by identifier.
    #[must_use]
    pub fn active_effects(world: &World) -> Vec<EffectSnapshot> {
        world.effects.iter().map(|effect| effect.snapshot()).collect()
    }

    /// Solids overlapping `rect` with positive area.
    #[must_use]
    pub fn solid_collisions(world: &World, rect: &Rect) -> Vec<Solid> {
        world.field.collisions(rect)
    }

    /// Living wizards whose collision boxes touch `rect`, ordered by
    /// identifier.
    #[must_use]
    pub fn interactive_near(world: &World, rect: &Rect) -> Vec<WizardId> {
        let mut index = QuadTree::new(world.bounds, world.config.quad_tree);
        for wizard in world.wizards.iter().filter(|wizard| !wizard.is_dead()) {
            index.insert(wizard.bounds(), wizard.id());
        }
        index.retrieve(rect)
    }
}
