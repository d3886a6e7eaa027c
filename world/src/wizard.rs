//! Wizard movement engine.
//!
//! A wizard is moved once per tick by [`Wizard::step`]: the horizontal axis is
//! resolved first, then the vertical one, each through the shared
//! [`CollisionBox`] against the tick's [`SolidField`]. Contact flags written
//! during resolution drive jumping, wall sliding, gravity and friction.

use tracing::{debug, trace};
use wizard_duel_core::{
    ActorState, AilmentId, AilmentRemoval, Axis, Coord, Cooldowns, Event, FacingDirection,
    HorizontalFacing, JumpKind, Loadout, MovementTuning, Rect, VerticalFacing, WallSide, WizardId,
    WizardSnapshot,
};

use crate::{
    ailment::{Ailment, AilmentContext, AilmentHooks, Attributes},
    collision::{Body, CollisionBox, ContactListener, SolidField},
};

/// Distance used to check whether a wizard is still pressed against a wall.
const WALL_PROBE: f32 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Contacts {
    ground: bool,
    left_wall: bool,
    right_wall: bool,
}

struct HorizontalContact<'a> {
    contacts: &'a mut Contacts,
    adjacent: bool,
}

impl ContactListener for HorizontalContact<'_> {
    fn on_collision(&mut self) {
        self.adjacent = true;
    }

    fn on_left(&mut self) {
        self.contacts.left_wall = true;
    }

    fn on_right(&mut self) {
        self.contacts.right_wall = true;
    }
}

#[derive(Default)]
struct VerticalContact {
    landed: bool,
}

impl ContactListener for VerticalContact {
    fn on_bottom(&mut self) {
        self.landed = true;
    }
}

/// Authoritative state of a single wizard.
#[derive(Debug)]
pub(crate) struct Wizard {
    id: WizardId,
    body: Body,
    enviro_velocity: Coord,
    gravity: f32,
    attributes: Attributes,
    collision_box: CollisionBox,
    contacts: Contacts,
    attached_wall: Option<WallSide>,
    boosted: bool,
    wall_hang_override: bool,
    wall_jump_grace: u32,
    grace_wall: WallSide,
    dynamic_jump_timer: u32,
    facing: HorizontalFacing,
    aim: Option<VerticalFacing>,
    death_timer: Option<u32>,
    kills: i32,
    deaths: u32,
    loadout: Loadout,
    cooldowns: Cooldowns,
    ailments: Vec<Ailment>,
}

impl Wizard {
    pub(crate) fn new(
        id: WizardId,
        position: Coord,
        facing: HorizontalFacing,
        loadout: Loadout,
        tuning: &MovementTuning,
    ) -> Self {
        let attributes = Attributes::from_tuning(tuning);
        Self {
            id,
            body: Body {
                position,
                velocity: Coord::ZERO,
            },
            enviro_velocity: Coord::ZERO,
            gravity: attributes.normal_gravity,
            attributes,
            collision_box: CollisionBox::new(tuning.half_extents, tuning.contact_epsilon),
            contacts: Contacts::default(),
            attached_wall: None,
            boosted: false,
            wall_hang_override: false,
            wall_jump_grace: 0,
            grace_wall: WallSide::Left,
            dynamic_jump_timer: 0,
            facing,
            aim: None,
            death_timer: None,
            kills: 0,
            deaths: 0,
            loadout,
            cooldowns: Cooldowns::new(),
            ailments: Vec::new(),
        }
    }

    pub(crate) fn id(&self) -> WizardId {
        self.id
    }

    pub(crate) fn position(&self) -> Coord {
        self.body.position
    }

    /// Unit vector spells are aimed along: the vertical aim when set,
    /// otherwise the horizontal facing.
    pub(crate) fn spell_direction(&self) -> Coord {
        self.aim.map_or_else(|| self.facing.unit(), VerticalFacing::unit)
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.death_timer.is_some()
    }

    pub(crate) fn bounds(&self) -> Rect {
        self.collision_box.rect_at(self.body.position)
    }

    pub(crate) fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub(crate) fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub(crate) fn cooldowns_mut(&mut self) -> &mut Cooldowns {
        &mut self.cooldowns
    }

    pub(crate) fn credit_kill(&mut self) {
        self.kills += 1;
    }

    pub(crate) fn debit_kill(&mut self) {
        self.kills -= 1;
    }

    /// Movement state derived from the contact flags of the last step.
    pub(crate) fn state(&self) -> ActorState {
        if self.is_dead() {
            ActorState::Dead
        } else if self.contacts.ground {
            ActorState::Grounded
        } else if let Some(side) = self.attached_wall {
            ActorState::WallAttached(side)
        } else {
            ActorState::Airborne
        }
    }

    pub(crate) fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            id: self.id,
            position: self.body.position,
            velocity: self.body.velocity,
            facing: self.facing,
            aim: self.aim,
            state: self.state(),
            bounds: self.bounds(),
            kills: self.kills,
            deaths: self.deaths,
            cooldowns: self.cooldowns,
            ailments: self.ailments.iter().map(Ailment::name).collect(),
        }
    }

    /// Advances the wizard by one tick.
    pub(crate) fn step(
        &mut self,
        field: &SolidField,
        tuning: &MovementTuning,
        out_events: &mut Vec<Event>,
    ) {
        self.advance_motion(field, tuning, out_events);
        self.tick_ailments(tuning, out_events);
        self.cooldowns.decay(self.attributes.cooldown_decay);
    }

    fn advance_motion(
        &mut self,
        field: &SolidField,
        tuning: &MovementTuning,
        out_events: &mut Vec<Event>,
    ) {
        self.contacts.ground = false;
        self.wall_jump_grace = self.wall_jump_grace.saturating_sub(1);
        self.dynamic_jump_timer = self.dynamic_jump_timer.saturating_sub(1);
        let extra = std::mem::take(&mut self.enviro_velocity);

        let delta_x = self.body.velocity.x + extra.x;
        let mut horizontal = HorizontalContact {
            contacts: &mut self.contacts,
            adjacent: false,
        };
        let _ = self.collision_box.move_axis(
            &mut self.body,
            Axis::Horizontal,
            delta_x,
            field,
            &mut horizontal,
        );

        if horizontal.adjacent && !self.wall_hang_override && self.pressed_against_any(field) {
            self.body.velocity.y = self.body.velocity.y.min(tuning.wall_slide_speed);
            self.boosted = false;
        }

        let delta_y = self.body.velocity.y + extra.y;
        let mut vertical = VerticalContact::default();
        let _ = self.collision_box.move_axis(
            &mut self.body,
            Axis::Vertical,
            delta_y,
            field,
            &mut vertical,
        );
        if vertical.landed {
            self.touch_ground(delta_y, tuning, out_events);
        }

        if !self.contacts.ground {
            if self.body.velocity.y < tuning.terminal_velocity {
                self.body.velocity.y += self.gravity;
            }
        } else {
            self.body.velocity.x *= tuning.friction_x;
        }
        self.gravity = self.attributes.normal_gravity;

        self.attached_wall = if self.pressed_against(WallSide::Left, field) {
            Some(WallSide::Left)
        } else if self.pressed_against(WallSide::Right, field) {
            Some(WallSide::Right)
        } else {
            None
        };
    }

    fn touch_ground(&mut self, impact: f32, tuning: &MovementTuning, out_events: &mut Vec<Event>) {
        if impact > tuning.hard_landing_speed {
            out_events.push(Event::WizardLanded {
                wizard: self.id,
                impact,
            });
        }
        self.contacts.ground = true;
        self.boosted = false;
    }

    fn pressed_against(&self, side: WallSide, field: &SolidField) -> bool {
        let (flag, offset) = match side {
            WallSide::Left => (self.contacts.left_wall, -WALL_PROBE),
            WallSide::Right => (self.contacts.right_wall, WALL_PROBE),
        };
        flag && field.is_blocked(
            &self.bounds().translated(Coord::new(offset, 0.0)),
            Axis::Horizontal,
        )
    }

    fn pressed_against_any(&self, field: &SolidField) -> bool {
        self.pressed_against(WallSide::Left, field) || self.pressed_against(WallSide::Right, field)
    }

    /// Attempts a ground or wall jump. Returns the kind of jump performed.
    pub(crate) fn jump(
        &mut self,
        strength: f32,
        field: &SolidField,
        tuning: &MovementTuning,
    ) -> Option<JumpKind> {
        if self.is_dead() {
            return None;
        }

        let strength = strength * self.attributes.jump_modifier;
        self.dynamic_jump_timer = tuning.jump_time;

        if self.contacts.ground {
            self.body.velocity.y = strength;
            return Some(JumpKind::Ground);
        }

        let wall = if self.pressed_against(WallSide::Left, field) {
            Some(WallSide::Left)
        } else if self.pressed_against(WallSide::Right, field) {
            Some(WallSide::Right)
        } else if self.wall_jump_grace > 0 {
            Some(self.grace_wall)
        } else {
            None
        };

        let Some(side) = wall else {
            self.dynamic_jump_timer = 0;
            trace!(wizard = self.id.get(), "jump ignored while airborne");
            return None;
        };

        self.body.velocity.y = strength;
        self.wall_jump_grace = 0;
        match side {
            WallSide::Left => {
                self.body.velocity.x = tuning.wall_jump_x;
                self.contacts.left_wall = false;
                self.face(FacingDirection::Right, tuning);
            }
            WallSide::Right => {
                self.body.velocity.x = -tuning.wall_jump_x;
                self.contacts.right_wall = false;
                self.face(FacingDirection::Left, tuning);
            }
        }
        Some(JumpKind::Wall(side))
    }

    /// Extends a jump while the input stays held.
    pub(crate) fn hold_jump(&mut self, tuning: &MovementTuning) {
        if self.is_dead() {
            return;
        }

        if self.body.velocity.y < -tuning.jump_gravity_speed || self.dynamic_jump_timer > 0 {
            self.gravity = self.attributes.jump_gravity;
        }
        if self.dynamic_jump_timer > 0 {
            let remaining = self.dynamic_jump_timer as f32 / tuning.jump_time as f32;
            self.body.velocity.y += tuning.jump_boost * remaining * self.attributes.jump_modifier;
        }
    }

    /// Steers horizontal velocity toward `target`, limited by the
    /// acceleration cap.
    pub(crate) fn accel_x(&mut self, target: f32, tuning: &MovementTuning) {
        if self.is_dead() {
            return;
        }

        let mut cap = self.attributes.max_vel_x / tuning.accel_time;
        if !self.contacts.ground {
            cap *= tuning.air_control;
        }
        let diff = target * self.attributes.accel_modifier - self.body.velocity.x;
        self.body.velocity.x += diff.clamp(-cap, cap);
    }

    pub(crate) fn face(&mut self, direction: FacingDirection, tuning: &MovementTuning) {
        if self.is_dead() {
            return;
        }

        match direction {
            FacingDirection::Left => {
                if self.contacts.right_wall {
                    self.leave_wall(WallSide::Right, tuning);
                }
                self.facing = HorizontalFacing::Left;
            }
            FacingDirection::Right => {
                if self.contacts.left_wall {
                    self.leave_wall(WallSide::Left, tuning);
                }
                self.facing = HorizontalFacing::Right;
            }
            FacingDirection::Up => self.aim = Some(VerticalFacing::Up),
            FacingDirection::Down => self.aim = Some(VerticalFacing::Down),
            FacingDirection::Level => self.aim = None,
        }
    }

    fn leave_wall(&mut self, side: WallSide, tuning: &MovementTuning) {
        match side {
            WallSide::Left => self.contacts.left_wall = false,
            WallSide::Right => self.contacts.right_wall = false,
        }
        self.wall_jump_grace = tuning.wall_jump_grace;
        self.grace_wall = side;
    }

    /// Adds `impulse` to the velocity unless momentum was already applied
    /// since the last ground or wall contact.
    pub(crate) fn apply_momentum(&mut self, impulse: Coord) -> bool {
        if self.is_dead() || self.boosted {
            return false;
        }
        self.boosted = true;
        self.body.velocity += impulse;
        true
    }

    /// Queues a displacement folded into the next step only.
    pub(crate) fn push(&mut self, impulse: Coord) {
        if self.is_dead() {
            return;
        }
        self.enviro_velocity += impulse;
    }

    pub(crate) fn set_wall_hang_override(&mut self, enabled: bool) {
        self.wall_hang_override = enabled;
    }

    /// Attaches an ailment, running its initialize hook.
    pub(crate) fn afflict(
        &mut self,
        id: AilmentId,
        caster: WizardId,
        duration: u32,
        hooks: Box<dyn AilmentHooks>,
        tuning: &MovementTuning,
        out_events: &mut Vec<Event>,
    ) {
        let mut context = AilmentContext {
            victim: self.id,
            caster,
            attributes: &mut self.attributes,
            cooldowns: &mut self.cooldowns,
            tuning,
        };
        let ailment = Ailment::attach(id, duration, hooks, &mut context);
        debug!(
            victim = self.id.get(),
            caster = caster.get(),
            ailment = ailment.name(),
            duration,
            "ailment attached"
        );
        out_events.push(Event::AilmentApplied {
            victim: self.id,
            ailment: id,
            name: ailment.name(),
        });
        self.ailments.push(ailment);
    }

    /// Ticks every attached ailment, detaching the ones that expired or whose
    /// victim is dead.
    pub(crate) fn tick_ailments(&mut self, tuning: &MovementTuning, out_events: &mut Vec<Event>) {
        let dead = self.is_dead();
        let mut index = 0;
        while index < self.ailments.len() {
            let mut context = AilmentContext {
                victim: self.id,
                caster: self.ailments[index].caster(),
                attributes: &mut self.attributes,
                cooldowns: &mut self.cooldowns,
                tuning,
            };
            let removal = if dead {
                Some(AilmentRemoval::VictimDied)
            } else if self.ailments[index].tick(&mut context) {
                Some(AilmentRemoval::Expired)
            } else {
                None
            };

            match removal {
                Some(reason) => {
                    let ailment = self.ailments.remove(index);
                    let id = ailment.detach(&mut context, reason);
                    debug!(victim = self.id.get(), ailment = id.get(), ?reason, "ailment removed");
                    out_events.push(Event::AilmentRemoved {
                        victim: self.id,
                        ailment: id,
                        reason,
                    });
                }
                None => index += 1,
            }
        }
    }

    /// Detaches a single ailment ahead of its expiry.
    pub(crate) fn cancel_ailment(
        &mut self,
        ailment: AilmentId,
        tuning: &MovementTuning,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(index) = self.ailments.iter().position(|held| held.id() == ailment) else {
            return false;
        };
        let held = self.ailments.remove(index);
        self.detach(held, AilmentRemoval::Cancelled, tuning, out_events);
        true
    }

    fn detach(
        &mut self,
        ailment: Ailment,
        reason: AilmentRemoval,
        tuning: &MovementTuning,
        out_events: &mut Vec<Event>,
    ) {
        let mut context = AilmentContext {
            victim: self.id,
            caster: ailment.caster(),
            attributes: &mut self.attributes,
            cooldowns: &mut self.cooldowns,
            tuning,
        };
        let id = ailment.detach(&mut context, reason);
        debug!(victim = self.id.get(), ailment = id.get(), ?reason, "ailment removed");
        out_events.push(Event::AilmentRemoved {
            victim: self.id,
            ailment: id,
            reason,
        });
    }

    /// Marks the wizard dead for `respawn_ticks` ticks. Returns `false` when
    /// the wizard was already dead.
    pub(crate) fn die(
        &mut self,
        respawn_ticks: u32,
        tuning: &MovementTuning,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if self.is_dead() {
            return false;
        }
        self.death_timer = Some(respawn_ticks.max(1));
        self.deaths += 1;

        let attached = std::mem::take(&mut self.ailments);
        for ailment in attached.into_iter().rev() {
            self.detach(ailment, AilmentRemoval::VictimDied, tuning, out_events);
        }
        true
    }

    /// Counts down the respawn timer. Returns `true` on the tick the wizard
    /// is due to revive.
    pub(crate) fn tick_death_timer(&mut self) -> bool {
        let Some(remaining) = self.death_timer else {
            return false;
        };
        let remaining = remaining.saturating_sub(1);
        self.death_timer = Some(remaining);
        remaining == 0
    }

    /// Brings a dead wizard back at `position` with a clean slate.
    pub(crate) fn revive(&mut self, position: Coord, out_events: &mut Vec<Event>) {
        self.death_timer = None;
        self.body = Body {
            position,
            velocity: Coord::ZERO,
        };
        self.enviro_velocity = Coord::ZERO;
        self.gravity = self.attributes.normal_gravity;
        self.contacts = Contacts::default();
        self.attached_wall = None;
        self.boosted = false;
        self.wall_jump_grace = 0;
        self.dynamic_jump_timer = 0;
        self.aim = None;
        self.cooldowns.reset();
        debug!(wizard = self.id.get(), x = position.x, y = position.y, "wizard revived");
        out_events.push(Event::WizardRevived {
            wizard: self.id,
            position,
        });
    }
}

#[cfg(test)]
mod tests {
    use wizard_duel_core::{QuadTreeConfig, SolidId};

    use super::*;
    use crate::collision::Solid;

    const FLOOR_TOP: f32 = 200.0;

    fn arena() -> SolidField {
        let solids = [
            Rect::new(0.0, FLOOR_TOP, 400.0, 40.0),
            Rect::new(0.0, 0.0, 20.0, FLOOR_TOP),
            Rect::new(380.0, 0.0, 20.0, FLOOR_TOP),
        ];
        let solids: Vec<Solid> = solids
            .iter()
            .enumerate()
            .map(|(index, rect)| Solid {
                id: SolidId::new(index as u32),
                rect: *rect,
            })
            .collect();
        SolidField::build(
            Rect::new(0.0, 0.0, 400.0, 240.0),
            QuadTreeConfig::default(),
            &solids,
        )
    }

    fn wizard_at(position: Coord) -> Wizard {
        Wizard::new(
            WizardId::new(0),
            position,
            HorizontalFacing::Right,
            [None; wizard_duel_core::SPELL_SLOTS],
            &MovementTuning::default(),
        )
    }

    fn settle(wizard: &mut Wizard, field: &SolidField, tuning: &MovementTuning) {
        let mut events = Vec::new();
        for _ in 0..200 {
            wizard.step(field, tuning, &mut events);
        }
    }

    #[test]
    fn falling_wizard_comes_to_rest_on_the_floor() {
        let field = arena();
        let tuning = MovementTuning::default();
        let mut wizard = wizard_at(Coord::new(200.0, 100.0));

        settle(&mut wizard, &field, &tuning);

        assert_eq!(wizard.state(), ActorState::Grounded);
        assert_eq!(wizard.position().y, FLOOR_TOP - 12.0);
    }

    #[test]
    fn gravity_stops_adding_past_terminal_velocity() {
        let tuning = MovementTuning::default();
        let field = SolidField::build(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            QuadTreeConfig::default(),
            &[],
        );
        let mut wizard = wizard_at(Coord::new(50.0, 0.0));
        wizard.body.velocity.y = 6.95;
        let mut events = Vec::new();

        wizard.step(&field, &tuning, &mut events);
        assert!((wizard.body.velocity.y - 7.13).abs() < 1e-4);

        wizard.step(&field, &tuning, &mut events);
        assert!((wizard.body.velocity.y - 7.13).abs() < 1e-4);
    }

    #[test]
    fn ground_jump_sets_vertical_velocity_and_arms_timer() {
        let field = arena();
        let tuning = MovementTuning::default();
        let mut wizard = wizard_at(Coord::new(200.0, 150.0));
        settle(&mut wizard, &field, &tuning);

        assert_eq!(wizard.jump(-3.0, &field, &tuning), Some(JumpKind::Ground));
        assert!((wizard.body.velocity.y + 3.0).abs() < f32::EPSILON);
        assert_eq!(wizard.dynamic_jump_timer, tuning.jump_time);
    }

    #[test]
    fn airborne_jump_without_wall_is_ignored() {
        let field = arena();
        let tuning = MovementTuning::default();
        let mut wizard = wizard_at(Coord::new(200.0, 100.0));
        let mut events = Vec::new();
        wizard.step(&field, &tuning, &mut events);
        let velocity = wizard.body.velocity;

        assert_eq!(wizard.jump(-3.0, &field, &tuning), None);
        assert_eq!(wizard.body.velocity, velocity);
        assert_eq!(wizard.dynamic_jump_timer, 0);
    }

    #[test]
    fn acceleration_is_capped_and_weaker_in_the_air() {
        let field = arena();
        let tuning = MovementTuning::default();
        let mut wizard = wizard_at(Coord::new(200.0, 150.0));
        settle(&mut wizard, &field, &tuning);

        wizard.accel_x(10.0, &tuning);
        assert!((wizard.body.velocity.x - 4.0 / 6.0).abs() < 1e-5);

        let mut airborne = wizard_at(Coord::new(200.0, 50.0));
        airborne.accel_x(-10.0, &tuning);
        assert!((airborne.body.velocity.x + 4.0 / 6.0 * 0.65).abs() < 1e-5);
    }

    #[test]
    fn wall_contact_allows_a_wall_jump_away_from_it() {
        let field = arena();
        let tuning = MovementTuning::default();
        let mut wizard = wizard_at(Coord::new(34.0, 100.0));
        wizard.body.velocity.x = -4.0;
        let mut events = Vec::new();
        wizard.step(&field, &tuning, &mut events);
        assert_eq!(wizard.state(), ActorState::WallAttached(WallSide::Left));

        assert_eq!(
            wizard.jump(-3.0, &field, &tuning),
            Some(JumpKind::Wall(WallSide::Left))
        );
        assert!((wizard.body.velocity.x - tuning.wall_jump_x).abs() < f32::EPSILON);
        assert_eq!(wizard.facing, HorizontalFacing::Right);
        assert!(!wizard.contacts.left_wall);
    }

    #[test]
    fn turning_away_from_a_wall_opens_the_grace_window() {
        let field = arena();
        let tuning = MovementTuning::default();
        let mut wizard = wizard_at(Coord::new(366.0, 100.0));
        wizard.body.velocity.x = 4.0;
        let mut events = Vec::new();
        wizard.step(&field, &tuning, &mut events);
        assert!(wizard.contacts.right_wall);

        wizard.face(FacingDirection::Left, &tuning);
        wizard.body.velocity.x = -1.0;
        wizard.step(&field, &tuning, &mut events);

        assert_eq!(
            wizard.jump(-3.0, &field, &tuning),
            Some(JumpKind::Wall(WallSide::Right))
        );
        assert!((wizard.body.velocity.x + tuning.wall_jump_x).abs() < f32::EPSILON);
    }

    #[test]
    fn spell_direction_prefers_vertical_aim() {
        let tuning = MovementTuning::default();
        let mut wizard = wizard_at(Coord::new(200.0, 100.0));
        assert_eq!(wizard.spell_direction(), Coord::new(1.0, 0.0));

        wizard.face(FacingDirection::Up, &tuning);
        assert_eq!(wizard.spell_direction(), Coord::new(0.0, -1.0));
        wizard.face(FacingDirection::Down, &tuning);
        assert_eq!(wizard.spell_direction(), Coord::new(0.0, 1.0));

        wizard.face(FacingDirection::Level, &tuning);
        wizard.face(FacingDirection::Left, &tuning);
        assert_eq!(wizard.spell_direction(), Coord::new(-1.0, 0.0));
    }

    #[test]
    fn resting_on_an_unevenly_placed_floor_stays_put() {
        let tuning = MovementTuning::default();
        let solids = [Solid {
            id: SolidId::new(0),
            rect: Rect::new(300.0, 254.73662, 200.0, 9.553655),
        }];
        let field = SolidField::build(
            Rect::new(0.0, 0.0, 1024.0, 576.0),
            QuadTreeConfig::default(),
            &solids,
        );
        let mut wizard = wizard_at(Coord::new(400.0, 214.73662));
        settle(&mut wizard, &field, &tuning);
        assert_eq!(wizard.state(), ActorState::Grounded);
        let rest = wizard.position();
        assert_eq!(rest.x, 400.0);

        let mut events = Vec::new();
        for _ in 0..60 {
            wizard.step(&field, &tuning, &mut events);
            assert_eq!(wizard.position(), rest);
            assert_eq!(wizard.state(), ActorState::Grounded);
        }
        assert!(!wizard.contacts.left_wall && !wizard.contacts.right_wall);
    }

    #[test]
    fn momentum_applies_once_per_airborne_stint() {
        let mut wizard = wizard_at(Coord::new(200.0, 100.0));
        assert!(wizard.apply_momentum(Coord::new(2.0, -1.0)));
        assert!(!wizard.apply_momentum(Coord::new(2.0, -1.0)));
        assert_eq!(wizard.body.velocity, Coord::new(2.0, -1.0));
    }

    #[test]
    fn dead_wizards_ignore_input() {
        let field = arena();
        let tuning = MovementTuning::default();
        let mut wizard = wizard_at(Coord::new(200.0, 100.0));
        let mut events = Vec::new();
        assert!(wizard.die(5, &tuning, &mut events));
        assert!(!wizard.die(5, &tuning, &mut events));

        assert_eq!(wizard.jump(-3.0, &field, &tuning), None);
        wizard.accel_x(4.0, &tuning);
        wizard.push(Coord::new(5.0, 0.0));
        assert!(!wizard.apply_momentum(Coord::new(1.0, 1.0)));
        assert_eq!(wizard.body.velocity, Coord::ZERO);
        assert_eq!(wizard.enviro_velocity, Coord::ZERO);
        assert_eq!(wizard.state(), ActorState::Dead);
        assert_eq!(wizard.deaths, 1);
    }

    #[test]
    fn death_timer_counts_down_to_revival() {
        let mut wizard = wizard_at(Coord::new(200.0, 100.0));
        let tuning = MovementTuning::default();
        let mut events = Vec::new();
        let _ = wizard.die(3, &tuning, &mut events);

        assert!(!wizard.tick_death_timer());
        assert!(!wizard.tick_death_timer());
        assert!(wizard.tick_death_timer());

        wizard.revive(Coord::new(60.0, 60.0), &mut events);
        assert!(!wizard.is_dead());
        assert_eq!(wizard.position(), Coord::new(60.0, 60.0));
        assert_eq!(
            events.last(),
            Some(&Event::WizardRevived {
                wizard: WizardId::new(0),
                position: Coord::new(60.0, 60.0),
            })
        );
    }
}
