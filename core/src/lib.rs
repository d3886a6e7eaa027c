#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wizard Duel engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that presentation
//! layers (audio, particles, scoreboards) consume without ever feeding back into
//! the tick that produced them.
//!
//! Geometry follows screen conventions: `x` grows to the right, `y` grows
//! downward and every [`Rect`] is anchored at its top-left corner.

use std::ops::{Add, AddAssign, Mul, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

mod config;

pub use config::{ArenaConfig, ConfigError, MovementTuning, QuadTreeConfig, SimulationConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Wizard Duel.";

/// Number of spell slots every wizard carries.
pub const SPELL_SLOTS: usize = 3;

/// Spells equipped by a wizard, indexed by slot.
pub type Loadout = [Option<SpellKind>; SPELL_SLOTS];

/// Two-dimensional vector used for positions, velocities and impulses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// Horizontal component, growing to the right.
    pub x: f32,
    /// Vertical component, growing downward.
    pub y: f32,
}

impl Coord {
    /// Vector with both components set to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a vector of the provided length pointing at `degrees`.
    ///
    /// Zero degrees points along +x; positive angles rotate toward +y, which is
    /// clockwise on screen.
    #[must_use]
    pub fn from_angle_deg(degrees: f32, length: f32) -> Self {
        let radians = degrees.to_radians();
        Self::new(radians.cos() * length, radians.sin() * length)
    }

    /// Multiplies both components by `factor`.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector with the same direction, or `None` for the zero vector.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let length = self.length();
        if length > f32::EPSILON {
            Some(self.scale(1.0 / length))
        } else {
            None
        }
    }

    /// Rotates the vector by `degrees`, keeping its length.
    #[must_use]
    pub fn rotated_deg(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Samples a point uniformly inside the axis-aligned box spanned by `self`
    /// and `other`.
    #[must_use]
    pub fn random_between<R: Rng + ?Sized>(self, other: Coord, rng: &mut R) -> Self {
        Self::new(
            lerp(self.x, other.x, rng.gen::<f32>()),
            lerp(self.y, other.y, rng.gen::<f32>()),
        )
    }

    /// Samples a vector of the provided length pointing in a random direction.
    #[must_use]
    pub fn random_direction<R: Rng + ?Sized>(length: f32, rng: &mut R) -> Self {
        Self::from_angle_deg(rng.gen_range(0.0..360.0), length)
    }

    /// Component of the vector along the provided axis.
    #[must_use]
    pub const fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Mutable access to the component along the provided axis.
    pub fn along_mut(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::Horizontal => &mut self.x,
            Axis::Vertical => &mut self.y,
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Add for Coord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Coord {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Coord {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

/// Simulation axis along which movement is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

/// Axis-aligned rectangle anchored at its top-left corner.
///
/// Width and height are never negative and every field is finite. Violations
/// are programming errors caught by debug assertions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite(),
            "rect fields must be finite: ({x}, {y}, {width}, {height})"
        );
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "rect size must not be negative: {width}x{height}"
        );
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle centred on `center` extending `half_extents` on
    /// each side.
    #[must_use]
    pub fn from_center(center: Coord, half_extents: Coord) -> Self {
        Self::new(
            center.x - half_extents.x,
            center.y - half_extents.y,
            half_extents.x * 2.0,
            half_extents.y * 2.0,
        )
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal size.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical size.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Geometric center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Coord {
        Coord::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half of the width and height.
    #[must_use]
    pub fn half_extents(&self) -> Coord {
        Coord::new(self.width / 2.0, self.height / 2.0)
    }

    /// Reports whether the closed rectangles share at least one point.
    ///
    /// Rectangles that merely share an edge touch. This is the candidate test
    /// used by spatial indexing.
    #[must_use]
    pub fn touches(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Reports whether the rectangles share a region of positive area.
    ///
    /// Boxes resting flush against each other do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Reports whether `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Splits the rectangle into four equal quadrants.
    ///
    /// Order: top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn quadrants(&self) -> [Rect; 4] {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        let mid_x = self.x + half_width;
        let mid_y = self.y + half_height;
        [
            Rect::new(self.x, self.y, half_width, half_height),
            Rect::new(mid_x, self.y, half_width, half_height),
            Rect::new(self.x, mid_y, half_width, half_height),
            Rect::new(mid_x, mid_y, half_width, half_height),
        ]
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Coord) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// Unique identifier assigned to a wizard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WizardId(u32);

impl WizardId {
    /// Creates a new wizard identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a solid piece of level geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SolidId(u32);

impl SolidId {
    /// Creates a new solid identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an ailment instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AilmentId(u32);

impl AilmentId {
    /// Creates a new ailment identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an active spell effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u32);

impl EffectId {
    /// Creates a new effect identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Horizontal direction a wizard faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalFacing {
    /// Facing toward decreasing x.
    Left,
    /// Facing toward increasing x.
    Right,
}

impl HorizontalFacing {
    /// Unit vector pointing in the facing direction.
    #[must_use]
    pub const fn unit(self) -> Coord {
        match self {
            Self::Left => Coord::new(-1.0, 0.0),
            Self::Right => Coord::new(1.0, 0.0),
        }
    }
}

/// Optional vertical aim layered over the horizontal facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalFacing {
    /// Aiming toward decreasing y.
    Up,
    /// Aiming toward increasing y.
    Down,
}

impl VerticalFacing {
    /// Unit vector pointing in the aimed direction.
    #[must_use]
    pub const fn unit(self) -> Coord {
        match self {
            Self::Up => Coord::new(0.0, -1.0),
            Self::Down => Coord::new(0.0, 1.0),
        }
    }
}

/// Facing request issued by an input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FacingDirection {
    /// Turn to face left.
    Left,
    /// Turn to face right.
    Right,
    /// Aim upward.
    Up,
    /// Aim downward.
    Down,
    /// Stop aiming vertically.
    Level,
}

/// Side of the wizard on which a wall sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallSide {
    /// Wall to the wizard's left.
    Left,
    /// Wall to the wizard's right.
    Right,
}

/// Movement state derived from a wizard's contact flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorState {
    /// Standing on solid ground.
    Grounded,
    /// Not touching ground or a wall.
    Airborne,
    /// Pressed against a wall while off the ground.
    WallAttached(WallSide),
    /// Waiting for the respawn timer to elapse.
    Dead,
}

/// How a successful jump left the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JumpKind {
    /// Jump off the ground.
    Ground,
    /// Jump off the wall on the given side.
    Wall(WallSide),
}

/// Spells that can be equipped in a loadout slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellKind {
    /// Self-applied frenzy that boosts speed and cooldown recovery.
    Berserk,
    /// Short-range shove that knocks nearby wizards away.
    ForcePush,
}

/// Broad category of an active spell effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpellClass {
    /// Continuous beam tethered to the caster.
    Ray,
    /// Close-range effect tethered to the caster.
    Melee,
    /// Free-flying projectile.
    Projectile,
}

impl SpellClass {
    /// Reports whether the effect ends as soon as its caster dies.
    #[must_use]
    pub const fn is_tethered(self) -> bool {
        matches!(self, Self::Ray | Self::Melee)
    }
}

/// Reason an ailment detached from its victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AilmentRemoval {
    /// The duration counter reached zero.
    Expired,
    /// The victim died while the ailment was attached.
    VictimDied,
    /// The ailment was cancelled explicitly.
    Cancelled,
}

/// Global and per-slot spell cooldowns measured in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldowns {
    global: u32,
    slots: [u32; SPELL_SLOTS],
}

impl Cooldowns {
    /// Creates cooldowns with every timer elapsed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            global: 0,
            slots: [0; SPELL_SLOTS],
        }
    }

    /// Ticks remaining on the global cooldown.
    #[must_use]
    pub const fn global(&self) -> u32 {
        self.global
    }

    /// Ticks remaining on the provided slot, if the slot exists.
    #[must_use]
    pub fn slot(&self, slot: usize) -> Option<u32> {
        self.slots.get(slot).copied()
    }

    /// Overwrites the global cooldown.
    pub fn set_global(&mut self, ticks: u32) {
        self.global = ticks;
    }

    /// Overwrites the cooldown of `slot`. Unknown slots are ignored.
    pub fn set_slot(&mut self, slot: usize, ticks: u32) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = ticks;
        }
    }

    /// Reports whether both the global cooldown and `slot` have elapsed.
    #[must_use]
    pub fn is_ready(&self, slot: usize) -> bool {
        self.global == 0 && self.slot(slot) == Some(0)
    }

    /// Decrements the global cooldown and every slot by `amount`, stopping at
    /// zero.
    pub fn decay(&mut self, amount: u32) {
        self.global = self.global.saturating_sub(amount);
        for entry in &mut self.slots {
            *entry = entry.saturating_sub(amount);
        }
    }

    /// Clears every timer.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the arena bounds used as the root of the spatial index.
    ConfigureArena {
        /// Region covered by the arena.
        bounds: Rect,
    },
    /// Adds a solid piece of level geometry.
    AddSolid {
        /// Region occupied by the solid.
        rect: Rect,
    },
    /// Registers a location where wizards respawn.
    AddSpawnPoint {
        /// Center position of a respawning wizard.
        position: Coord,
    },
    /// Creates a new wizard.
    SpawnWizard {
        /// Initial center position.
        position: Coord,
        /// Initial horizontal facing.
        facing: HorizontalFacing,
        /// Spells equipped in each slot.
        loadout: Loadout,
    },
    /// Advances the simulation by one tick.
    Tick,
    /// Requests a jump with the provided (negative is upward) strength.
    Jump {
        /// Wizard attempting to jump.
        wizard: WizardId,
        /// Vertical velocity imparted by the jump.
        strength: f32,
    },
    /// Reports that the jump input is still held this tick.
    HoldJump {
        /// Wizard holding the jump input.
        wizard: WizardId,
    },
    /// Steers horizontal velocity toward `target`.
    AccelX {
        /// Wizard being steered.
        wizard: WizardId,
        /// Desired horizontal velocity.
        target: f32,
    },
    /// Turns or aims a wizard.
    Face {
        /// Wizard changing direction.
        wizard: WizardId,
        /// Requested direction.
        direction: FacingDirection,
    },
    /// Casts the spell equipped in `slot`.
    CastSpell {
        /// Casting wizard.
        wizard: WizardId,
        /// Loadout slot to cast from.
        slot: usize,
    },
    /// Adds momentum once per airborne stint.
    ApplyMomentum {
        /// Wizard receiving the momentum.
        wizard: WizardId,
        /// Velocity added to the wizard.
        impulse: Coord,
    },
    /// Queues a one-tick environmental impulse.
    Push {
        /// Wizard being pushed.
        wizard: WizardId,
        /// Displacement folded into the next movement step.
        impulse: Coord,
    },
    /// Kills `victim`, crediting `killer`.
    Kill {
        /// Wizard that dies.
        victim: WizardId,
        /// Wizard credited with the kill.
        killer: WizardId,
    },
    /// Detaches an ailment before it expires.
    CancelAilment {
        /// Wizard carrying the ailment.
        wizard: WizardId,
        /// Ailment to detach.
        ailment: AilmentId,
    },
    /// Disables or re-enables the wall-slide speed clamp.
    SetWallHangOverride {
        /// Wizard being configured.
        wizard: WizardId,
        /// Whether wall sliding is suppressed.
        enabled: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The arena bounds changed.
    ArenaConfigured {
        /// New arena bounds.
        bounds: Rect,
    },
    /// A solid was added to the level.
    SolidAdded {
        /// Identifier assigned to the solid.
        solid: SolidId,
        /// Region occupied by the solid.
        rect: Rect,
    },
    /// A wizard entered the arena.
    WizardSpawned {
        /// Identifier assigned to the wizard.
        wizard: WizardId,
        /// Initial center position.
        position: Coord,
    },
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// A wizard left the ground or a wall.
    WizardJumped {
        /// Jumping wizard.
        wizard: WizardId,
        /// Surface the jump started from.
        kind: JumpKind,
    },
    /// A wizard hit the ground faster than the hard-landing threshold.
    WizardLanded {
        /// Landing wizard.
        wizard: WizardId,
        /// Downward speed at the moment of contact.
        impact: f32,
    },
    /// A wizard died.
    WizardKilled {
        /// Wizard that died.
        victim: WizardId,
        /// Wizard credited with the kill.
        killer: WizardId,
    },
    /// A dead wizard returned to the arena.
    WizardRevived {
        /// Revived wizard.
        wizard: WizardId,
        /// Respawn position.
        position: Coord,
    },
    /// A spell was cast successfully.
    SpellCast {
        /// Casting wizard.
        wizard: WizardId,
        /// Slot the spell was cast from.
        slot: usize,
        /// Spell that was cast.
        spell: SpellKind,
    },
    /// An ailment attached to a wizard.
    AilmentApplied {
        /// Wizard carrying the ailment.
        victim: WizardId,
        /// Identifier assigned to the ailment.
        ailment: AilmentId,
        /// Human-readable name reported by the ailment hooks.
        name: &'static str,
    },
    /// An ailment detached from a wizard.
    AilmentRemoved {
        /// Wizard that carried the ailment.
        victim: WizardId,
        /// Identifier of the detached ailment.
        ailment: AilmentId,
        /// Why the ailment detached.
        reason: AilmentRemoval,
    },
    /// A spell effect became active.
    EffectStarted {
        /// Identifier assigned to the effect.
        effect: EffectId,
        /// Wizard that cast the effect.
        caster: WizardId,
        /// Category of the effect.
        class: SpellClass,
    },
    /// A spell effect ended.
    EffectEnded {
        /// Identifier of the effect.
        effect: EffectId,
    },
}

/// Immutable representation of a single wizard used by render and UI layers.
#[derive(Clone, Debug, PartialEq)]
pub struct WizardSnapshot {
    /// Unique identifier assigned to the wizard.
    pub id: WizardId,
    /// Center position.
    pub position: Coord,
    /// Current velocity.
    pub velocity: Coord,
    /// Horizontal facing.
    pub facing: HorizontalFacing,
    /// Vertical aim, if any.
    pub aim: Option<VerticalFacing>,
    /// Movement state derived from contact flags.
    pub state: ActorState,
    /// Region occupied by the wizard's collision box.
    pub bounds: Rect,
    /// Kill tally.
    pub kills: i32,
    /// Death tally.
    pub deaths: u32,
    /// Remaining spell cooldowns.
    pub cooldowns: Cooldowns,
    /// Names of the ailments currently attached, oldest first.
    pub ailments: Vec<&'static str>,
}

/// Read-only snapshot describing all wizards within the arena.
#[derive(Clone, Debug, Default)]
pub struct WizardView {
    snapshots: Vec<WizardSnapshot>,
}

impl WizardView {
    /// Creates a new wizard view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<WizardSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &WizardSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific wizard.
    #[must_use]
    pub fn get(&self, id: WizardId) -> Option<&WizardSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<WizardSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an active spell effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectSnapshot {
    /// Identifier assigned to the effect.
    pub id: EffectId,
    /// Wizard that cast the effect.
    pub caster: WizardId,
    /// Category of the effect.
    pub class: SpellClass,
    /// Ticks left before the effect ends on its own.
    pub remaining: u32,
}
