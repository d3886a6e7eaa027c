#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Wizard Duel arena.

use wizard_duel_core::{Command, Coord, HorizontalFacing, Loadout, Rect, SpellKind};
use wizard_duel_world::{query, World};

/// Thickness of the floor, ceiling and side walls.
const WALL_THICKNESS: f32 = 24.0;
/// Thickness of floating platforms.
const PLATFORM_THICKNESS: f32 = 16.0;

/// Floating platforms as fractions of the arena: `(left, top, width)`.
const PLATFORMS: [(f32, f32, f32); 3] = [
    (0.15, 0.62, 0.22),
    (0.63, 0.62, 0.22),
    (0.39, 0.36, 0.22),
];

/// Loadout handed to every wizard spawned by the bootstrap.
pub const DEFAULT_LOADOUT: Loadout = [Some(SpellKind::ForcePush), Some(SpellKind::Berserk), None];

/// Produces the commands that set up a playable arena.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Emits the commands building the default arena inside `bounds`: a
    /// closed box of walls, three floating platforms and a spawn point above
    /// the floor and above each platform.
    pub fn arena_commands(&self, bounds: Rect, out: &mut Vec<Command>) {
        out.push(Command::ConfigureArena { bounds });

        let floor_top = bounds.bottom() - WALL_THICKNESS;
        let walls = [
            Rect::new(bounds.x(), floor_top, bounds.width(), WALL_THICKNESS),
            Rect::new(bounds.x(), bounds.y(), bounds.width(), WALL_THICKNESS),
            Rect::new(
                bounds.x(),
                bounds.y() + WALL_THICKNESS,
                WALL_THICKNESS,
                floor_top - bounds.y() - WALL_THICKNESS,
            ),
            Rect::new(
                bounds.right() - WALL_THICKNESS,
                bounds.y() + WALL_THICKNESS,
                WALL_THICKNESS,
                floor_top - bounds.y() - WALL_THICKNESS,
            ),
        ];
        out.extend(walls.into_iter().map(|rect| Command::AddSolid { rect }));

        for platform in platform_rects(bounds) {
            out.push(Command::AddSolid { rect: platform });
            out.push(Command::AddSpawnPoint {
                position: Coord::new(platform.center().x, platform.y() - WALL_THICKNESS),
            });
        }
        out.push(Command::AddSpawnPoint {
            position: Coord::new(bounds.center().x, floor_top - WALL_THICKNESS),
        });
    }

    /// Emits commands spawning `count` wizards spread evenly across the floor,
    /// facing the middle of the arena.
    pub fn spawn_commands(&self, bounds: Rect, count: usize, out: &mut Vec<Command>) {
        let floor_top = bounds.bottom() - WALL_THICKNESS;
        let lane = (bounds.width() - 2.0 * WALL_THICKNESS) / (count as f32 + 1.0);
        for index in 0..count {
            let x = bounds.x() + WALL_THICKNESS + lane * (index as f32 + 1.0);
            let facing = if x < bounds.center().x {
                HorizontalFacing::Right
            } else {
                HorizontalFacing::Left
            };
            out.push(Command::SpawnWizard {
                position: Coord::new(x, floor_top - WALL_THICKNESS),
                facing,
                loadout: DEFAULT_LOADOUT,
            });
        }
    }
}

fn platform_rects(bounds: Rect) -> impl Iterator<Item = Rect> {
    PLATFORMS.into_iter().map(move |(left, top, width)| {
        Rect::new(
            bounds.x() + bounds.width() * left,
            bounds.y() + bounds.height() * top,
            bounds.width() * width,
            PLATFORM_THICKNESS,
        )
    })
}

#[cfg(test)]
mod tests {
    use wizard_duel_core::{ActorState, Event, SimulationConfig};
    use wizard_duel_world::{self as world, World};

    use super::*;

    fn booted(wizards: usize) -> World {
        let bounds = SimulationConfig::default().arena.bounds;
        let bootstrap = Bootstrap;
        let mut commands = Vec::new();
        bootstrap.arena_commands(bounds, &mut commands);
        bootstrap.spawn_commands(bounds, wizards, &mut commands);

        let mut world = World::new();
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        world
    }

    #[test]
    fn banner_comes_from_the_world() {
        let world = World::new();
        assert_eq!(
            Bootstrap.welcome_banner(&world),
            wizard_duel_core::WELCOME_BANNER
        );
    }

    #[test]
    fn arena_is_enclosed_with_platforms_and_spawn_points() {
        let world = booted(0);
        assert_eq!(query::solids(&world).len(), 7);
        assert_eq!(query::spawn_points(&world).len(), 4);

        let bounds = query::arena_bounds(&world);
        for solid in query::solids(&world) {
            assert!(bounds.contains_rect(&solid.rect), "{solid:?} escapes arena");
        }
        for point in query::spawn_points(&world) {
            let probe = Rect::from_center(*point, Coord::new(12.0, 12.0));
            assert!(query::solid_collisions(&world, &probe).is_empty());
        }
    }

    #[test]
    fn spawned_wizards_settle_on_the_floor() {
        let mut world = booted(4);
        let mut events = Vec::new();
        for _ in 0..30 {
            world::apply(&mut world, Command::Tick, &mut events);
        }

        let view = query::wizard_view(&world);
        assert_eq!(view.iter().count(), 4);
        for wizard in view.iter() {
            assert_eq!(wizard.state, ActorState::Grounded);
            assert!(!events
                .iter()
                .any(|event| matches!(event, Event::WizardLanded { .. })));
        }
        let facings: Vec<HorizontalFacing> = view.iter().map(|wizard| wizard.facing).collect();
        assert_eq!(
            facings,
            vec![
                HorizontalFacing::Right,
                HorizontalFacing::Right,
                HorizontalFacing::Left,
                HorizontalFacing::Left
            ]
        );
    }
}
