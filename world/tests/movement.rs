use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wizard_duel_core::{
    ActorState, Command, Coord, Event, FacingDirection, HorizontalFacing, JumpKind, Rect,
    VerticalFacing, WallSide, WizardId, WizardSnapshot,
};
use wizard_duel_world::{self as world, query, World};

const FLOOR_TOP: f32 = 552.0;
const REST_Y: f32 = FLOOR_TOP - 12.0;

fn arena() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    for rect in [
        Rect::new(0.0, FLOOR_TOP, 1024.0, 24.0),
        Rect::new(0.0, 0.0, 24.0, FLOOR_TOP),
        Rect::new(1000.0, 0.0, 24.0, FLOOR_TOP),
    ] {
        world::apply(&mut world, Command::AddSolid { rect }, &mut events);
    }
    world
}

fn spawn(world: &mut World, position: Coord) -> WizardId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnWizard {
            position,
            facing: HorizontalFacing::Right,
            loadout: [None; 3],
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::WizardSpawned { wizard, .. }] => *wizard,
        other => panic!("unexpected events {other:?}"),
    }
}

fn tick(world: &mut World, count: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..count {
        world::apply(world, Command::Tick, &mut events);
    }
    events
}

fn send(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn snapshot(world: &World, wizard: WizardId) -> WizardSnapshot {
    query::wizard(world, wizard).expect("wizard exists")
}

#[test]
fn long_fall_ends_in_a_hard_landing() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(500.0, 100.0));

    let events = tick(&mut world, 200);

    let landing = events
        .iter()
        .find_map(|event| match event {
            Event::WizardLanded { wizard: landed, impact } if *landed == wizard => Some(*impact),
            _ => None,
        })
        .expect("hard landing reported");
    assert!(landing > 5.0);

    let state = snapshot(&world, wizard);
    assert_eq!(state.state, ActorState::Grounded);
    assert_eq!(state.position.y, REST_Y);
    assert!(state.velocity.y.abs() < 0.02);
}

#[test]
fn short_drop_lands_softly() {
    let mut world = arena();
    let _ = spawn(&mut world, Coord::new(500.0, REST_Y - 10.0));
    let events = tick(&mut world, 30);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::WizardLanded { .. })));
}

#[test]
fn ground_jump_leaves_the_floor() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(500.0, REST_Y));
    let _ = tick(&mut world, 2);

    let events = send(
        &mut world,
        Command::Jump {
            wizard,
            strength: -3.0,
        },
    );
    assert_eq!(
        events,
        vec![Event::WizardJumped {
            wizard,
            kind: JumpKind::Ground,
        }]
    );

    let _ = tick(&mut world, 1);
    let state = snapshot(&world, wizard);
    assert_eq!(state.state, ActorState::Airborne);
    assert!(state.position.y < REST_Y);
}

#[test]
fn holding_jump_reaches_higher() {
    let apex = |hold: bool| {
        let mut world = arena();
        let wizard = spawn(&mut world, Coord::new(500.0, REST_Y));
        let _ = tick(&mut world, 2);
        let _ = send(
            &mut world,
            Command::Jump {
                wizard,
                strength: -3.0,
            },
        );

        let mut highest = REST_Y;
        for _ in 0..60 {
            if hold {
                let _ = send(&mut world, Command::HoldJump { wizard });
            }
            let _ = tick(&mut world, 1);
            highest = highest.min(snapshot(&world, wizard).position.y);
        }
        highest
    };

    assert!(apex(true) < apex(false) - 10.0);
}

#[test]
fn wall_contact_clamps_fall_speed() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(36.0, 100.0));

    for _ in 0..40 {
        let _ = send(
            &mut world,
            Command::AccelX {
                wizard,
                target: -4.0,
            },
        );
        let _ = tick(&mut world, 1);
    }

    let state = snapshot(&world, wizard);
    assert_eq!(state.state, ActorState::WallAttached(WallSide::Left));
    assert!(state.velocity.y <= 1.0 + 0.18 + 1e-4);
    assert_eq!(state.position.x, 36.0);
}

#[test]
fn wall_hang_override_lets_the_wizard_fall() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(36.0, 100.0));
    let _ = send(
        &mut world,
        Command::SetWallHangOverride {
            wizard,
            enabled: true,
        },
    );

    for _ in 0..40 {
        let _ = send(
            &mut world,
            Command::AccelX {
                wizard,
                target: -4.0,
            },
        );
        let _ = tick(&mut world, 1);
    }

    assert!(snapshot(&world, wizard).velocity.y > 5.0);
}

#[test]
fn wall_jump_pushes_away_from_the_wall() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(36.0, 100.0));
    let _ = send(
        &mut world,
        Command::AccelX {
            wizard,
            target: -4.0,
        },
    );
    let _ = tick(&mut world, 1);

    let events = send(
        &mut world,
        Command::Jump {
            wizard,
            strength: -3.0,
        },
    );
    assert_eq!(
        events,
        vec![Event::WizardJumped {
            wizard,
            kind: JumpKind::Wall(WallSide::Left),
        }]
    );

    let state = snapshot(&world, wizard);
    assert_eq!(state.facing, HorizontalFacing::Right);
    assert!((state.velocity.x - 3.0).abs() < f32::EPSILON);
    assert!((state.velocity.y + 3.0).abs() < f32::EPSILON);
}

#[test]
fn push_displaces_for_a_single_tick() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(500.0, REST_Y));
    let _ = tick(&mut world, 2);

    let _ = send(
        &mut world,
        Command::Push {
            wizard,
            impulse: Coord::new(10.0, 0.0),
        },
    );
    let _ = tick(&mut world, 1);
    let pushed = snapshot(&world, wizard);
    assert_eq!(pushed.position.x, 510.0);
    assert_eq!(pushed.velocity.x, 0.0);

    let _ = tick(&mut world, 3);
    assert_eq!(snapshot(&world, wizard).position.x, 510.0);
}

#[test]
fn momentum_is_granted_once_until_landing() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(500.0, 200.0));

    for _ in 0..2 {
        let _ = send(
            &mut world,
            Command::ApplyMomentum {
                wizard,
                impulse: Coord::new(0.0, -4.0),
            },
        );
    }
    assert!((snapshot(&world, wizard).velocity.y + 4.0).abs() < f32::EPSILON);

    let _ = tick(&mut world, 300);
    assert_eq!(snapshot(&world, wizard).state, ActorState::Grounded);
    let _ = send(
        &mut world,
        Command::ApplyMomentum {
            wizard,
            impulse: Coord::new(2.0, 0.0),
        },
    );
    assert!(snapshot(&world, wizard).velocity.x > 1.9);
}

#[test]
fn friction_slows_a_grounded_wizard() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(500.0, REST_Y));
    let _ = tick(&mut world, 2);
    for _ in 0..10 {
        let _ = send(
            &mut world,
            Command::AccelX {
                wizard,
                target: 4.0,
            },
        );
        let _ = tick(&mut world, 1);
    }
    let moving = snapshot(&world, wizard).velocity.x;
    assert!(moving > 0.0);

    let _ = tick(&mut world, 1);
    let slowed = snapshot(&world, wizard).velocity.x;
    assert!((slowed - moving * 0.87).abs() < 1e-4);
}

#[test]
fn facing_tracks_vertical_aim() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(500.0, REST_Y));

    let _ = send(
        &mut world,
        Command::Face {
            wizard,
            direction: FacingDirection::Up,
        },
    );
    assert_eq!(snapshot(&world, wizard).aim, Some(VerticalFacing::Up));

    let _ = send(
        &mut world,
        Command::Face {
            wizard,
            direction: FacingDirection::Left,
        },
    );
    let _ = send(
        &mut world,
        Command::Face {
            wizard,
            direction: FacingDirection::Level,
        },
    );
    let state = snapshot(&world, wizard);
    assert_eq!(state.aim, None);
    assert_eq!(state.facing, HorizontalFacing::Left);
}

#[test]
fn dead_wizards_ignore_movement_input() {
    let mut world = arena();
    let wizard = spawn(&mut world, Coord::new(500.0, REST_Y));
    let _ = tick(&mut world, 2);
    let _ = send(
        &mut world,
        Command::Kill {
            victim: wizard,
            killer: wizard,
        },
    );
    let before = snapshot(&world, wizard);

    let events = send(
        &mut world,
        Command::Jump {
            wizard,
            strength: -3.0,
        },
    );
    assert!(events.is_empty());
    let _ = send(
        &mut world,
        Command::AccelX {
            wizard,
            target: 4.0,
        },
    );
    let _ = tick(&mut world, 5);

    let after = snapshot(&world, wizard);
    assert_eq!(after.state, ActorState::Dead);
    assert_eq!(after.position, before.position);
    assert_eq!(after.velocity, before.velocity);
}

fn assert_rests_on_platform(top: f32, thickness: f32) {
    let mut world = World::new();
    let _ = send(
        &mut world,
        Command::AddSolid {
            rect: Rect::new(300.0, top, 200.0, thickness),
        },
    );
    let wizard = spawn(&mut world, Coord::new(400.0, top - 40.0));
    let _ = tick(&mut world, 150);

    let rest = snapshot(&world, wizard);
    assert_eq!(rest.state, ActorState::Grounded, "platform at {top} x {thickness}");
    assert_eq!(rest.position.x, 400.0, "platform at {top} x {thickness}");
    assert!((rest.bounds.bottom() - top).abs() < 1e-3);

    for _ in 0..60 {
        let _ = tick(&mut world, 1);
        let now = snapshot(&world, wizard);
        assert_eq!(now.position, rest.position, "platform at {top} x {thickness}");
        assert_eq!(now.state, ActorState::Grounded, "platform at {top} x {thickness}");
    }
}

#[test]
fn resting_wizard_stays_on_an_unevenly_placed_platform() {
    assert_rests_on_platform(254.73662, 9.553655);
}

#[test]
fn resting_wizards_never_slide_off_platforms() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x91a7_f0e5);
    for _ in 0..200 {
        let top = rng.gen_range(100.0..500.0);
        let thickness = rng.gen_range(4.0..30.0);
        assert_rests_on_platform(top, thickness);
    }
}

#[test]
fn interactive_query_finds_living_wizards() {
    let mut world = arena();
    let near = spawn(&mut world, Coord::new(300.0, REST_Y));
    let far = spawn(&mut world, Coord::new(800.0, REST_Y));
    let dead = spawn(&mut world, Coord::new(320.0, REST_Y));
    let _ = send(
        &mut world,
        Command::Kill {
            victim: dead,
            killer: far,
        },
    );

    let found = query::interactive_near(&world, &Rect::new(250.0, 500.0, 100.0, 52.0));
    assert_eq!(found, vec![near]);

    let overlaps = query::solid_collisions(&world, &Rect::new(10.0, 540.0, 30.0, 30.0));
    assert_eq!(overlaps.len(), 2);
}
