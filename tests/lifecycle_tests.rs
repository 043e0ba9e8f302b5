//! Headless integration tests for the craft lifecycle and level transitions.
//!
//! These tests use [`MinimalPlugins`] — no window, no rendering, no physics
//! stepping — so they run fast and deterministically in CI. Contacts are
//! injected as domain messages, exactly as the classification stage produces
//! them from raw collision events.
//!
//! Covered scenarios:
//! 1. A hazard contact kills the craft and, after the load delay, restarts
//!    the run from the first level with a fresh, alive craft.
//! 2. A goal contact on the last level wraps back to level 0, not past the
//!    end of the catalog.
//! 3. A goal contact mid-catalog advances to the next level.
//! 4. The load delay actually holds the transition back.
//! 5. The collision-gate toggle grants invulnerability and hands it back.
//! 6. A terminal contact fires its outcome exactly once.

use ascent::config::FlightConfig;
use ascent::craft::{
    lifecycle_system, CollisionGate, ControlIntent, Craft, CraftState, LifecycleOutcome,
    SurfaceContact, SurfaceKind,
};
use ascent::level::{
    initial_level_spawn, level_transition_system, reload_level_system, CurrentLevel, LevelCatalog,
    LevelReload, PendingTransition,
};
use bevy::prelude::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app running the lifecycle and transition systems
/// over a real spawned level, starting at `start_level`.
fn build_flight_app(start_level: usize) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_message::<SurfaceContact>();
    app.add_message::<LifecycleOutcome>();
    app.add_message::<LevelReload>();
    app.insert_resource(ControlIntent::default());
    app.insert_resource(CollisionGate::default());
    app.insert_resource(FlightConfig::default());
    app.insert_resource(LevelCatalog::compiled_default());
    app.insert_resource(CurrentLevel(start_level));
    app.add_systems(Startup, initial_level_spawn);
    app.add_systems(
        Update,
        (lifecycle_system, level_transition_system, reload_level_system).chain(),
    );
    app.update(); // run Startup so the level content exists
    app
}

fn send_contact(app: &mut App, kind: SurfaceKind) {
    app.world_mut().write_message(SurfaceContact {
        kind,
        at: Vec2::ZERO,
    });
}

fn craft_state(app: &mut App) -> CraftState {
    let mut q = app.world_mut().query_filtered::<&CraftState, With<Craft>>();
    *q.single(app.world()).unwrap()
}

fn craft_count(app: &mut App) -> usize {
    let mut q = app.world_mut().query_filtered::<(), With<Craft>>();
    q.iter(app.world()).count()
}

fn current_level(app: &App) -> usize {
    app.world().resource::<CurrentLevel>().0
}

/// Collapse the pending transition's delay so the next update fires it.
fn expire_transition_delay(app: &mut App) {
    let mut pending = app.world_mut().resource_mut::<PendingTransition>();
    pending.timer = Timer::from_seconds(0.0, TimerMode::Once);
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn hazard_restarts_from_first_level_with_fresh_craft() {
    let mut app = build_flight_app(1);

    send_contact(&mut app, SurfaceKind::Hazard);
    app.update();
    assert_eq!(craft_state(&mut app), CraftState::Dying);
    assert_eq!(current_level(&app), 1, "level holds during the delay");

    expire_transition_delay(&mut app);
    app.update();

    assert_eq!(current_level(&app), 0, "failure restarts from the first level");
    assert!(
        app.world().get_resource::<PendingTransition>().is_none(),
        "the scheduled callback fires exactly once"
    );
    assert_eq!(craft_count(&mut app), 1, "exactly one craft after reload");
    assert_eq!(
        craft_state(&mut app),
        CraftState::Alive,
        "the respawned craft starts a fresh lifecycle"
    );
}

#[test]
fn goal_on_last_level_wraps_to_first() {
    let len = LevelCatalog::compiled_default().len();
    let mut app = build_flight_app(len - 1);

    send_contact(&mut app, SurfaceKind::GoalPad);
    app.update();
    assert_eq!(craft_state(&mut app), CraftState::Transcending);

    expire_transition_delay(&mut app);
    app.update();

    assert_eq!(
        current_level(&app),
        0,
        "finishing the last level requests index 0, not {len}"
    );
}

#[test]
fn goal_mid_catalog_advances_to_next_level() {
    let mut app = build_flight_app(0);

    send_contact(&mut app, SurfaceKind::GoalPad);
    app.update();

    expire_transition_delay(&mut app);
    app.update();

    assert_eq!(current_level(&app), 1);
    assert_eq!(craft_state(&mut app), CraftState::Alive);
}

#[test]
fn load_delay_holds_the_transition() {
    let mut app = build_flight_app(2);

    send_contact(&mut app, SurfaceKind::Hazard);
    // Several frames well inside the default 2-second delay.
    for _ in 0..5 {
        app.update();
    }

    assert_eq!(current_level(&app), 2);
    assert!(app.world().get_resource::<PendingTransition>().is_some());
    assert_eq!(craft_state(&mut app), CraftState::Dying);
}

#[test]
fn collision_gate_grants_and_revokes_invulnerability() {
    let mut app = build_flight_app(0);

    app.world_mut().resource_mut::<CollisionGate>().enabled = false;
    send_contact(&mut app, SurfaceKind::Hazard);
    app.update();
    assert_eq!(
        craft_state(&mut app),
        CraftState::Alive,
        "contacts must not change state while the gate is disabled"
    );

    app.world_mut().resource_mut::<CollisionGate>().enabled = true;
    send_contact(&mut app, SurfaceKind::Hazard);
    app.update();
    assert_eq!(craft_state(&mut app), CraftState::Dying);
}

#[test]
fn terminal_contact_fires_outcome_exactly_once() {
    let mut app = build_flight_app(0);

    send_contact(&mut app, SurfaceKind::Hazard);
    send_contact(&mut app, SurfaceKind::Hazard);
    app.update();

    assert_eq!(
        app.world().resource::<Messages<LifecycleOutcome>>().len(),
        1,
        "one terminal sequence per craft lifetime"
    );
}
