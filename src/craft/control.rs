//! Craft input and steering systems.
//!
//! ## Pipeline (chained, runs in order every `Update` frame)
//!
//! 1. [`intent_clear_system`] — resets `ControlIntent` and `ExternalForce` to zero.
//! 2. [`keyboard_intent_system`] — translates held keys into `ControlIntent` fields.
//! 3. [`apply_intent_system`] — converts `ControlIntent` into force and rotation,
//!    only while the craft is `Alive`.
//!
//! The **input abstraction layer** (`ControlIntent`) makes flight logic fully
//! testable: tests populate the resource directly and run only
//! [`apply_intent_system`].
//!
//! Also contains [`debug_keys_system`], the development-build-only level-skip
//! and collision-gate controls.

use super::state::{CollisionGate, ControlIntent, Craft, CraftState, Steer};
use crate::config::FlightConfig;
use crate::level::{next_level_index, CurrentLevel, LevelCatalog, PendingTransition};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Step 1: Clear ─────────────────────────────────────────────────────────────

/// Clear `ExternalForce` and `ControlIntent` at the start of every frame.
///
/// Must run before any system that writes to `ControlIntent` or accumulates
/// forces. Running both resets here ensures a single ordered dependency.
pub fn intent_clear_system(
    mut q: Query<&mut ExternalForce, With<Craft>>,
    mut intent: ResMut<ControlIntent>,
) {
    if let Ok(mut force) = q.single_mut() {
        force.force = Vec2::ZERO;
        force.torque = 0.0;
    }
    *intent = ControlIntent::default();
}

// ── Step 2: Keyboard → Intent ─────────────────────────────────────────────────

/// Translate held keys into [`ControlIntent`].
///
/// - **Space** → `thrust = true`
/// - **A** → `steer = Some(Left)` (counter-clockwise)
/// - **D** → `steer = Some(Right)` (clockwise)
///
/// A wins when both rotation keys are held.
pub fn keyboard_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<ControlIntent>,
) {
    if keys.pressed(KeyCode::Space) {
        intent.thrust = true;
    }
    if keys.pressed(KeyCode::KeyA) {
        intent.steer = Some(Steer::Left);
    } else if keys.pressed(KeyCode::KeyD) {
        intent.steer = Some(Steer::Right);
    }
}

// ── Step 3: Apply intent → physics ───────────────────────────────────────────

/// Convert [`ControlIntent`] into force and steering on the craft.
///
/// This is the **only** system that writes flight physics; input systems only
/// write to `ControlIntent`. Nothing here runs unless the craft is `Alive`,
/// so a dying or transcending craft coasts under pure physics.
///
/// | Intent field      | Physics effect                                        |
/// |-------------------|-------------------------------------------------------|
/// | `thrust = true`   | `force += local_up * main_thrust`                     |
/// | `steer = Some(d)` | `angvel = 0`; rotate transform by `±rcs_thrust · dt`  |
/// | `steer = None`    | angular velocity left to the physics engine           |
///
/// Zeroing `angvel` on steering ticks is the Rapier expression of the
/// freeze-rotation cycle: while a rotation key is held, manual steering is
/// the sole source of angular change; releasing it hands the roll axis back
/// to the physics engine.
pub fn apply_intent_system(
    time: Res<Time>,
    intent: Res<ControlIntent>,
    config: Res<FlightConfig>,
    mut q: Query<
        (&CraftState, &mut Transform, &mut ExternalForce, &mut Velocity),
        With<Craft>,
    >,
) {
    let Ok((state, mut transform, mut force, mut velocity)) = q.single_mut() else {
        return;
    };

    if !state.is_alive() {
        return;
    }

    if intent.thrust {
        let up = transform.rotation.mul_vec3(Vec3::Y).truncate();
        force.force += up * config.main_thrust;
    }

    if let Some(steer) = intent.steer {
        velocity.angvel = 0.0;
        let sign = match steer {
            Steer::Left => 1.0,
            Steer::Right => -1.0,
        };
        transform.rotate_z(sign * config.rcs_thrust * time.delta_secs());
    }
}

// ── Debug keys ────────────────────────────────────────────────────────────────

/// Run condition for [`debug_keys_system`]: development builds only.
pub fn debug_build() -> bool {
    cfg!(debug_assertions)
}

/// Development-build controls, edge-triggered so holding a key fires once.
///
/// - **L** → skip to the next level immediately (wraps after the last).
/// - **C** → toggle the collision gate (invulnerability while disabled).
pub fn debug_keys_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut gate: ResMut<CollisionGate>,
    mut commands: Commands,
    current: Res<CurrentLevel>,
    catalog: Res<LevelCatalog>,
) {
    if keys.just_pressed(KeyCode::KeyL) {
        let target = next_level_index(current.0, catalog.len());
        info!("debug: skipping to level {target}");
        commands.insert_resource(PendingTransition::immediate(target));
    }
    if keys.just_pressed(KeyCode::KeyC) {
        gate.enabled = !gate.enabled;
        info!(
            "debug: collision gate {}",
            if gate.enabled { "enabled" } else { "disabled" }
        );
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── helpers ───────────────────────────────────────────────────────────────

    /// Build a minimal Bevy `App` with just the resources and systems needed
    /// to test the ControlIntent → physics pipeline, without Rapier stepping
    /// or rendering.
    fn build_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(ControlIntent::default());
        app.insert_resource(FlightConfig::default());
        app
    }

    /// Spawn a craft carrying the components queried by `apply_intent_system`.
    fn spawn_test_craft(app: &mut App, state: CraftState) {
        app.world_mut().spawn((
            Craft,
            state,
            Transform::from_rotation(Quat::IDENTITY), // nose up (+Y)
            ExternalForce::default(),
            Velocity::zero(),
        ));
    }

    /// Run the apply step once with the given intent. A single frame keeps
    /// force assertions exact: this test app has no clear step, so every
    /// extra frame would accumulate another `main_thrust`.
    fn run_apply(app: &mut App, intent: ControlIntent) {
        app.insert_resource(intent);
        app.add_systems(Update, apply_intent_system);
        app.update();
    }

    /// Run the apply step for two frames so `Time` has a non-zero delta on
    /// the second pass (the first frame's delta is zero). Used by the
    /// steering tests, which assert on rotation rather than force.
    fn run_apply_with_dt(app: &mut App, intent: ControlIntent) {
        app.insert_resource(intent);
        app.add_systems(Update, apply_intent_system);
        app.update();
        app.update();
    }

    fn craft_force(app: &mut App) -> Vec2 {
        let mut q = app
            .world_mut()
            .query_filtered::<&ExternalForce, With<Craft>>();
        q.single(app.world()).unwrap().force
    }

    fn craft_angle(app: &mut App) -> f32 {
        let mut q = app.world_mut().query_filtered::<&Transform, With<Craft>>();
        q.single(app.world()).unwrap().rotation.to_euler(EulerRot::ZYX).0
    }

    fn craft_angvel(app: &mut App) -> f32 {
        let mut q = app.world_mut().query_filtered::<&Velocity, With<Craft>>();
        q.single(app.world()).unwrap().angvel
    }

    // ── apply_intent_system ───────────────────────────────────────────────────

    #[test]
    fn thrust_applies_force_along_local_up() {
        let mut app = build_test_app();
        spawn_test_craft(&mut app, CraftState::Alive);

        run_apply(
            &mut app,
            ControlIntent {
                thrust: true,
                ..Default::default()
            },
        );

        let force = craft_force(&mut app);
        let expected = FlightConfig::default().main_thrust;
        // Nose up (identity rotation): force is (0, main_thrust).
        assert!(
            force.y > 0.0 && force.x.abs() < 1e-4,
            "expected force along +Y, got {force:?}"
        );
        assert!(
            (force.length() - expected).abs() < 1e-2,
            "expected force magnitude {expected}, got {}",
            force.length()
        );
    }

    #[test]
    fn no_intent_leaves_force_zero() {
        let mut app = build_test_app();
        spawn_test_craft(&mut app, CraftState::Alive);

        run_apply(&mut app, ControlIntent::default());

        assert_eq!(craft_force(&mut app), Vec2::ZERO);
    }

    #[test]
    fn dying_craft_ignores_thrust() {
        let mut app = build_test_app();
        spawn_test_craft(&mut app, CraftState::Dying);

        run_apply(
            &mut app,
            ControlIntent {
                thrust: true,
                steer: Some(Steer::Left),
            },
        );

        assert_eq!(
            craft_force(&mut app),
            Vec2::ZERO,
            "no command may be issued once the craft has left Alive"
        );
        assert!(craft_angle(&mut app).abs() < 1e-6);
    }

    #[test]
    fn transcending_craft_ignores_steering() {
        let mut app = build_test_app();
        spawn_test_craft(&mut app, CraftState::Transcending);

        run_apply_with_dt(
            &mut app,
            ControlIntent {
                thrust: false,
                steer: Some(Steer::Right),
            },
        );

        assert!(craft_angle(&mut app).abs() < 1e-6);
    }

    #[test]
    fn steer_left_rotates_counter_clockwise_and_kills_spin() {
        let mut app = build_test_app();
        app.world_mut().spawn((
            Craft,
            CraftState::Alive,
            Transform::from_rotation(Quat::IDENTITY),
            ExternalForce::default(),
            Velocity {
                linvel: Vec2::ZERO,
                angvel: 2.5, // physics-induced spin that steering must override
            },
        ));

        run_apply_with_dt(
            &mut app,
            ControlIntent {
                thrust: false,
                steer: Some(Steer::Left),
            },
        );

        assert!(
            craft_angle(&mut app) > 0.0,
            "left steer must rotate counter-clockwise"
        );
        assert_eq!(
            craft_angvel(&mut app),
            0.0,
            "manual steering must be the sole source of angular change"
        );
    }

    #[test]
    fn steer_right_rotates_clockwise() {
        let mut app = build_test_app();
        spawn_test_craft(&mut app, CraftState::Alive);

        run_apply_with_dt(
            &mut app,
            ControlIntent {
                thrust: false,
                steer: Some(Steer::Right),
            },
        );

        assert!(craft_angle(&mut app) < 0.0);
    }

    #[test]
    fn no_steer_leaves_angvel_untouched() {
        let mut app = build_test_app();
        app.world_mut().spawn((
            Craft,
            CraftState::Alive,
            Transform::from_rotation(Quat::IDENTITY),
            ExternalForce::default(),
            Velocity {
                linvel: Vec2::ZERO,
                angvel: 2.5,
            },
        ));

        run_apply(&mut app, ControlIntent::default());

        assert!(
            (craft_angvel(&mut app) - 2.5).abs() < 1e-4,
            "without steering, angular velocity belongs to the physics engine"
        );
    }

    // ── debug_keys_system ─────────────────────────────────────────────────────

    fn build_debug_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.insert_resource(CollisionGate::default());
        app.insert_resource(CurrentLevel(0));
        app.insert_resource(LevelCatalog::compiled_default());
        app.add_systems(Update, debug_keys_system);
        app
    }

    #[test]
    fn collision_toggle_is_an_idempotent_pair() {
        let mut app = build_debug_app();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyC);
        app.update();
        assert!(!app.world().resource::<CollisionGate>().enabled);

        // Key still held: just_pressed has been consumed, nothing fires.
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear_just_pressed(KeyCode::KeyC);
        app.update();
        assert!(!app.world().resource::<CollisionGate>().enabled);

        // Release and press again: second edge restores the original value.
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(KeyCode::KeyC);
        keys.clear();
        keys.press(KeyCode::KeyC);
        app.update();
        assert!(app.world().resource::<CollisionGate>().enabled);
    }

    #[test]
    fn level_skip_schedules_an_immediate_transition() {
        let mut app = build_debug_app();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyL);
        app.update();

        let pending = app
            .world()
            .get_resource::<PendingTransition>()
            .expect("L must schedule a transition");
        assert_eq!(pending.target, 1);
    }
}
