//! Craft module: the controlled rocket entity, its input handling, lifecycle
//! state machine, effects, and rendering.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | ECS components (`Craft`, `CraftState`, `SurfaceKind`), resources (`ControlIntent`, `CollisionGate`), domain messages |
//! | [`control`] | Input pipeline: intent clear, keyboard mapping, thrust/steer application, debug keys |
//! | [`collision`] | Contact classification and the Alive → {Dying, Transcending} state machine |
//! | [`audio`] | Engine loop and one-shot outcome sounds |
//! | [`rendering`] | Hull mesh, exhaust plume, outcome bursts, camera follow |
//!
//! All public items are re-exported at this level so the rest of the crate
//! can use flat `crate::craft::*` imports without knowing the sub-module
//! layout.

pub mod audio;
pub mod collision;
pub mod control;
pub mod rendering;
pub mod state;

// ── Flat re-exports ────────────────────────────────────────────────────────────

pub use audio::{
    engine_audio_system, load_craft_sounds, outcome_audio_system, spawn_engine_loop, CraftSounds,
    EngineSound,
};
pub use collision::{lifecycle_system, surface_contact_system};
pub use control::{
    apply_intent_system, debug_build, debug_keys_system, intent_clear_system,
    keyboard_intent_system,
};
pub use rendering::{
    attach_craft_mesh_system, camera_follow_system, exhaust_emission_system, outcome_burst_system,
};
pub use state::{
    CollisionGate, ControlIntent, Craft, CraftState, LifecycleOutcome, Steer, SurfaceContact,
    SurfaceKind,
};

// ── Craft spawn ────────────────────────────────────────────────────────────────

use crate::config::FlightConfig;
use crate::level::LevelEntity;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Spawn a fresh craft at `start`, upright and at rest.
///
/// The craft is a dynamic Rapier body with collision events enabled so that
/// every contact reaches [`collision::surface_contact_system`]. Tagged
/// [`LevelEntity`] so level reloads replace it along with the rest of the
/// level content.
pub fn spawn_craft(commands: &mut Commands, start: Vec2, config: &FlightConfig) {
    commands.spawn((
        Craft,
        CraftState::default(),
        // Physics
        RigidBody::Dynamic,
        Collider::cuboid(config.craft_collider_half_x, config.craft_collider_half_y),
        Velocity::zero(),
        ExternalForce::default(),
        Damping {
            linear_damping: config.craft_linear_damping,
            angular_damping: config.craft_angular_damping,
        },
        Restitution::coefficient(config.craft_restitution),
        ActiveEvents::COLLISION_EVENTS,
        // Transform / visibility
        Transform::from_translation(start.extend(0.0)),
        Visibility::default(),
        LevelEntity,
    ));
}
