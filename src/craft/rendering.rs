//! Craft-specific rendering: hull mesh, exhaust plume emission, outcome
//! bursts, and the camera follow system.

use super::state::{ControlIntent, Craft, CraftState, LifecycleOutcome};
use crate::config::FlightConfig;
use crate::particles::{spawn_exhaust_particles, spawn_explosion_particles, spawn_triumph_particles};
use crate::rendering::filled_polygon_mesh;
use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

// ── Hull geometry ─────────────────────────────────────────────────────────────

/// Local-space vertices of the craft hull polygon (capsule-nosed rocket).
///
/// The nose points along local +Y; the fins sweep back along −Y. This
/// orientation means the craft always thrusts in its transform's +Y direction.
fn craft_vertices() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 14.0),   // nose tip
        Vec2::new(-6.0, 4.0),   // left shoulder
        Vec2::new(-6.0, -8.0),  // left hull
        Vec2::new(-10.0, -13.0), // left fin tip
        Vec2::new(0.0, -10.0),  // tail notch
        Vec2::new(10.0, -13.0), // right fin tip
        Vec2::new(6.0, -8.0),   // right hull
        Vec2::new(6.0, 4.0),    // right shoulder
    ]
}

/// Attach a filled `Mesh2d` hull to the craft on spawn.
///
/// Runs once per craft entity (via [`Added<Craft>`]). The craft transform is
/// managed by Rapier so rotation is applied automatically.
pub fn attach_craft_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Craft>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for entity in query.iter() {
        let mesh_handle = meshes.add(filled_polygon_mesh(&craft_vertices()));
        let mat_handle = materials.add(ColorMaterial::from_color(Color::srgb(0.85, 0.88, 0.92)));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh_handle), MeshMaterial2d(mat_handle)));
    }
}

// ── Exhaust plume ─────────────────────────────────────────────────────────────

/// Emit exhaust particles from the craft tail while the engine burns.
///
/// Emission is gated on `Alive` as well as thrust, so the plume cuts out the
/// instant the craft crashes even if the player keeps the key held.
pub fn exhaust_emission_system(
    mut commands: Commands,
    intent: Res<ControlIntent>,
    config: Res<FlightConfig>,
    q: Query<(&CraftState, &Transform, &Velocity), With<Craft>>,
) {
    let Ok((state, transform, velocity)) = q.single() else {
        return;
    };
    if !state.is_alive() || !intent.thrust {
        return;
    }

    let up = transform.rotation.mul_vec3(Vec3::Y).truncate();
    let tail = transform.translation.truncate() - up * config.exhaust_tail_offset;
    spawn_exhaust_particles(
        &mut commands,
        tail,
        -up,
        velocity.linvel,
        config.exhaust_particles_per_frame,
    );
}

/// Spawn the terminal-sequence burst for each lifecycle outcome.
pub fn outcome_burst_system(
    mut outcomes: MessageReader<LifecycleOutcome>,
    mut commands: Commands,
) {
    for outcome in outcomes.read() {
        match *outcome {
            LifecycleOutcome::Success { at } => spawn_triumph_particles(&mut commands, at),
            LifecycleOutcome::Failure { at } => spawn_explosion_particles(&mut commands, at),
        }
    }
}

// ── Camera ─────────────────────────────────────────────────────────────────────

/// Keep the camera centred on the craft every frame.
///
/// Camera Z is preserved (used internally by Bevy for rendering order).
pub fn camera_follow_system(
    q_craft: Query<&Transform, With<Craft>>,
    mut q_camera: Query<&mut Transform, (With<Camera>, Without<Craft>)>,
) {
    let Ok(craft_transform) = q_craft.single() else {
        return;
    };
    let Ok(mut cam) = q_camera.single_mut() else {
        return;
    };

    cam.translation.x = craft_transform.translation.x;
    cam.translation.y = craft_transform.translation.y;
}
