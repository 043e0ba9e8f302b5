//! Particle effects: exhaust plume, crash explosion, and goal triumph burst.
//!
//! ## Design
//!
//! Particles are lightweight ECS entities with a [`Particle`] component that
//! stores physics state (velocity, age, colour). A two-system pipeline
//! handles them:
//!
//! | System                        | Schedule | Purpose                                      |
//! |-------------------------------|----------|----------------------------------------------|
//! | `attach_particle_mesh_system` | Update   | Attach `Mesh2d` to freshly-spawned particles |
//! | `particle_update_system`      | Update   | Move, fade, and despawn expired particles    |
//!
//! Particle entities are spawned by free functions that take only
//! `&mut Commands` — no `Assets` access needed at spawn time. The
//! `attach_particle_mesh_system` supplies the `Mesh2d` one frame later, which
//! is imperceptible at 60 Hz.
//!
//! A single shared circle-mesh [`ParticleMesh`] resource is created at plugin
//! startup to avoid per-particle mesh allocation. Each particle receives its
//! own [`ColorMaterial`] so its alpha can be faded individually.

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::Rng;

// ── Resources ────────────────────────────────────────────────────────────────

/// Shared circle mesh used by all particle entities (created once at startup).
#[derive(Resource)]
pub struct ParticleMesh(pub Handle<Mesh>);

// ── Component ────────────────────────────────────────────────────────────────

/// Short-lived visual particle entity.
#[derive(Component)]
pub struct Particle {
    /// World-space velocity (units/s).
    pub velocity: Vec2,
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); entity is despawned when `age >= lifetime`.
    pub lifetime: f32,
    /// Base colour channels (sRGB, 0–1).
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Handle to this particle's `ColorMaterial` so the update system can
    /// fade its alpha. `None` until `attach_particle_mesh_system` runs.
    pub material: Option<Handle<ColorMaterial>>,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_particle_mesh).add_systems(
            Update,
            (attach_particle_mesh_system, particle_update_system).chain(),
        );
    }
}

/// Create the shared circle mesh and store it as a [`ParticleMesh`] resource.
fn init_particle_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(circle_mesh(2.0, 6));
    commands.insert_resource(ParticleMesh(handle));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach `Mesh2d` + `MeshMaterial2d` to every newly-spawned [`Particle`].
///
/// Uses [`Added<Particle>`] so it only runs for particles that appeared since
/// the last frame.
pub fn attach_particle_mesh_system(
    mut commands: Commands,
    particle_mesh: Res<ParticleMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Particle), Added<Particle>>,
) {
    for (entity, mut particle) in query.iter_mut() {
        let mat_handle = materials.add(ColorMaterial::from_color(Color::srgba(
            particle.r, particle.g, particle.b, 1.0,
        )));
        particle.material = Some(mat_handle.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(particle_mesh.0.clone()), MeshMaterial2d(mat_handle)));
    }
}

/// Advance all particles: translate by velocity, fade alpha quadratically,
/// and despawn any whose age has exceeded their lifetime.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut particle) in query.iter_mut() {
        particle.age += dt;

        if particle.age >= particle.lifetime {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation.x += particle.velocity.x * dt;
        transform.translation.y += particle.velocity.y * dt;

        // Quadratic ease-out alpha: bright at birth, rapid fade at end.
        let t = particle.age / particle.lifetime;
        let alpha = (1.0 - t).powi(2);

        if let Some(ref handle) = particle.material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = Color::srgba(particle.r, particle.g, particle.b, alpha);
            }
        }
    }
}

// ── Public spawn helpers ──────────────────────────────────────────────────────

/// Spawn a short burst of engine exhaust behind the craft.
///
/// `back_dir` points opposite the craft's local up (out of the nozzle);
/// `craft_vel` is blended in so the plume trails the craft instead of being
/// left at the world position of an old frame.
pub fn spawn_exhaust_particles(
    commands: &mut Commands,
    pos: Vec2,
    back_dir: Vec2,
    craft_vel: Vec2,
    count: u32,
) {
    let mut rng = rand::thread_rng();

    let base = if back_dir.length_squared() > 1e-6 {
        back_dir.normalize()
    } else {
        Vec2::NEG_Y
    };
    let base_angle = base.y.atan2(base.x);

    for _ in 0..count {
        let angle = base_angle + rng.gen_range(-0.30_f32..0.30_f32);
        let speed = rng.gen_range(40.0_f32..110.0_f32);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed + craft_vel * 0.15;

        // Blue-white engine flame.
        let r = rng.gen_range(0.55_f32..0.80_f32);
        let g = rng.gen_range(0.75_f32..0.92_f32);
        let b = rng.gen_range(0.92_f32..1.0_f32);

        let lifetime = rng.gen_range(0.12_f32..0.28_f32);
        let lateral = Vec2::new(-base.y, base.x) * rng.gen_range(-2.0_f32..2.0_f32);
        let back_offset = base * rng.gen_range(0.0_f32..3.0_f32);

        commands.spawn((
            Particle {
                velocity,
                age: 0.0,
                lifetime,
                r,
                g,
                b,
                material: None,
            },
            Transform::from_translation((pos + lateral + back_offset).extend(0.9)),
            Visibility::default(),
        ));
    }
}

/// Spawn the crash explosion: a dense radial burst of embers and smoke.
pub fn spawn_explosion_particles(commands: &mut Commands, pos: Vec2) {
    let mut rng = rand::thread_rng();
    let count = 28_u32;

    for _ in 0..count {
        let angle = rng.gen_range(0.0_f32..std::f32::consts::TAU);
        let speed = rng.gen_range(50.0_f32..220.0_f32);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

        // Fire-orange embers shading into grey smoke.
        let ember = rng.gen_bool(0.7);
        let (r, g, b) = if ember {
            (
                rng.gen_range(0.90_f32..1.0_f32),
                rng.gen_range(0.30_f32..0.60_f32),
                rng.gen_range(0.0_f32..0.12_f32),
            )
        } else {
            let lum = rng.gen_range(0.35_f32..0.55_f32);
            (lum, lum, lum)
        };

        let lifetime = rng.gen_range(0.35_f32..0.80_f32);
        let offset = Vec2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));

        commands.spawn((
            Particle {
                velocity,
                age: 0.0,
                lifetime,
                r,
                g,
                b,
                material: None,
            },
            Transform::from_translation((pos + offset).extend(0.9)),
            Visibility::default(),
        ));
    }
}

/// Spawn the goal-pad triumph burst: a gold fountain rising off the pad.
pub fn spawn_triumph_particles(commands: &mut Commands, pos: Vec2) {
    let mut rng = rand::thread_rng();
    let count = 18_u32;

    for _ in 0..count {
        // Upward cone, ±50° around +Y.
        let angle = std::f32::consts::FRAC_PI_2 + rng.gen_range(-0.9_f32..0.9_f32);
        let speed = rng.gen_range(60.0_f32..160.0_f32);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

        // Gold with occasional white sparks.
        let white = rng.gen_bool(0.25);
        let (r, g, b) = if white {
            (1.0, 1.0, rng.gen_range(0.85_f32..1.0_f32))
        } else {
            (
                rng.gen_range(0.92_f32..1.0_f32),
                rng.gen_range(0.72_f32..0.88_f32),
                rng.gen_range(0.10_f32..0.30_f32),
            )
        };

        let lifetime = rng.gen_range(0.40_f32..0.90_f32);
        let offset = Vec2::new(rng.gen_range(-8.0..8.0), rng.gen_range(-2.0..2.0));

        commands.spawn((
            Particle {
                velocity,
                age: 0.0,
                lifetime,
                r,
                g,
                b,
                material: None,
            },
            Transform::from_translation((pos + offset).extend(0.9)),
            Visibility::default(),
        ));
    }
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build a filled circle mesh approximated by an `n`-sided regular polygon.
///
/// Uses a triangle fan from the centre: `(0, i, i+1 mod n)`.
fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
